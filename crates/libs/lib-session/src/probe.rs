//! Provider capability probe.

use std::rc::Rc;

use crate::provider::{ProviderSource, WalletProvider};

/// Answers "is there a usable wallet provider right now?".
///
/// Never cached: a wallet extension can be installed while the page is open,
/// so every call goes back to the [`ProviderSource`].
pub struct ProviderProbe {
    source: Rc<dyn ProviderSource>,
    marker: String,
}

impl ProviderProbe {
    pub fn new(source: Rc<dyn ProviderSource>, marker: impl Into<String>) -> Self {
        Self {
            source,
            marker: marker.into(),
        }
    }

    /// `false` when the provider is absent or lacks the marker; never an error.
    pub fn is_capable(&self) -> bool {
        self.capable_provider().is_some()
    }

    /// The current provider, if it carries the marker.
    pub fn capable_provider(&self) -> Option<Rc<dyn WalletProvider>> {
        self.source
            .current()
            .filter(|provider| provider.has_marker(&self.marker))
    }
}
