//! # Host Seams
//!
//! Traits for everything the session does not own, so the core runs against
//! a fake provider in tests and against `window.ethereum` in the browser.
//!
//! - [`WalletProvider`]: the injected provider object (request + events)
//! - [`ProviderSource`]: where the provider is looked up on every use; the
//!   host may install, remove or swap it at any time
//! - [`Host`]: page-level side effects (reload, closing the modal)

use std::rc::Rc;

use async_trait::async_trait;
use serde_json::Value;
use shared::{ProviderEventKind, ProviderRpcError, RpcMethod};

/// Raw notification callback. Receives the undecoded payload.
pub type ProviderListener = Rc<dyn Fn(Value)>;

/// Identifies one registration made through [`WalletProvider::add_listener`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// An injected wallet provider.
///
/// Futures are not `Send`: the provider lives on the page's event loop.
#[async_trait(?Send)]
pub trait WalletProvider {
    /// Whether the provider object carries the boolean attribute `marker`
    /// (e.g. `isMetaMask`) set to `true`.
    fn has_marker(&self, marker: &str) -> bool;

    /// `provider.request({ method })`. May stay pending for as long as the
    /// user takes to answer the wallet prompt.
    async fn request(&self, method: RpcMethod) -> Result<Value, ProviderRpcError>;

    /// `provider.on(kind, listener)`.
    fn add_listener(
        &self,
        kind: ProviderEventKind,
        listener: ProviderListener,
    ) -> Result<ListenerId, ProviderRpcError>;

    /// `provider.removeListener(...)`. Unknown ids are ignored.
    fn remove_listener(&self, id: ListenerId);
}

/// Looks up the provider currently exposed by the environment.
pub trait ProviderSource {
    fn current(&self) -> Option<Rc<dyn WalletProvider>>;
}

impl<F> ProviderSource for F
where
    F: Fn() -> Option<Rc<dyn WalletProvider>>,
{
    fn current(&self) -> Option<Rc<dyn WalletProvider>> {
        self()
    }
}

/// Page-level side effects requested by the session.
pub trait Host {
    /// Discard all in-memory state and restart the page.
    fn reload(&self);

    /// Close the wallet modal. Presentation only.
    fn close_modal(&self);
}
