//! # Provider Event Subscriber
//!
//! Attaches to `accountsChanged` and `chainChanged` once at startup and
//! forwards them into the [`SessionStore`]:
//!
//! - `accountsChanged(list)`: forwarded unconditionally, also while a sign in
//!   is in flight. The provider's account always wins.
//! - `chainChanged(id)`: forwarded, then the host reloads the page. Handles
//!   bound to the old chain must not survive, whatever the session status.
//!
//! Registrations are owned by the subscriber and removed by [`detach`] or on
//! drop, against the provider instance they were made on.
//!
//! [`detach`]: EventSubscriber::detach

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;
use shared::{parse_accounts, ProviderEvent, ProviderEventKind, RpcMethod};

use crate::error::{AppError, Result};
use crate::model::SessionEvent;
use crate::probe::ProviderProbe;
use crate::provider::{Host, ListenerId, ProviderListener, WalletProvider};
use crate::store::SessionStore;

pub struct EventSubscriber {
    store: Rc<SessionStore>,
    provider: Option<Rc<dyn WalletProvider>>,
    registrations: RefCell<Vec<ListenerId>>,
}

impl EventSubscriber {
    /// Register both listeners on the provider present at startup.
    ///
    /// Without a capable provider nothing is registered. If the second
    /// registration fails the first is rolled back.
    pub fn attach(probe: &ProviderProbe, store: Rc<SessionStore>, host: Rc<dyn Host>) -> Result<Self> {
        let provider = probe.capable_provider();
        let subscriber = Self {
            store,
            provider,
            registrations: RefCell::new(Vec::new()),
        };

        let Some(provider) = subscriber.provider.clone() else {
            tracing::info!("no wallet provider at startup, event listeners not attached");
            return Ok(subscriber);
        };

        for kind in ProviderEventKind::ALL {
            let listener = forwarder(kind, Rc::clone(&subscriber.store), Rc::clone(&host));
            match provider.add_listener(kind, listener) {
                Ok(id) => subscriber.registrations.borrow_mut().push(id),
                Err(err) => {
                    // Dropping `subscriber` removes what was registered so far.
                    return Err(AppError::Provider(format!(
                        "failed to listen for {}: {}",
                        kind.as_str(),
                        err
                    )));
                }
            }
        }

        tracing::debug!("provider event listeners attached");
        Ok(subscriber)
    }

    /// Restore a session authorized on a previous visit.
    ///
    /// Uses the non-interactive `eth_accounts`, so no prompt is shown. Any
    /// failure leaves the session untouched.
    pub async fn restore(&self) -> Option<String> {
        let provider = self.provider.as_ref()?;
        let accounts = match provider.request(RpcMethod::Accounts).await {
            Ok(value) => parse_accounts(value),
            Err(err) => {
                tracing::warn!(error = %err, "eth_accounts failed, session not restored");
                return None;
            }
        };

        match accounts {
            Ok(accounts) => {
                let address = accounts.into_iter().next().filter(|a| !a.is_empty())?;
                tracing::info!(%address, "restored previously authorized account");
                self.store
                    .transition(SessionEvent::Restored(address.clone()))
                    .address()
                    .map(str::to_string)
            }
            Err(err) => {
                tracing::warn!(error = %err, "eth_accounts returned an unexpected payload");
                None
            }
        }
    }

    /// Remove every registration. Idempotent.
    pub fn detach(&self) {
        let ids: Vec<ListenerId> = self.registrations.borrow_mut().drain(..).collect();
        if let Some(provider) = &self.provider {
            for id in ids {
                provider.remove_listener(id);
            }
        }
    }
}

impl Drop for EventSubscriber {
    fn drop(&mut self) {
        self.detach();
    }
}

fn forwarder(kind: ProviderEventKind, store: Rc<SessionStore>, host: Rc<dyn Host>) -> ProviderListener {
    Rc::new(move |payload: Value| match ProviderEvent::from_payload(kind, payload) {
        Ok(event) => forward(&store, host.as_ref(), event),
        Err(err) => tracing::warn!(event = kind.as_str(), error = %err, "dropping malformed provider event"),
    })
}

fn forward(store: &SessionStore, host: &dyn Host, event: ProviderEvent) {
    match event {
        ProviderEvent::AccountsChanged(accounts) => {
            tracing::debug!(count = accounts.len(), "accounts changed");
            store.transition(SessionEvent::AccountsChanged(accounts));
        }
        ProviderEvent::ChainChanged(chain_id) => {
            tracing::info!(%chain_id, "chain changed, reloading");
            store.transition(SessionEvent::ChainChanged);
            host.reload();
        }
    }
}
