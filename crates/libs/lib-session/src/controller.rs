//! # Connection Flow Controller
//!
//! Drives the user-initiated "Connect MetaMask" action:
//!
//! 1. No capable provider: `Err(NotCapable)`, the session is not touched.
//! 2. An attempt already waiting on the wallet: `Err(ConnectInFlight)`, no
//!    store mutation.
//! 3. Already connected: the current address, no prompt.
//! 4. `ConnectStart`, then `eth_requestAccounts`. No timeout: the request
//!    resolves only when the user answers or the provider fails.
//! 5. First returned account wins. Code 4001 becomes `UserRejected`, every
//!    other failure `RequestFailed`.
//! 6. Either way the modal closes after `dismiss_delay`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use serde_json::Value;
use shared::{parse_accounts, RpcMethod};

use crate::error::{AppError, ConnectError, Result};
use crate::model::{ConnectionStatus, SessionEvent};
use crate::probe::ProviderProbe;
use crate::provider::Host;
use crate::scheduler::{ScheduledTask, Scheduler};
use crate::store::SessionStore;

pub struct ConnectionFlow {
    store: Rc<SessionStore>,
    probe: Rc<ProviderProbe>,
    scheduler: Rc<dyn Scheduler>,
    host: Rc<dyn Host>,
    dismiss_delay: Duration,
    in_flight: Cell<bool>,
    pending_dismiss: RefCell<Option<ScheduledTask>>,
}

impl ConnectionFlow {
    pub fn new(
        store: Rc<SessionStore>,
        probe: Rc<ProviderProbe>,
        scheduler: Rc<dyn Scheduler>,
        host: Rc<dyn Host>,
        dismiss_delay: Duration,
    ) -> Self {
        Self {
            store,
            probe,
            scheduler,
            host,
            dismiss_delay,
            in_flight: Cell::new(false),
            pending_dismiss: RefCell::new(None),
        }
    }

    /// Whether an account request is currently waiting on the wallet.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.get()
    }

    /// Request account access and record the outcome in the session.
    pub async fn sign_in(&self) -> Result<String> {
        let Some(provider) = self.probe.capable_provider() else {
            tracing::debug!("sign in skipped: no capable provider");
            return Err(AppError::NotCapable);
        };

        let session = self.store.get();
        if self.in_flight.get() || session.status() == ConnectionStatus::Connecting {
            tracing::warn!("sign in rejected: an attempt is already in flight");
            return Err(AppError::ConnectInFlight);
        }
        if let Some(address) = session.address() {
            return Ok(address.to_string());
        }

        self.cancel_dismiss();
        let attempt = InFlight::enter(&self.in_flight, &self.store);
        self.store.transition(SessionEvent::ConnectStart);
        tracing::info!("requesting account access");

        let response = provider.request(RpcMethod::RequestAccounts).await;
        attempt.finish();

        let outcome = response.map_err(ConnectError::from).and_then(first_account);
        match &outcome {
            Ok(address) => {
                tracing::info!(%address, "wallet connected");
                self.store
                    .transition(SessionEvent::ConnectSucceeded(address.clone()));
            }
            Err(err) => {
                tracing::info!(error = %err, alarming = err.is_alarming(), "wallet connect failed");
                self.store.transition(SessionEvent::ConnectFailed(err.clone()));
            }
        }

        self.schedule_dismiss();
        outcome.map_err(AppError::from)
    }

    /// Cancel a modal dismissal that has not fired yet.
    pub fn cancel_dismiss(&self) {
        if let Some(task) = self.pending_dismiss.borrow_mut().take() {
            task.cancel();
        }
    }

    fn schedule_dismiss(&self) {
        let host = Rc::clone(&self.host);
        let task = self.scheduler.schedule(
            self.dismiss_delay,
            Box::new(move || {
                tracing::debug!("dismissing wallet modal");
                host.close_modal();
            }),
        );
        // Replacing an older handle drops, and so cancels, it.
        drop(self.pending_dismiss.replace(Some(task)));
    }
}

fn first_account(result: Value) -> std::result::Result<String, ConnectError> {
    let accounts = parse_accounts(result)
        .map_err(|err| ConnectError::RequestFailed(err.to_string()))?;
    match accounts.into_iter().next() {
        Some(address) if !address.is_empty() => Ok(address),
        _ => Err(ConnectError::RequestFailed(
            "wallet returned no accounts".to_string(),
        )),
    }
}

/// Marks an attempt as in flight. If the `sign_in` future is dropped before
/// the provider answers, the attempt is recorded as failed so the session
/// does not stay in `Connecting`.
struct InFlight<'a> {
    flag: &'a Cell<bool>,
    store: &'a SessionStore,
    finished: bool,
}

impl<'a> InFlight<'a> {
    fn enter(flag: &'a Cell<bool>, store: &'a SessionStore) -> Self {
        flag.set(true);
        Self {
            flag,
            store,
            finished: false,
        }
    }

    fn finish(mut self) {
        self.finished = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
        if !self.finished {
            tracing::warn!("connect attempt abandoned before the wallet answered");
            self.store.transition(SessionEvent::ConnectFailed(ConnectError::RequestFailed(
                "connect attempt abandoned".to_string(),
            )));
        }
    }
}
