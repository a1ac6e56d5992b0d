//! # Session State Store
//!
//! Single owner of the [`Session`]. [`SessionStore::transition`] is the only
//! way to change it and is total: an event that does not apply to the current
//! state is a no-op, never an error, so late or out-of-order provider events
//! cannot corrupt the session.
//!
//! ## Transition Table
//!
//! | Current | Event | Next |
//! |---|---|---|
//! | Disconnected, Error | `ConnectStart` | Connecting |
//! | Connecting | `ConnectSucceeded(a)` | Connected(a) |
//! | Disconnected | `Restored(a)` | Connected(a) |
//! | Connecting | `ConnectFailed(r)` | Error(r) |
//! | any | `AccountsChanged([])` | Disconnected |
//! | any | `AccountsChanged([a, ..])` | Connected(a) |
//! | any | `DisconnectRequested` | Disconnected |
//! | any | `CapabilityProbed(f)` | unchanged, `provider_capable = f` |
//!
//! `ChainChanged` never changes state; reloading is the subscriber's job.
//!
//! ## Notification
//!
//! Listeners run synchronously after every transition that changed the
//! session. A transition requested from inside a listener is queued and
//! applied once the current round of notifications has finished, so every
//! listener sees every state in arrival order.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::model::{Session, SessionEvent, WalletState};

/// Handle returned by [`SessionStore::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Rc<dyn Fn(&Session)>;

#[derive(Default)]
pub struct SessionStore {
    session: RefCell<Session>,
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
    next_id: Cell<u64>,
    revision: Cell<u64>,
    dispatching: Cell<bool>,
    queued: RefCell<VecDeque<SessionEvent>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current session.
    pub fn get(&self) -> Session {
        self.session.borrow().clone()
    }

    /// Number of transitions that changed the session so far.
    pub fn revision(&self) -> u64 {
        self.revision.get()
    }

    /// Apply `event` and return the resulting session.
    ///
    /// Called from a listener, the event is queued and the returned snapshot
    /// is the session as it stands before the queued event is applied.
    pub fn transition(&self, event: SessionEvent) -> Session {
        if self.dispatching.get() {
            tracing::debug!(event = event.name(), "transition queued behind notification");
            self.queued.borrow_mut().push_back(event);
            return self.get();
        }

        let _guard = DispatchGuard::enter(&self.dispatching);
        let mut pending = Some(event);
        while let Some(event) = pending {
            self.apply(event);
            pending = self.queued.borrow_mut().pop_front();
        }
        self.get()
    }

    /// Register a listener called after every session change.
    pub fn subscribe(&self, listener: impl Fn(&Session) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn apply(&self, event: SessionEvent) {
        let current = self.get();
        let Some(next) = next_session(&current, &event) else {
            tracing::trace!(event = event.name(), status = ?current.status(), "no-op transition");
            return;
        };

        tracing::debug!(
            event = event.name(),
            from = ?current.status(),
            to = ?next.status(),
            "session transition"
        );
        *self.session.borrow_mut() = next.clone();
        self.revision.set(self.revision.get() + 1);

        // Listeners may subscribe or unsubscribe while being notified.
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(&next);
        }
    }
}

/// The transition table. `None` means the event does not apply.
fn next_session(current: &Session, event: &SessionEvent) -> Option<Session> {
    use SessionEvent as E;
    use WalletState as S;

    if let E::CapabilityProbed(capable) = event {
        return (current.provider_capable != *capable).then(|| Session {
            state: current.state.clone(),
            provider_capable: *capable,
        });
    }

    let state = match (&current.state, event) {
        (S::Disconnected | S::Error(_), E::ConnectStart) => S::Connecting,
        (S::Connecting, E::ConnectSucceeded(address)) | (S::Disconnected, E::Restored(address))
            if !address.is_empty() =>
        {
            S::Connected {
                address: address.clone(),
            }
        }
        (S::Connecting, E::ConnectFailed(reason)) => S::Error(reason.clone()),
        (_, E::AccountsChanged(accounts)) => match accounts.first() {
            None => S::Disconnected,
            Some(address) if address.is_empty() => return None,
            Some(address) => S::Connected {
                address: address.clone(),
            },
        },
        (_, E::DisconnectRequested) => S::Disconnected,
        _ => return None,
    };

    (state != current.state).then(|| Session {
        state,
        provider_capable: current.provider_capable,
    })
}

struct DispatchGuard<'a>(&'a Cell<bool>);

impl<'a> DispatchGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}
