//! # Wallet Session
//!
//! The surface the view layer talks to. Wires the probe, store, controller
//! and subscriber together at mount and tears them down deterministically.
//!
//! ```rust,no_run
//! use std::rc::Rc;
//! use lib_session::{ManualScheduler, SessionConfig, WalletSession};
//! # fn host() -> Rc<dyn lib_session::Host> { unimplemented!() }
//! # fn source() -> Rc<dyn lib_session::ProviderSource> { unimplemented!() }
//! # async fn run() -> lib_session::Result<()> {
//!
//! let session = WalletSession::mount(
//!     SessionConfig::default(),
//!     source(),
//!     host(),
//!     Rc::new(ManualScheduler::new()),
//! )?;
//! session.restore().await;
//! session.subscribe(|snapshot| println!("status: {:?}", snapshot.status()));
//! let address = session.sign_in().await?;
//! # Ok(()) }
//! ```

use std::rc::Rc;

use crate::config::SessionConfig;
use crate::controller::ConnectionFlow;
use crate::error::Result;
use crate::modal::{navbar_label, ModalView};
use crate::model::{Session, SessionEvent};
use crate::probe::ProviderProbe;
use crate::provider::{Host, ProviderSource};
use crate::scheduler::Scheduler;
use crate::store::{SessionStore, SubscriptionId};
use crate::subscriber::EventSubscriber;

pub struct WalletSession {
    config: SessionConfig,
    store: Rc<SessionStore>,
    probe: Rc<ProviderProbe>,
    flow: ConnectionFlow,
    subscriber: EventSubscriber,
}

impl WalletSession {
    /// Create the page's session: probe once, attach provider listeners.
    ///
    /// Call [`restore`](Self::restore) afterwards to pick up an account
    /// authorized on a previous visit.
    pub fn mount(
        config: SessionConfig,
        source: Rc<dyn ProviderSource>,
        host: Rc<dyn Host>,
        scheduler: Rc<dyn Scheduler>,
    ) -> Result<Self> {
        config.validate()?;

        let store = Rc::new(SessionStore::new());
        let probe = Rc::new(ProviderProbe::new(source, config.provider_marker.clone()));
        store.transition(SessionEvent::CapabilityProbed(probe.is_capable()));

        let subscriber = EventSubscriber::attach(&probe, Rc::clone(&store), Rc::clone(&host))?;
        let flow = ConnectionFlow::new(
            Rc::clone(&store),
            Rc::clone(&probe),
            scheduler,
            host,
            config.dismiss_delay,
        );

        tracing::info!(capable = store.get().provider_capable, "wallet session mounted");
        Ok(Self {
            config,
            store,
            probe,
            flow,
            subscriber,
        })
    }

    /// Non-interactive lookup of already-authorized accounts.
    pub async fn restore(&self) -> Option<String> {
        self.subscriber.restore().await
    }

    pub fn snapshot(&self) -> Session {
        self.store.get()
    }

    pub fn provider_capable(&self) -> bool {
        self.store.get().provider_capable
    }

    /// The modal is being (re)opened: re-run the probe, since a wallet may
    /// have been installed since the last look.
    pub fn open_modal(&self) -> Session {
        self.store
            .transition(SessionEvent::CapabilityProbed(self.probe.is_capable()))
    }

    pub async fn sign_in(&self) -> Result<String> {
        self.flow.sign_in().await
    }

    pub fn disconnect(&self) -> Session {
        self.store.transition(SessionEvent::DisconnectRequested)
    }

    pub fn subscribe(&self, listener: impl Fn(&Session) + 'static) -> SubscriptionId {
        self.store.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    pub fn modal_view(&self) -> ModalView {
        ModalView::derive(&self.store.get())
    }

    pub fn navbar_label(&self) -> String {
        navbar_label(&self.store.get())
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn is_connect_in_flight(&self) -> bool {
        self.flow.is_in_flight()
    }

    /// Page unload: remove provider listeners and drop any pending dismissal.
    pub fn teardown(&self) {
        self.subscriber.detach();
        self.flow.cancel_dismiss();
        tracing::debug!("wallet session torn down");
    }
}
