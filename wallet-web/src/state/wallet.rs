//! Wallet state management
//!
//! Mirrors the session store into a Leptos signal. Components read the
//! signal; every change goes through [`WalletSession`].

use std::rc::Rc;

use leptos::prelude::*;
use lib_session::modal::navbar_label;
use lib_session::{Host, ModalView, Session, SessionConfig, WalletSession};

use crate::services::{TimeoutScheduler, WindowProviderSource};

/// Global wallet context
#[derive(Clone, Copy)]
pub struct WalletContext {
    pub session: RwSignal<Session>,
    pub modal_open: RwSignal<bool>,
    handle: StoredValue<Option<Rc<WalletSession>>, LocalStorage>,
}

impl WalletContext {
    fn with_session(&self, f: impl FnOnce(&Rc<WalletSession>)) {
        match self.handle.get_value() {
            Some(session) => f(&session),
            None => log::warn!("wallet session unavailable"),
        }
    }

    pub fn view(&self) -> ModalView {
        self.session.with(ModalView::derive)
    }

    pub fn navbar_label(&self) -> String {
        self.session.with(navbar_label)
    }

    pub fn is_connected(&self) -> bool {
        self.session.with(|session| session.is_connected())
    }

    /// Re-probes the provider, then shows the modal.
    pub fn open_modal(&self) {
        self.with_session(|session| {
            session.open_modal();
        });
        self.modal_open.set(true);
    }

    pub fn close_modal(&self) {
        self.modal_open.set(false);
    }

    pub fn sign_in(&self) {
        let Some(session) = self.handle.get_value() else {
            log::warn!("wallet session unavailable");
            return;
        };
        leptos::task::spawn_local(async move {
            match session.sign_in().await {
                Ok(address) => log::info!("wallet connected: {}", address),
                Err(e) if e.is_alarming() => log::error!("wallet connect failed: {}", e),
                Err(e) => log::info!("wallet connect not completed: {}", e.user_message()),
            }
        });
    }

    pub fn disconnect(&self) {
        self.with_session(|session| {
            session.disconnect();
        });
    }

    pub fn onboarding_url(&self) -> Option<String> {
        self.handle
            .get_value()
            .map(|session| session.config().onboarding_url.clone())
    }
}

/// Page-level effects the session asks for.
struct PageHost {
    modal_open: RwSignal<bool>,
}

impl Host for PageHost {
    fn reload(&self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Err(e) = window.location().reload() {
            log::error!("page reload failed: {:?}", e);
        }
    }

    fn close_modal(&self) {
        self.modal_open.set(false);
    }
}

fn mount_session(modal_open: RwSignal<bool>) -> Option<Rc<WalletSession>> {
    let host = PageHost { modal_open };
    match WalletSession::mount(
        SessionConfig::default(),
        Rc::new(WindowProviderSource),
        Rc::new(host),
        Rc::new(TimeoutScheduler),
    ) {
        Ok(session) => Some(Rc::new(session)),
        Err(e) => {
            log::error!("wallet session failed to mount: {}", e);
            None
        }
    }
}

/// Mounts the page's wallet session and provides it to the component tree.
pub fn provide_wallet_context() -> WalletContext {
    let modal_open = RwSignal::new(false);
    let mounted = mount_session(modal_open);

    let session = RwSignal::new(
        mounted
            .as_ref()
            .map(|session| session.snapshot())
            .unwrap_or_default(),
    );

    if let Some(wallet) = &mounted {
        wallet.subscribe(move |snapshot| session.set(snapshot.clone()));

        let wallet = Rc::clone(wallet);
        leptos::task::spawn_local(async move {
            if let Some(address) = wallet.restore().await {
                log::info!("restored wallet session for {}", address);
            }
        });
    }

    let context = WalletContext {
        session,
        modal_open,
        handle: StoredValue::new_local(mounted),
    };

    on_cleanup(move || {
        if let Some(session) = context.handle.get_value() {
            session.teardown();
        }
    });

    provide_context(context);
    context
}

pub fn use_wallet_context() -> WalletContext {
    expect_context::<WalletContext>()
}
