//! Test doubles: scripted provider, swappable provider source, counting host.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use futures::channel::oneshot;
use lib_session::{
    Host, ListenerId, ManualScheduler, ProviderListener, ProviderSource, SessionConfig,
    WalletProvider, WalletSession,
};
use serde_json::{json, Value};
use shared::{ProviderEventKind, ProviderRpcError, RpcMethod};

pub const DISMISS_DELAY: Duration = Duration::from_millis(1500);

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

type Reply = Result<Value, ProviderRpcError>;

enum Scripted {
    Now(Reply),
    Deferred(oneshot::Receiver<Reply>),
}

/// In-memory stand-in for `window.ethereum`.
pub struct FakeProvider {
    metamask: Cell<bool>,
    authorized: RefCell<Vec<String>>,
    accounts_error: RefCell<Option<ProviderRpcError>>,
    replies: RefCell<VecDeque<Scripted>>,
    calls: RefCell<Vec<RpcMethod>>,
    listeners: RefCell<Vec<(ListenerId, ProviderEventKind, ProviderListener)>>,
    next_listener: Cell<u64>,
    refuse_listener: Cell<Option<ProviderEventKind>>,
}

impl FakeProvider {
    pub fn metamask() -> Rc<Self> {
        Rc::new(Self {
            metamask: Cell::new(true),
            authorized: RefCell::new(Vec::new()),
            accounts_error: RefCell::new(None),
            replies: RefCell::new(VecDeque::new()),
            calls: RefCell::new(Vec::new()),
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(1),
            refuse_listener: Cell::new(None),
        })
    }

    /// A provider object without the `isMetaMask` marker.
    pub fn unbranded() -> Rc<Self> {
        let provider = Self::metamask();
        provider.metamask.set(false);
        provider
    }

    /// Accounts returned by `eth_accounts`.
    pub fn authorize(&self, accounts: &[&str]) {
        *self.authorized.borrow_mut() = accounts.iter().map(|a| a.to_string()).collect();
    }

    pub fn fail_eth_accounts(&self, err: ProviderRpcError) {
        *self.accounts_error.borrow_mut() = Some(err);
    }

    /// Next `eth_requestAccounts` resolves immediately with `reply`.
    pub fn reply(&self, reply: Reply) {
        self.replies.borrow_mut().push_back(Scripted::Now(reply));
    }

    pub fn approve(&self, accounts: &[&str]) {
        self.reply(Ok(json!(accounts)));
    }

    pub fn reject(&self, code: i64, message: &str) {
        self.reply(Err(ProviderRpcError::new(code, message)));
    }

    /// Next `eth_requestAccounts` stays pending until the sender is used.
    pub fn defer(&self) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.replies.borrow_mut().push_back(Scripted::Deferred(rx));
        tx
    }

    pub fn refuse_listener(&self, kind: ProviderEventKind) {
        self.refuse_listener.set(Some(kind));
    }

    pub fn calls(&self) -> Vec<RpcMethod> {
        self.calls.borrow().clone()
    }

    pub fn interactive_calls(&self) -> usize {
        self.calls().iter().filter(|m| m.is_interactive()).count()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Deliver a raw notification to every listener on `kind`.
    pub fn emit(&self, kind: ProviderEventKind, payload: Value) {
        let listeners: Vec<ProviderListener> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .map(|(_, _, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(payload.clone());
        }
    }

    pub fn emit_accounts(&self, accounts: &[&str]) {
        self.emit(ProviderEventKind::AccountsChanged, json!(accounts));
    }

    pub fn emit_chain(&self, chain_id: &str) {
        self.emit(ProviderEventKind::ChainChanged, json!(chain_id));
    }
}

#[async_trait(?Send)]
impl WalletProvider for FakeProvider {
    fn has_marker(&self, marker: &str) -> bool {
        marker == "isMetaMask" && self.metamask.get()
    }

    async fn request(&self, method: RpcMethod) -> Result<Value, ProviderRpcError> {
        self.calls.borrow_mut().push(method);
        match method {
            RpcMethod::Accounts => match self.accounts_error.borrow().clone() {
                Some(err) => Err(err),
                None => Ok(json!(self.authorized.borrow().clone())),
            },
            RpcMethod::RequestAccounts => {
                let scripted = self.replies.borrow_mut().pop_front();
                match scripted {
                    Some(Scripted::Now(reply)) => reply,
                    Some(Scripted::Deferred(rx)) => rx
                        .await
                        .unwrap_or_else(|_| Err(ProviderRpcError::uncoded("request dropped"))),
                    None => Ok(json!(self.authorized.borrow().clone())),
                }
            }
        }
    }

    fn add_listener(
        &self,
        kind: ProviderEventKind,
        listener: ProviderListener,
    ) -> Result<ListenerId, ProviderRpcError> {
        if self.refuse_listener.get() == Some(kind) {
            return Err(ProviderRpcError::uncoded("listener limit reached"));
        }
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, kind, listener));
        Ok(id)
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|(existing, _, _)| *existing != id);
    }
}

/// `window.ethereum` lookup that tests can install, remove or swap.
#[derive(Default)]
pub struct FakeSource {
    provider: RefCell<Option<Rc<FakeProvider>>>,
}

impl FakeSource {
    pub fn with(provider: Option<Rc<FakeProvider>>) -> Rc<Self> {
        Rc::new(Self {
            provider: RefCell::new(provider),
        })
    }

    pub fn install(&self, provider: Rc<FakeProvider>) {
        *self.provider.borrow_mut() = Some(provider);
    }

    pub fn remove(&self) {
        self.provider.borrow_mut().take();
    }
}

impl ProviderSource for FakeSource {
    fn current(&self) -> Option<Rc<dyn WalletProvider>> {
        self.provider
            .borrow()
            .as_ref()
            .map(|provider| Rc::clone(provider) as Rc<dyn WalletProvider>)
    }
}

#[derive(Default)]
pub struct FakeHost {
    pub reloads: Cell<u32>,
    pub closes: Cell<u32>,
}

impl Host for FakeHost {
    fn reload(&self) {
        self.reloads.set(self.reloads.get() + 1);
    }

    fn close_modal(&self) {
        self.closes.set(self.closes.get() + 1);
    }
}

pub struct Harness {
    pub source: Rc<FakeSource>,
    pub host: Rc<FakeHost>,
    pub scheduler: ManualScheduler,
    pub session: Rc<WalletSession>,
}

pub fn config() -> SessionConfig {
    SessionConfig::default().with_dismiss_delay(DISMISS_DELAY)
}

pub fn mount(provider: Option<Rc<FakeProvider>>) -> Harness {
    init_tracing();
    let source = FakeSource::with(provider);
    let host = Rc::new(FakeHost::default());
    let scheduler = ManualScheduler::new();
    let session = WalletSession::mount(
        config(),
        Rc::clone(&source) as Rc<dyn ProviderSource>,
        Rc::clone(&host) as Rc<dyn Host>,
        Rc::new(scheduler.clone()),
    )
    .expect("mount should succeed");

    Harness {
        source,
        host,
        scheduler,
        session: Rc::new(session),
    }
}
