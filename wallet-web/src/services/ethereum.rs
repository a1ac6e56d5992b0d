//! EIP-1193 Provider Integration via wasm-bindgen
//!
//! Binds the injected `window.ethereum` object to the session's
//! [`WalletProvider`] seam. The object is looked up again on every
//! [`ProviderSource::current`] call: extensions inject late and users can
//! install or disable them while the page is open.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;
use lib_session::{ListenerId, ProviderListener, ProviderSource, WalletProvider};
use serde_json::Value;
use shared::{ProviderEventKind, ProviderRpcError, RpcMethod};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

// ============================================================================
// JAVASCRIPT INTEROP
// ============================================================================

#[wasm_bindgen(inline_js = "
export function injectedProvider() {
    if (typeof window === 'undefined' || !window.ethereum) {
        return null;
    }
    return window.ethereum;
}

export function hasFlag(provider, flag) {
    return !!provider && provider[flag] === true;
}

export async function requestMethod(provider, method) {
    return await provider.request({ method: method });
}

export function addProviderListener(provider, event, handler) {
    if (typeof provider.on !== 'function') {
        throw new Error('provider does not support events');
    }
    provider.on(event, handler);
}

export function removeProviderListener(provider, event, handler) {
    if (typeof provider.removeListener === 'function') {
        provider.removeListener(event, handler);
    }
}
")]
extern "C" {
    fn injectedProvider() -> Option<JsValue>;

    fn hasFlag(provider: &JsValue, flag: &str) -> bool;

    #[wasm_bindgen(catch)]
    async fn requestMethod(provider: &JsValue, method: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    fn addProviderListener(
        provider: &JsValue,
        event: &str,
        handler: &js_sys::Function,
    ) -> Result<(), JsValue>;

    fn removeProviderListener(provider: &JsValue, event: &str, handler: &js_sys::Function);
}

// ============================================================================
// PROVIDER
// ============================================================================

type Handler = Closure<dyn FnMut(JsValue)>;

/// One `window.ethereum` object as seen at lookup time.
pub struct InjectedProvider {
    object: JsValue,
    handlers: RefCell<HashMap<ListenerId, (ProviderEventKind, Handler)>>,
    next_id: Cell<u64>,
}

impl InjectedProvider {
    fn new(object: JsValue) -> Self {
        Self {
            object,
            handlers: RefCell::new(HashMap::new()),
            next_id: Cell::new(1),
        }
    }

    fn unregister(&self, kind: ProviderEventKind, handler: &Handler) {
        removeProviderListener(&self.object, kind.as_str(), handler.as_ref().unchecked_ref());
    }
}

#[async_trait(?Send)]
impl WalletProvider for InjectedProvider {
    fn has_marker(&self, marker: &str) -> bool {
        hasFlag(&self.object, marker)
    }

    async fn request(&self, method: RpcMethod) -> Result<Value, ProviderRpcError> {
        log::debug!("provider request: {}", method);
        let reply = requestMethod(&self.object, method.as_str())
            .await
            .map_err(rpc_error)?;
        serde_wasm_bindgen::from_value(reply)
            .map_err(|e| ProviderRpcError::uncoded(format!("unreadable provider reply: {}", e)))
    }

    fn add_listener(
        &self,
        kind: ProviderEventKind,
        listener: ProviderListener,
    ) -> Result<ListenerId, ProviderRpcError> {
        let handler: Handler = Closure::new(move |payload: JsValue| {
            match serde_wasm_bindgen::from_value::<Value>(payload) {
                Ok(value) => listener(value),
                Err(e) => log::warn!("dropping {} notification: {}", kind.as_str(), e),
            }
        });

        addProviderListener(&self.object, kind.as_str(), handler.as_ref().unchecked_ref())
            .map_err(rpc_error)?;

        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.handlers.borrow_mut().insert(id, (kind, handler));
        Ok(id)
    }

    fn remove_listener(&self, id: ListenerId) {
        // Release the borrow before calling into JS.
        let removed = self.handlers.borrow_mut().remove(&id);
        if let Some((kind, handler)) = removed {
            self.unregister(kind, &handler);
        }
    }
}

impl Drop for InjectedProvider {
    fn drop(&mut self) {
        let handlers = std::mem::take(self.handlers.get_mut());
        for (kind, handler) in handlers.into_values() {
            self.unregister(kind, &handler);
        }
    }
}

/// Converts a rejected provider promise into a [`ProviderRpcError`].
///
/// Provider errors are `Error` instances whose `message` is not enumerable,
/// so the fields are read directly instead of through serde.
fn rpc_error(err: JsValue) -> ProviderRpcError {
    if let Some(text) = err.as_string() {
        return ProviderRpcError::uncoded(text);
    }

    let field = |name: &str| js_sys::Reflect::get(&err, &JsValue::from_str(name)).ok();
    let code = field("code").and_then(|v| v.as_f64()).map(|c| c as i64);
    let message = field("message")
        .and_then(|v| v.as_string())
        .unwrap_or_else(|| format!("{:?}", err));

    match code {
        Some(code) => ProviderRpcError::new(code, message),
        None => ProviderRpcError::uncoded(message),
    }
}

// ============================================================================
// LOOKUP
// ============================================================================

/// Reads `window.ethereum` on every call.
#[derive(Clone, Copy, Default)]
pub struct WindowProviderSource;

impl ProviderSource for WindowProviderSource {
    fn current(&self) -> Option<Rc<dyn WalletProvider>> {
        injectedProvider().map(|object| Rc::new(InjectedProvider::new(object)) as Rc<dyn WalletProvider>)
    }
}
