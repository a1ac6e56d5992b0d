//! CryptoMoon wallet sign-in for the browser
//!
//! Mounts the navbar wallet button and the wallet modal on top of
//! `lib-session`, talking to MetaMask through `window.ethereum`.

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

mod app;
mod components;
mod services;
mod state;

use app::App;

#[wasm_bindgen(start)]
pub fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Core logs arrive here through tracing's `log` feature
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("CryptoMoon wallet starting");

    leptos::mount::mount_to_body(|| view! { <App/> });
}
