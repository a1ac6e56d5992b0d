//! CryptoMoon Wallet Web App - Leptos Frontend

use leptos::prelude::*;

use crate::components::{Navbar, WalletModal};
use crate::state::wallet::provide_wallet_context;

#[component]
pub fn App() -> impl IntoView {
    provide_wallet_context();

    view! {
        <div class="app-container">
            <Navbar/>
            <WalletModal/>
        </div>
    }
}
