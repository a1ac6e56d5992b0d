//! Navigation Bar Component

use leptos::prelude::*;

use crate::state::wallet::use_wallet_context;

#[component]
pub fn Navbar() -> impl IntoView {
    let wallet = use_wallet_context();

    view! {
        <nav>
            <div style="max-width: 1200px; margin: 0 auto; padding: 0 24px; display: flex; justify-content: space-between; align-items: center;">
                <a href="/" class="nav-link-clean">
                    <span class="nav-title">"CryptoMoon"</span>
                </a>
                <button
                    class=move || if wallet.is_connected() { "btn wallet-button connected" } else { "btn wallet-button" }
                    on:click=move |_| wallet.open_modal()
                >
                    {move || wallet.navbar_label()}
                </button>
            </div>
        </nav>
    }
}
