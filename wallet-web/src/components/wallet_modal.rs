//! Wallet Modal Component
//!
//! Renders the current [`ModalView`](lib_session::ModalView). The single
//! action button maps straight onto the session operations.

use leptos::prelude::*;
use lib_session::{ModalAction, Tone};

use crate::state::wallet::{use_wallet_context, WalletContext};

fn tone_class(tone: Tone) -> &'static str {
    match tone {
        Tone::Neutral => "info",
        Tone::Pending => "info pending",
        Tone::Success => "success",
        Tone::Info => "info",
        Tone::Alarm => "error",
    }
}

fn open_onboarding(wallet: &WalletContext) {
    let (Some(url), Some(window)) = (wallet.onboarding_url(), web_sys::window()) else {
        return;
    };
    if let Err(e) = window.open_with_url_and_target(&url, "_blank") {
        log::error!("could not open {}: {:?}", url, e);
    }
}

#[component]
pub fn WalletModal() -> impl IntoView {
    let wallet = use_wallet_context();

    let on_action = move |action: ModalAction| match action {
        ModalAction::Install => open_onboarding(&wallet),
        ModalAction::Connect => wallet.sign_in(),
        ModalAction::Disconnect => wallet.disconnect(),
        ModalAction::None => {}
    };

    view! {
        <Show when=move || wallet.modal_open.get()>
            <div class="modal-overlay" on:click=move |_| wallet.close_modal()>
                <div class="card modal" on:click=|ev: leptos::ev::MouseEvent| ev.stop_propagation()>
                    <button class="modal-close" on:click=move |_| wallet.close_modal()>"×"</button>
                    {move || {
                        let current = wallet.view();
                        let action = current.action;
                        view! {
                            <div>
                                <h1 style="color: #ffffff; font-size: 28px; margin-bottom: 12px; font-weight: 700;">
                                    {current.headline}
                                </h1>
                                <div class=tone_class(current.tone)>
                                    <p style="text-align: center; word-break: break-all;">
                                        {current.description}
                                    </p>
                                </div>
                                {(action != ModalAction::None).then(|| view! {
                                    <button
                                        class="btn"
                                        style="width: 100%;"
                                        on:click=move |_| on_action(action)
                                    >
                                        {action.label()}
                                    </button>
                                })}
                            </div>
                        }
                    }}
                </div>
            </div>
        </Show>
    }
}
