//! # Modal View Contract
//!
//! What the wallet modal and the navbar affordance render, derived purely
//! from a [`Session`] snapshot. The view layer holds no state of its own.

use serde::Serialize;
use shared::truncate_address;

use crate::error::ConnectError;
use crate::model::{Session, WalletState};

/// The single button the modal offers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ModalAction {
    /// Open the wallet download page.
    Install,
    Connect,
    Disconnect,
    None,
}

impl ModalAction {
    pub fn label(&self) -> &'static str {
        match self {
            ModalAction::Install => "Install MetaMask",
            ModalAction::Connect => "Connect MetaMask",
            ModalAction::Disconnect => "Disconnect",
            ModalAction::None => "",
        }
    }
}

/// How the status line is styled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Tone {
    Neutral,
    Pending,
    Success,
    /// Not an error, e.g. the user declined.
    Info,
    Alarm,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ModalView {
    pub headline: String,
    pub description: String,
    pub action: ModalAction,
    pub tone: Tone,
}

impl ModalView {
    pub fn derive(session: &Session) -> Self {
        match &session.state {
            WalletState::Connected { address } => Self::new("Connected!", address, ModalAction::Disconnect, Tone::Success),
            WalletState::Connecting => Self::new(
                "Waiting for your wallet",
                "Approve the connection request in MetaMask.",
                ModalAction::None,
                Tone::Pending,
            ),
            _ if !session.provider_capable => Self::new(
                "You need to Install a Wallet",
                "We recommend the MetaMask wallet.",
                ModalAction::Install,
                Tone::Neutral,
            ),
            WalletState::Disconnected => Self::new(
                "Connect your wallet",
                "To begin, please connect your MetaMask wallet.",
                ModalAction::Connect,
                Tone::Neutral,
            ),
            WalletState::Error(err @ ConnectError::UserRejected) => {
                Self::new("Connection declined", &err.user_message(), ModalAction::Connect, Tone::Info)
            }
            WalletState::Error(err) => {
                Self::new("Connection failed", &err.user_message(), ModalAction::Connect, Tone::Alarm)
            }
        }
    }

    fn new(headline: &str, description: &str, action: ModalAction, tone: Tone) -> Self {
        Self {
            headline: headline.to_string(),
            description: description.to_string(),
            action,
            tone,
        }
    }
}

/// Label for the navbar wallet button.
pub fn navbar_label(session: &Session) -> String {
    match &session.state {
        WalletState::Connected { address } => truncate_address(address),
        WalletState::Connecting => "Connecting...".to_string(),
        _ => "Connect Wallet".to_string(),
    }
}
