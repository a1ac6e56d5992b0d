//! Session data model.

use serde::Serialize;

use crate::error::ConnectError;

/// Connection status as seen by consumers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

/// Wallet connection state.
///
/// The address lives inside `Connected` and the error inside `Error`, so a
/// session cannot carry an address while disconnected or an error while
/// connected.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub enum WalletState {
    #[default]
    Disconnected,
    Connecting,
    Connected { address: String },
    Error(ConnectError),
}

impl WalletState {
    pub fn status(&self) -> ConnectionStatus {
        match self {
            WalletState::Disconnected => ConnectionStatus::Disconnected,
            WalletState::Connecting => ConnectionStatus::Connecting,
            WalletState::Connected { .. } => ConnectionStatus::Connected,
            WalletState::Error(_) => ConnectionStatus::Error,
        }
    }
}

/// The single in-memory session of a page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    pub state: WalletState,
    /// Last probe result. `false` until the first probe runs.
    pub provider_capable: bool,
}

impl Session {
    pub fn status(&self) -> ConnectionStatus {
        self.state.status()
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.state, WalletState::Connected { .. })
    }

    pub fn address(&self) -> Option<&str> {
        match &self.state {
            WalletState::Connected { address } => Some(address),
            _ => None,
        }
    }

    pub fn last_error(&self) -> Option<&ConnectError> {
        match &self.state {
            WalletState::Error(err) => Some(err),
            _ => None,
        }
    }
}

/// Inputs to [`SessionStore::transition`](crate::store::SessionStore::transition).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// User asked to connect.
    ConnectStart,
    /// Account access granted to the in-flight request.
    ConnectSucceeded(String),
    /// Already-authorized account found at mount.
    Restored(String),
    ConnectFailed(ConnectError),
    /// Provider account list changed; first entry is the active account.
    AccountsChanged(Vec<String>),
    /// Provider switched chains. Never changes state; the host reloads.
    ChainChanged,
    DisconnectRequested,
    /// Result of re-running the provider probe.
    CapabilityProbed(bool),
}

impl SessionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::ConnectStart => "connect_start",
            SessionEvent::ConnectSucceeded(_) => "connect_succeeded",
            SessionEvent::Restored(_) => "restored",
            SessionEvent::ConnectFailed(_) => "connect_failed",
            SessionEvent::AccountsChanged(_) => "accounts_changed",
            SessionEvent::ChainChanged => "chain_changed",
            SessionEvent::DisconnectRequested => "disconnect_requested",
            SessionEvent::CapabilityProbed(_) => "capability_probed",
        }
    }
}
