//! # Session Error Types
//!
//! Two layers, both `thiserror` enums:
//!
//! - [`ConnectError`]: why the last connect attempt failed. Stored in the
//!   [`Session`](crate::model::Session) as `last_error` and rendered as the
//!   modal's status line, so it is `Clone + PartialEq + Serialize`.
//! - [`AppError`]: what an operation on the session returns. Wraps
//!   `ConnectError` and adds the precondition short-circuits that never reach
//!   the session (`NotCapable`, `ConnectInFlight`).
//!
//! None of these propagate as faults. The modal renders them and the only
//! retry is the user pressing "Connect" again.
//!
//! ```rust
//! use lib_session::error::{AppError, ConnectError};
//!
//! let err = AppError::from(ConnectError::UserRejected);
//! assert!(!err.is_alarming());
//! assert_eq!(err.user_message(), "You declined the connection request.");
//! ```

use serde::Serialize;
use shared::ProviderRpcError;
use thiserror::Error;

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Reason a connect attempt ended without an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", content = "detail")]
pub enum ConnectError {
    /// The user explicitly declined the account-access prompt (code 4001).
    #[error("User rejected the request")]
    UserRejected,

    /// Any other provider failure: extension error, unexpected payload,
    /// empty account list, abandoned attempt.
    #[error("Provider request failed: {0}")]
    RequestFailed(String),
}

impl ConnectError {
    /// Text for the modal status line.
    ///
    /// Rejection is phrased as information, everything else as a failure.
    pub fn user_message(&self) -> String {
        match self {
            ConnectError::UserRejected => "You declined the connection request.".to_string(),
            ConnectError::RequestFailed(detail) => {
                format!("Could not connect to your wallet: {}", detail)
            }
        }
    }

    pub fn is_alarming(&self) -> bool {
        !matches!(self, ConnectError::UserRejected)
    }
}

impl From<ProviderRpcError> for ConnectError {
    fn from(err: ProviderRpcError) -> Self {
        if err.is_user_rejection() {
            ConnectError::UserRejected
        } else if err.is_request_pending() {
            ConnectError::RequestFailed(
                "a connection request is already open in your wallet".to_string(),
            )
        } else if err.message.is_empty() {
            ConnectError::RequestFailed(format!("provider error {:?}", err.code))
        } else {
            ConnectError::RequestFailed(err.message)
        }
    }
}

/// Error returned by session operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// No wallet provider in the environment. A precondition, not a failure.
    #[error("No wallet provider detected")]
    NotCapable,

    /// A connect attempt is already waiting on the wallet.
    #[error("A connection attempt is already in progress")]
    ConnectInFlight,

    /// The connect attempt itself failed; also recorded in the session.
    #[error(transparent)]
    Connect(#[from] ConnectError),

    /// Provider plumbing failure outside a connect attempt (listener registration).
    #[error("Provider error: {0}")]
    Provider(String),

    /// Invalid session configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn user_message(&self) -> String {
        match self {
            AppError::NotCapable => "You need to install a wallet to continue.".to_string(),
            AppError::ConnectInFlight => "Check your wallet, a request is waiting for you.".to_string(),
            AppError::Connect(err) => err.user_message(),
            AppError::Provider(_) | AppError::Config(_) => "Wallet support is unavailable.".to_string(),
        }
    }

    pub fn is_alarming(&self) -> bool {
        match self {
            AppError::NotCapable | AppError::ConnectInFlight => false,
            AppError::Connect(err) => err.is_alarming(),
            AppError::Provider(_) | AppError::Config(_) => true,
        }
    }
}

impl From<ProviderRpcError> for AppError {
    fn from(err: ProviderRpcError) -> Self {
        AppError::Connect(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_is_informational() {
        let err: ConnectError = ProviderRpcError::new(4001, "User rejected the request.").into();
        assert_eq!(err, ConnectError::UserRejected);
        assert!(!err.is_alarming());
    }

    #[test]
    fn test_other_codes_are_failures() {
        let err: ConnectError = ProviderRpcError::new(-32603, "Internal JSON-RPC error.").into();
        assert_eq!(
            err,
            ConnectError::RequestFailed("Internal JSON-RPC error.".to_string())
        );
        assert!(err.is_alarming());
        assert_ne!(err.user_message(), ConnectError::UserRejected.user_message());
    }

    #[test]
    fn test_pending_request_has_dedicated_message() {
        let err: ConnectError = ProviderRpcError::new(-32002, "").into();
        assert!(err.user_message().contains("already open"));
    }

    #[test]
    fn test_uncoded_without_message() {
        let err: ConnectError = ProviderRpcError::uncoded("").into();
        assert_eq!(err, ConnectError::RequestFailed("provider error None".to_string()));
    }

    #[test]
    fn test_connect_error_serializes_tagged() {
        let json = serde_json::to_value(ConnectError::RequestFailed("boom".into())).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "RequestFailed", "detail": "boom" }));
    }
}
