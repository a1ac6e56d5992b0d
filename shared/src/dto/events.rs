use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::dto::rpc::parse_accounts;

/// Notification channels the session subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderEventKind {
    #[serde(rename = "accountsChanged")]
    AccountsChanged,
    #[serde(rename = "chainChanged")]
    ChainChanged,
}

impl ProviderEventKind {
    pub const ALL: [ProviderEventKind; 2] = [
        ProviderEventKind::AccountsChanged,
        ProviderEventKind::ChainChanged,
    ];

    /// Event name passed to `provider.on` / `provider.removeListener`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderEventKind::AccountsChanged => "accountsChanged",
            ProviderEventKind::ChainChanged => "chainChanged",
        }
    }
}

/// A decoded provider notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    /// New authorized account list; `[]` means access was revoked or the wallet locked.
    AccountsChanged(Vec<String>),
    /// New chain id (hex string). Only the fact of the change is used.
    ChainChanged(String),
}

impl ProviderEvent {
    pub fn kind(&self) -> ProviderEventKind {
        match self {
            ProviderEvent::AccountsChanged(_) => ProviderEventKind::AccountsChanged,
            ProviderEvent::ChainChanged(_) => ProviderEventKind::ChainChanged,
        }
    }

    /// Decode the raw payload delivered on channel `kind`.
    pub fn from_payload(kind: ProviderEventKind, payload: Value) -> Result<Self, PayloadError> {
        match kind {
            ProviderEventKind::AccountsChanged => {
                parse_accounts(payload).map(ProviderEvent::AccountsChanged)
            }
            ProviderEventKind::ChainChanged => match payload {
                Value::String(chain_id) => Ok(ProviderEvent::ChainChanged(chain_id)),
                // Some older providers emit the chain id as a number
                Value::Number(n) => match n.as_u64() {
                    Some(id) => Ok(ProviderEvent::ChainChanged(format!("{:#x}", id))),
                    None => Err(PayloadError::UnexpectedShape {
                        expected: "chain id",
                        found: n.to_string(),
                    }),
                },
                other => Err(PayloadError::UnexpectedShape {
                    expected: "chain id",
                    found: other.to_string(),
                }),
            },
        }
    }
}

/// Provider payload did not have the documented shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("unexpected payload: expected {expected}, found {found}")]
    UnexpectedShape {
        expected: &'static str,
        found: String,
    },
}
