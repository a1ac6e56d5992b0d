use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::dto::events::PayloadError;

/// Provider error code for an explicit user decline (EIP-1193).
pub const USER_REJECTED_REQUEST: i64 = 4001;

/// Provider error code for "a request of this type is already pending".
pub const REQUEST_ALREADY_PENDING: i64 = -32002;

/// Methods this subsystem sends through `provider.request`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RpcMethod {
    /// Non-interactive: currently authorized accounts, or `[]`.
    #[serde(rename = "eth_accounts")]
    Accounts,
    /// Interactive: prompts the user to grant account access.
    #[serde(rename = "eth_requestAccounts")]
    RequestAccounts,
}

impl RpcMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RpcMethod::Accounts => "eth_accounts",
            RpcMethod::RequestAccounts => "eth_requestAccounts",
        }
    }

    /// Whether the wallet shows a prompt for this method.
    pub fn is_interactive(&self) -> bool {
        matches!(self, RpcMethod::RequestAccounts)
    }
}

impl std::fmt::Display for RpcMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error object thrown by a provider `request`.
///
/// Providers are not consistent: most throw `{ code, message }`, some throw
/// a bare string or an `Error` without a code. [`ProviderRpcError::from_value`]
/// accepts all of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("provider error {code:?}: {message}")]
pub struct ProviderRpcError {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ProviderRpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
            data: None,
        }
    }

    /// Error without a provider code (environment failure, thrown string).
    pub fn uncoded(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            data: None,
        }
    }

    /// Decode whatever the provider threw.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(message) => Self::uncoded(message),
            Value::Object(_) => serde_json::from_value::<ProviderRpcError>(value.clone())
                .unwrap_or_else(|_| Self::uncoded(value.to_string())),
            Value::Null => Self::uncoded("provider threw without a reason"),
            other => Self::uncoded(other.to_string()),
        }
    }

    pub fn is_user_rejection(&self) -> bool {
        self.code == Some(USER_REJECTED_REQUEST)
    }

    pub fn is_request_pending(&self) -> bool {
        self.code == Some(REQUEST_ALREADY_PENDING)
    }
}

/// Decode the result of `eth_accounts` / `eth_requestAccounts`.
///
/// The result must be an array of strings; anything else is rejected rather
/// than partially accepted.
pub fn parse_accounts(value: Value) -> Result<Vec<String>, PayloadError> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(account) => Ok(account),
                other => Err(PayloadError::UnexpectedShape {
                    expected: "string account",
                    found: other.to_string(),
                }),
            })
            .collect(),
        other => Err(PayloadError::UnexpectedShape {
            expected: "account array",
            found: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_method_wire_names() {
        assert_eq!(RpcMethod::Accounts.as_str(), "eth_accounts");
        assert_eq!(
            serde_json::to_value(RpcMethod::RequestAccounts).unwrap(),
            json!("eth_requestAccounts")
        );
        assert!(RpcMethod::RequestAccounts.is_interactive());
        assert!(!RpcMethod::Accounts.is_interactive());
    }

    #[test]
    fn test_error_from_coded_object() {
        let err = ProviderRpcError::from_value(json!({
            "code": 4001,
            "message": "User rejected the request."
        }));
        assert!(err.is_user_rejection());
        assert_eq!(err.message, "User rejected the request.");
    }

    #[test]
    fn test_error_from_pending_object() {
        let err = ProviderRpcError::from_value(json!({ "code": -32002, "message": "busy" }));
        assert!(err.is_request_pending());
        assert!(!err.is_user_rejection());
    }

    #[test]
    fn test_error_from_string_and_null() {
        let err = ProviderRpcError::from_value(json!("extension crashed"));
        assert_eq!(err.code, None);
        assert_eq!(err.message, "extension crashed");

        let err = ProviderRpcError::from_value(Value::Null);
        assert_eq!(err.code, None);
    }

    #[test]
    fn test_error_from_object_with_bad_code() {
        let err = ProviderRpcError::from_value(json!({ "code": "4001" }));
        assert_eq!(err.code, None);
        assert!(!err.is_user_rejection());
    }

    #[test]
    fn test_parse_accounts() {
        assert_eq!(
            parse_accounts(json!(["0x02", "0x03"])).unwrap(),
            vec!["0x02".to_string(), "0x03".to_string()]
        );
        assert!(parse_accounts(json!([])).unwrap().is_empty());
        assert!(parse_accounts(json!({ "accounts": [] })).is_err());
        assert!(parse_accounts(json!(["0x02", 3])).is_err());
    }
}
