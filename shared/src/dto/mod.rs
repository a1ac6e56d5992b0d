//! # Provider Protocol Types
//!
//! - [`rpc`] - `request()` method names, provider error object, account list decoding
//! - [`events`] - `accountsChanged` / `chainChanged` notifications
//!
//! ## Example Exchange
//!
//! ```text
//! provider.request({ method: "eth_requestAccounts" })
//!   -> ["0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"]
//!   -> throws { code: 4001, message: "User rejected the request." }
//!
//! provider.on("accountsChanged", ["0x..."])
//! provider.on("chainChanged", "0x1")
//! ```

pub mod events;
pub mod rpc;

pub use events::{PayloadError, ProviderEvent, ProviderEventKind};
pub use rpc::{parse_accounts, ProviderRpcError, RpcMethod};
