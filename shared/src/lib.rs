//! # Shared Wallet Protocol Types
//!
//! Wire-level contract between the wallet session core and the injected
//! browser wallet provider (EIP-1193 style `request` / `on` / `removeListener`).
//!
//! ## Structure
//!
//! - **[`dto`]**: Protocol types
//!   - **[`dto::rpc`]**: RPC method names and the provider error object
//!   - **[`dto::events`]**: Provider notification kinds and payload parsing
//! - **[`utils`]**: Shared utility functions
//!   - **[`utils::format_address`]**: Format wallet addresses for display
//!   - **[`utils::truncate_address`]**: Navbar-sized address
//!
//! ## Wire Format
//!
//! Payloads arrive as JSON-shaped values (`serde_json::Value`). The browser
//! binding converts JS values into that shape; the core never touches JS types.
//!
//! ```rust
//! use shared::dto::events::{ProviderEvent, ProviderEventKind};
//! use serde_json::json;
//!
//! let event = ProviderEvent::from_payload(ProviderEventKind::AccountsChanged, json!(["0xAA"])).unwrap();
//! assert_eq!(event, ProviderEvent::AccountsChanged(vec!["0xAA".to_string()]));
//! ```

pub mod dto;
pub mod utils;

pub use dto::*;
pub use utils::*;
