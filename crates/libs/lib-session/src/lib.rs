//! # Wallet Session Library
//!
//! In-memory wallet connection session for the dashboard: provider
//! detection, the "Connect MetaMask" flow, provider account/chain events and
//! the state the navbar and wallet modal render.
//!
//! ## Modules
//!
//! - **[`model`]**: `Session`, `WalletState`, `SessionEvent`
//! - **[`store`]**: the single mutable cell and its transition table
//! - **[`probe`]**: provider capability check
//! - **[`controller`]**: user-initiated sign in
//! - **[`subscriber`]**: provider notifications and mount-time restore
//! - **[`scheduler`]**: cancellable delayed tasks, logical-time scheduler
//! - **[`modal`]**: view contract for the modal and navbar
//! - **[`session`]**: `WalletSession`, wiring and teardown
//! - **[`provider`]**: traits for the provider, its lookup and the host page
//! - **[`config`]** / **[`error`]**
//!
//! Everything is single-threaded (`Rc`, `RefCell`); the browser event loop
//! is the only executor.

pub mod config;
pub mod controller;
pub mod error;
pub mod modal;
pub mod model;
pub mod probe;
pub mod provider;
pub mod scheduler;
pub mod session;
pub mod store;
pub mod subscriber;

// Re-export commonly used types
pub use config::SessionConfig;
pub use error::{AppError, ConnectError, Result};
pub use modal::{ModalAction, ModalView, Tone};
pub use model::{ConnectionStatus, Session, SessionEvent, WalletState};
pub use provider::{Host, ListenerId, ProviderListener, ProviderSource, WalletProvider};
pub use scheduler::{ManualScheduler, ScheduledTask, Scheduler};
pub use session::WalletSession;
pub use store::{SessionStore, SubscriptionId};
