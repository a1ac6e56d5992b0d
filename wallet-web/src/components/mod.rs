//! UI Components

pub mod navbar;
pub mod wallet_modal;

pub use navbar::Navbar;
pub use wallet_modal::WalletModal;
