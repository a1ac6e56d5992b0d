//! Browser implementations of the session's host seams

pub mod ethereum;
pub mod timer;

pub use ethereum::WindowProviderSource;
pub use timer::TimeoutScheduler;
