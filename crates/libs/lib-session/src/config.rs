//! # Session Configuration
//!
//! Loaded from environment variables with defaults for every field. The
//! browser build has no environment, so it always runs on the defaults;
//! native hosts and tests can override them.
//!
//! | Variable | Default |
//! |---|---|
//! | `WALLET_DISMISS_DELAY_MS` | `2000` |
//! | `WALLET_PROVIDER_MARKER` | `isMetaMask` |
//! | `WALLET_ONBOARDING_URL` | `https://metamask.io/download/` |

use std::env;
use std::time::Duration;

use crate::error::{AppError, Result};

pub const DEFAULT_DISMISS_DELAY_MS: u64 = 2000;
pub const DEFAULT_PROVIDER_MARKER: &str = "isMetaMask";
pub const DEFAULT_ONBOARDING_URL: &str = "https://metamask.io/download/";

const MAX_DISMISS_DELAY: Duration = Duration::from_secs(30);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Pause between a connect outcome and the modal closing, so the status
    /// line can be read.
    pub dismiss_delay: Duration,

    /// Boolean attribute the injected provider must carry to count as capable.
    pub provider_marker: String,

    /// Where "Install MetaMask" sends the user.
    pub onboarding_url: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            dismiss_delay: Duration::from_millis(DEFAULT_DISMISS_DELAY_MS),
            provider_marker: DEFAULT_PROVIDER_MARKER.to_string(),
            onboarding_url: DEFAULT_ONBOARDING_URL.to_string(),
        }
    }
}

impl SessionConfig {
    /// Load configuration from environment variables, then validate it.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let dismiss_delay = match var("WALLET_DISMISS_DELAY_MS") {
            Some(raw) => Duration::from_millis(raw.trim().parse().map_err(|e| {
                AppError::Config(format!("WALLET_DISMISS_DELAY_MS must be a number: {}", e))
            })?),
            None => defaults.dismiss_delay,
        };

        let config = Self {
            dismiss_delay,
            provider_marker: var("WALLET_PROVIDER_MARKER").unwrap_or(defaults.provider_marker),
            onboarding_url: var("WALLET_ONBOARDING_URL").unwrap_or(defaults.onboarding_url),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.dismiss_delay.is_zero() || self.dismiss_delay > MAX_DISMISS_DELAY {
            return Err(AppError::Config(format!(
                "dismiss delay must be between 1ms and {}s",
                MAX_DISMISS_DELAY.as_secs()
            )));
        }

        if self.provider_marker.trim().is_empty() {
            return Err(AppError::Config("provider marker must not be empty".to_string()));
        }

        if !(self.onboarding_url.starts_with("https://") || self.onboarding_url.starts_with("http://")) {
            return Err(AppError::Config(format!(
                "onboarding url must be http(s): {}",
                self.onboarding_url
            )));
        }

        Ok(())
    }

    pub fn with_dismiss_delay(mut self, delay: Duration) -> Self {
        self.dismiss_delay = delay;
        self
    }
}
