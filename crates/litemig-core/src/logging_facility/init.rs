//! Logging initialization module

use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output, debug level for litemig targets
    Development,
    /// JSON structured output, info level for litemig targets
    Production,
    /// No output; tests install their own capture layer
    Test,
}

impl Profile {
    /// Filter used when `RUST_LOG` is not set
    pub fn default_filter(&self) -> &'static str {
        match self {
            Profile::Development => "litemig=debug",
            Profile::Production => "litemig=info",
            Profile::Test => "off",
        }
    }
}

static INIT_ONCE: Once = Once::new();

/// Initialize the logging facility
///
/// Only the first call has an effect. `RUST_LOG` overrides the profile's
/// default filter. If another global subscriber is already installed
/// (for instance the test capture layer) it is left in place.
///
/// # Example
///
/// ```
/// use litemig_core::logging_facility::{init, Profile};
///
/// init(Profile::Production);
/// ```
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(profile.default_filter()));

        let _ = match profile {
            Profile::Development => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .finish()
                .try_init(),
            Profile::Production => tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .finish()
                .try_init(),
            Profile::Test => tracing_subscriber::registry().try_init(),
        };
    });
}
