//! Configuration types for the kiosk.
//!
//! This module provides CLI argument parsing via `arrrg` and the resolved
//! configuration used to build the client and the controller.

use std::time::Duration;

use arrrg_derive::CommandLine;

use crate::client::{DEFAULT_TIMEOUT, OrderClient};
use crate::error::Result;

/// Default pause between a confirmed order and the next session.
pub(crate) const DEFAULT_RESTART_DELAY: Duration = Duration::from_secs(2);

/// Command-line arguments for the nopickles-kiosk tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct KioskArgs {
    /// Base URL of the ordering service.
    #[arrrg(optional, "Service base URL (default: $NOPICKLES_BASE_URL or http://127.0.0.1:8000/)", "URL")]
    pub base_url: Option<String>,

    /// Request timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds (default: 30)", "SECONDS")]
    pub timeout_secs: Option<u64>,

    /// Delay before a new session starts after checkout.
    #[arrrg(optional, "Milliseconds to wait after checkout before restarting (default: 2000)", "MILLIS")]
    pub restart_delay_ms: Option<u64>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Resolved configuration for a kiosk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KioskConfig {
    /// Service base URL.  `None` defers to the environment and then the default.
    pub base_url: Option<String>,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Pause between a confirmed order and the next session.
    pub restart_delay: Duration,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl KioskConfig {
    /// Creates a new KioskConfig with default values.
    ///
    /// Defaults:
    /// - Base URL: from the environment, else http://127.0.0.1:8000/
    /// - Timeout: 30 seconds
    /// - Restart delay: 2 seconds
    /// - Color: enabled
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            restart_delay: DEFAULT_RESTART_DELAY,
            use_color: true,
        }
    }

    /// Sets the service base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the post-checkout restart delay.
    pub fn with_restart_delay(mut self, delay: Duration) -> Self {
        self.restart_delay = delay;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Builds a client for the configured service.
    pub fn client(&self) -> Result<OrderClient> {
        OrderClient::with_options(self.base_url.clone(), Some(self.timeout))
    }
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<KioskArgs> for KioskConfig {
    fn from(args: KioskArgs) -> Self {
        let defaults = KioskConfig::new();
        KioskConfig {
            base_url: args.base_url,
            timeout: args
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            restart_delay: args
                .restart_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.restart_delay),
            use_color: !args.no_color,
        }
    }
}
