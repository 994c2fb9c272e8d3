use std::time::Duration;

#[cfg(feature = "with-serde")]
use serde::{Deserialize, Serialize};

/// Configuration knobs for [`check_email_address`](super::check_email_address)
/// and [`spawn_check`](super::spawn_check).
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOptions {
    /// Global deadline for one lookup, in milliseconds.
    pub timeout_ms: u64,
    /// Attempts per name server before the resolver gives up.
    pub attempts: usize,
    /// Read `/etc/resolv.conf` (or the platform equivalent); otherwise use the
    /// resolver's built-in public servers.
    pub use_system_conf: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 5_000,
            attempts: 2,
            use_system_conf: true,
        }
    }
}

impl CheckOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the timeout as a [`Duration`]. A zero timeout disables the
    /// outer deadline; the resolver's own per-query timeout still applies.
    pub fn timeout(&self) -> Option<Duration> {
        if self.timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.timeout_ms))
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_attempts(mut self, attempts: usize) -> Self {
        self.attempts = attempts;
        self
    }

    pub fn with_system_conf(mut self, use_system_conf: bool) -> Self {
        self.use_system_conf = use_system_conf;
        self
    }
}
