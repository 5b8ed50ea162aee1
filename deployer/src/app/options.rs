//! Client configuration options

use std::time::Duration;

use crate::utils::CooldownOptions;

/// Options for the deploy call
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Upper bound on the whole request, connect included
    pub timeout: Duration,

    /// Retry policy for transport failures
    pub retry: RetryOptions,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            retry: RetryOptions::default(),
        }
    }
}

/// Retry policy
///
/// Only transport failures are retried. A reply from the service, whatever
/// its status or content, ends the run.
#[derive(Debug, Clone)]
pub struct RetryOptions {
    /// Whether to retry at all
    pub enabled: bool,

    /// Attempts allowed after the first one
    pub max_retries: u32,

    /// Delay between attempts
    pub cooldown: CooldownOptions,
}

impl RetryOptions {
    /// Number of retries actually permitted by this policy
    pub fn allowed_retries(&self) -> u32 {
        if self.enabled {
            self.max_retries
        } else {
            0
        }
    }
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            max_retries: 1,
            cooldown: CooldownOptions::default(),
        }
    }
}
