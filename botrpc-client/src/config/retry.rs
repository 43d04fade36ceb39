//! Rate-limit retry budget.
//!
//! The service tells a client to slow down by answering with a failed
//! envelope carrying `parameters.retry_after`. Only that signal is retried;
//! every other failure is terminal. The delay is exactly what the service
//! asked for, with no jitter and no exponential growth.

use std::time::Duration;

use botrpc_core::Envelope;

/// Retries allowed when none is configured.
pub const DEFAULT_RETRY_BUDGET: u32 = 10;

/// How many times a rate-limited call may be repeated.
///
/// # Example
///
/// ```
/// use botrpc_client::RetryBudget;
///
/// assert!(RetryBudget::Limited(1).allows(0));
/// assert!(!RetryBudget::Limited(1).allows(1));
/// assert!(RetryBudget::Unlimited.allows(u32::MAX));
/// assert_eq!(RetryBudget::from(true), RetryBudget::Unlimited);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryBudget {
    /// At most this many retries after the first attempt.
    Limited(u32),
    /// Keep retrying for as long as the service asks to.
    Unlimited,
}

impl Default for RetryBudget {
    fn default() -> Self {
        RetryBudget::Limited(DEFAULT_RETRY_BUDGET)
    }
}

impl RetryBudget {
    /// A budget that never retries.
    pub const NONE: RetryBudget = RetryBudget::Limited(0);

    /// Whether a call that has already been retried `attempt` times may be
    /// retried again.
    pub fn allows(&self, attempt: u32) -> bool {
        match self {
            RetryBudget::Limited(max) => attempt < *max,
            RetryBudget::Unlimited => true,
        }
    }

    pub fn is_unlimited(&self) -> bool {
        matches!(self, RetryBudget::Unlimited)
    }
}

impl From<u32> for RetryBudget {
    fn from(max: u32) -> Self {
        RetryBudget::Limited(max)
    }
}

impl From<bool> for RetryBudget {
    /// `true` retries forever, `false` never retries.
    fn from(unlimited: bool) -> Self {
        if unlimited {
            RetryBudget::Unlimited
        } else {
            RetryBudget::NONE
        }
    }
}

/// Delay before the next attempt, or `None` if the failure is terminal.
pub(crate) fn retry_delay(
    budget: RetryBudget,
    attempt: u32,
    envelope: &Envelope,
) -> Option<Duration> {
    if envelope.ok || !budget.allows(attempt) {
        return None;
    }
    envelope.retry_after()
}
