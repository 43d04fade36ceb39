//! Client configuration types.
//!
//! - [`RetryBudget`]: how many rate-limited attempts a call may repeat
//! - [`EndpointTemplate`]: the URL template each method call is posted to
//! - [`ErrorHook`]: callback observing every terminal error

mod endpoint;
mod retry;

use std::sync::Arc;

pub use endpoint::{DEFAULT_ENDPOINT, EndpointTemplate};
pub(crate) use retry::retry_delay;
pub use retry::{DEFAULT_RETRY_BUDGET, RetryBudget};

use crate::BotError;

/// Callback invoked with every terminal error before it is returned.
pub type ErrorHook = Arc<dyn Fn(&BotError) + Send + Sync>;
