//! Client builder.
//!
//! Provides a fluent API for configuring and building a [`BotClient`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::client::BotClient;
use crate::config::{EndpointTemplate, ErrorHook, RetryBudget};
use crate::error::BotError;
use crate::transport::{HyperTransport, TlsSetupError};

/// Method name used to check that the endpoint template resolves to a URI.
const PROBE_METHOD: &str = "getMe";

/// Error returned by [`ClientBuilder::build`].
#[derive(Debug, thiserror::Error)]
pub enum ClientBuildError {
    #[error("invalid endpoint `{endpoint}`: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
    #[error("failed to create HTTP transport: {0}")]
    Transport(#[from] TlsSetupError),
}

/// Builder for [`BotClient`].
///
/// ```ignore
/// use botrpc_client::{BotClient, RetryBudget};
/// use std::time::Duration;
///
/// let client = BotClient::builder("123456:ABC-DEF")
///     .endpoint("http://localhost:8081/bot{token}/{method}")
///     .retry_budget(RetryBudget::Unlimited)
///     .timeout(Duration::from_secs(30))
///     .on_error(|err| eprintln!("bot API call failed: {err}"))
///     .build()?;
/// ```
pub struct ClientBuilder {
    token: String,
    endpoint: EndpointTemplate,
    retry_budget: RetryBudget,
    /// Applies to each attempt separately, not to the whole call.
    timeout: Option<Duration>,
    on_error: Option<ErrorHook>,
    transport: Option<HyperTransport>,
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("endpoint", &self.endpoint.as_str())
            .field("retry_budget", &self.retry_budget)
            .field("timeout", &self.timeout)
            .field("on_error", &self.on_error.is_some())
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

impl ClientBuilder {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            endpoint: EndpointTemplate::default(),
            retry_budget: RetryBudget::default(),
            timeout: None,
            on_error: None,
            transport: None,
        }
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    /// Set the endpoint template.
    ///
    /// `{token}` and `{method}` are replaced case-insensitively.
    /// Default: `https://api.telegram.org/bot{token}/{method}`.
    pub fn endpoint(mut self, template: impl Into<EndpointTemplate>) -> Self {
        self.endpoint = template.into();
        self
    }

    /// Default retry budget for [`BotClient::call`].
    ///
    /// Accepts a [`RetryBudget`], a number of retries, or `true` for
    /// unlimited retries. Default: 10.
    pub fn retry_budget(mut self, budget: impl Into<RetryBudget>) -> Self {
        self.retry_budget = budget.into();
        self
    }

    /// Fail an attempt that takes longer than `timeout`.
    ///
    /// A timed-out attempt is a transport error and is not retried.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Observe every terminal error before it is returned.
    pub fn on_error<F>(mut self, hook: F) -> Self
    where
        F: Fn(&BotError) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(hook));
        self
    }

    pub fn error_hook(mut self, hook: ErrorHook) -> Self {
        self.on_error = Some(hook);
        self
    }

    /// Use a preconfigured transport instead of the default one.
    pub fn transport(mut self, transport: HyperTransport) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> Result<BotClient, ClientBuildError> {
        self.check_endpoint()?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => HyperTransport::new()?,
        };

        Ok(BotClient::from_parts(
            transport,
            self.token,
            self.endpoint,
            self.retry_budget,
            self.timeout,
            self.on_error,
        ))
    }

    fn check_endpoint(&self) -> Result<(), ClientBuildError> {
        let invalid = |reason: String| ClientBuildError::InvalidEndpoint {
            endpoint: self.endpoint.to_string(),
            reason,
        };

        let uri: http::Uri = self
            .endpoint
            .resolve(&self.token, PROBE_METHOD)
            .parse()
            .map_err(|err: http::uri::InvalidUri| invalid(err.to_string()))?;

        match uri.scheme_str() {
            Some("http") | Some("https") if uri.authority().is_some() => Ok(()),
            Some("http") | Some("https") => Err(invalid("missing host".to_string())),
            _ => Err(invalid("scheme must be http or https".to_string())),
        }
    }
}
