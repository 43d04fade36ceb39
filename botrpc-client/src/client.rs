//! The bot API client.
//!
//! [`BotClient`] dispatches any method name through one code path:
//!
//! 1. normalize and encode the parameters (JSON or multipart), once
//! 2. POST the body to the resolved endpoint
//! 3. decode the response envelope
//! 4. on a rate-limit envelope, sleep `retry_after` seconds and go to 2
//! 5. on any other failure, build a [`BotError`], report it, return it

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use botrpc_core::{Envelope, Params};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::builder::ClientBuilder;
use crate::config::{EndpointTemplate, ErrorHook, RetryBudget, retry_delay};
use crate::error::{BotError, DecodeError, Fault, RequestInfo, TransportError};
use crate::init_data::{DEFAULT_MAX_AGE, InitDataSigner};
use crate::request::{EncodedBody, encode};
use crate::transport::HyperTransport;

/// Client for the bot API.
///
/// Cloning is cheap: clones share configuration and the connection pool.
///
/// # Example
///
/// ```ignore
/// use botrpc_client::{BotClient, params};
///
/// let client = BotClient::new("123456:ABC-DEF")?;
///
/// let me = client.get_me().await?;
/// client
///     .call("sendMessage", params! { "chat_id" => 42, "text" => "hello" })
///     .await?;
/// ```
#[derive(Clone)]
pub struct BotClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    transport: HyperTransport,
    token: String,
    endpoint: EndpointTemplate,
    signer: InitDataSigner,
    retry_budget: RetryBudget,
    timeout: Option<Duration>,
    on_error: Option<ErrorHook>,
}

impl fmt::Debug for BotClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotClient")
            .field("endpoint", &self.inner.endpoint.as_str())
            .field("retry_budget", &self.inner.retry_budget)
            .field("timeout", &self.inner.timeout)
            .field("on_error", &self.inner.on_error.is_some())
            .field("transport", &self.inner.transport)
            .finish_non_exhaustive()
    }
}

impl BotClient {
    pub fn builder(token: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(token)
    }

    /// Create a client with default settings.
    pub fn new(token: impl Into<String>) -> Result<Self, crate::ClientBuildError> {
        Self::builder(token).build()
    }

    pub(crate) fn from_parts(
        transport: HyperTransport,
        token: String,
        endpoint: EndpointTemplate,
        retry_budget: RetryBudget,
        timeout: Option<Duration>,
        on_error: Option<ErrorHook>,
    ) -> Self {
        let signer = InitDataSigner::new(&token);
        Self {
            inner: Arc::new(ClientInner {
                transport,
                token,
                endpoint,
                signer,
                retry_budget,
                timeout,
                on_error,
            }),
        }
    }

    pub fn endpoint(&self) -> &EndpointTemplate {
        &self.inner.endpoint
    }

    /// Budget used by [`call`](Self::call).
    pub fn retry_budget(&self) -> RetryBudget {
        self.inner.retry_budget
    }

    /// Per-attempt timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.inner.timeout
    }

    pub fn transport(&self) -> &HyperTransport {
        &self.inner.transport
    }

    /// URL a call to `method` is posted to.
    pub fn endpoint_url(&self, method: &str) -> String {
        self.inner.endpoint.resolve(&self.inner.token, method)
    }

    /// Call `method` with the client's default retry budget.
    ///
    /// Returns the envelope's `result`, or JSON `null` if it had none.
    pub async fn call(&self, method: &str, params: Params) -> Result<Value, BotError> {
        self.call_with_retries(method, params, self.inner.retry_budget)
            .await
    }

    /// Call `method`, retrying rate-limited attempts within `retry_budget`.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::Encode`](crate::ErrorKind::Encode) if the parameters
    ///   cannot be encoded or a file stream fails
    /// - [`ErrorKind::Transport`](crate::ErrorKind::Transport) if the request
    ///   fails or times out; these are never retried
    /// - [`ErrorKind::Decode`](crate::ErrorKind::Decode) if the response is
    ///   not an envelope
    /// - [`ErrorKind::Api`](crate::ErrorKind::Api) if the service rejects the
    ///   call and no retry is left
    pub async fn call_with_retries(
        &self,
        method: &str,
        params: Params,
        retry_budget: impl Into<RetryBudget>,
    ) -> Result<Value, BotError> {
        self.dispatch(method, params, retry_budget.into(), Ok).await
    }

    /// Like [`call`](Self::call), deserializing the result into `T`.
    ///
    /// ```ignore
    /// #[derive(serde::Deserialize)]
    /// struct User { id: i64, username: Option<String> }
    ///
    /// let me: User = client.call_as("getMe", Params::new()).await?;
    /// ```
    pub async fn call_as<T>(&self, method: &str, params: Params) -> Result<T, BotError>
    where
        T: DeserializeOwned,
    {
        self.dispatch(method, params, self.inner.retry_budget, serde_json::from_value)
            .await
    }

    async fn dispatch<T, F>(
        &self,
        method: &str,
        params: Params,
        retry_budget: RetryBudget,
        decode: F,
    ) -> Result<T, BotError>
    where
        F: FnOnce(Value) -> Result<T, serde_json::Error>,
    {
        let params = params.normalize();
        let request = RequestInfo {
            method: method.to_string(),
            params: params.snapshot(),
            attempt: 0,
            retry_budget,
        };

        let call = async {
            self.execute(request, params, decode)
                .await
                .map_err(|err| self.report(err))
        };

        #[cfg(feature = "tracing")]
        let call = tracing::Instrument::instrument(
            call,
            tracing::info_span!(
                "rpc.call",
                rpc.method = %method,
                rpc.encoding = tracing::field::Empty,
                otel.kind = "client",
            ),
        );

        call.await
    }

    async fn execute<T, F>(
        &self,
        mut request: RequestInfo,
        params: Params,
        decode: F,
    ) -> Result<T, BotError>
    where
        F: FnOnce(Value) -> Result<T, serde_json::Error>,
    {
        let encoded = encode(params)
            .await
            .map_err(|err| BotError::from_fault(err.into(), request.clone()))?;

        #[cfg(feature = "tracing")]
        tracing::Span::current().record("rpc.encoding", encoded.mode.as_str());

        let url = self.endpoint_url(&request.method);

        loop {
            let envelope = self
                .send(&url, &encoded)
                .await
                .map_err(|fault| BotError::from_fault(fault, request.clone()))?;

            if envelope.ok {
                let result = envelope.result.unwrap_or(Value::Null);
                return decode(result).map_err(|err| {
                    BotError::from_fault(DecodeError::Result(err).into(), request.clone())
                });
            }

            let Some(delay) = retry_delay(request.retry_budget, request.attempt, &envelope) else {
                return Err(BotError::from_envelope(envelope, request));
            };

            request.attempt += 1;
            #[cfg(feature = "tracing")]
            tracing::debug!(
                attempt = request.attempt,
                retry_after_ms = delay.as_millis() as u64,
                code = envelope.error_code,
                "rate limited, retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// One attempt: POST the encoded body and decode the envelope.
    ///
    /// The HTTP status is ignored; the service reports failures in the
    /// envelope.
    async fn send(&self, url: &str, encoded: &EncodedBody) -> Result<Envelope, Fault> {
        let exchange = self
            .inner
            .transport
            .post(url, &encoded.content_type, encoded.body.clone());

        let (status, body) = match self.inner.timeout {
            Some(limit) => tokio::time::timeout(limit, exchange)
                .await
                .map_err(|_| TransportError::Timeout(limit))??,
            None => exchange.await?,
        };

        Envelope::decode(&body).map_err(|source| DecodeError::Envelope { status, source }.into())
    }

    fn report(&self, err: BotError) -> BotError {
        #[cfg(feature = "tracing")]
        tracing::warn!(
            kind = err.kind().as_str(),
            code = err.code(),
            attempt = err.request().attempt,
            error = %err,
            "call failed"
        );
        if let Some(hook) = &self.inner.on_error {
            hook(&err);
        }
        err
    }

    pub fn init_data_signer(&self) -> &InitDataSigner {
        &self.inner.signer
    }

    /// Sign web app init data with this client's token.
    pub fn sign_init_data(&self, data: &Map<String, Value>) -> String {
        self.inner.signer.sign(data)
    }

    /// Verify web app init data, accepting an `auth_date` up to 30 days old.
    pub fn verify_init_data(&self, init_data: &str) -> Option<Map<String, Value>> {
        self.inner.signer.verify(init_data, DEFAULT_MAX_AGE)
    }

    /// Verify web app init data with a custom maximum age; zero disables
    /// the age check.
    pub fn verify_init_data_with_max_age(
        &self,
        init_data: &str,
        max_age: Duration,
    ) -> Option<Map<String, Value>> {
        self.inner.signer.verify(init_data, max_age)
    }
}
