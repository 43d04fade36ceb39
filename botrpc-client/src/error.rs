//! Client error types.
//!
//! Every failed call produces exactly one [`BotError`]. Its [`ErrorKind`]
//! says which stage failed; the request that failed is kept alongside as
//! [`RequestInfo`].

use std::io;
use std::time::Duration;

use botrpc_core::{Envelope, EnvelopeError, ResponseParameters};

use crate::config::RetryBudget;

/// Stage of a call that failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The service answered with `ok: false` and the call was not retried
    /// (or ran out of retries).
    Api,
    /// The request never produced a response: connect, I/O or HTTP failure,
    /// or the client-side timeout elapsed.
    Transport,
    /// The parameters could not be encoded, or a file stream failed.
    Encode,
    /// The response was not a valid envelope, or its result had the wrong
    /// shape.
    Decode,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Api => "api",
            ErrorKind::Transport => "transport",
            ErrorKind::Encode => "encode",
            ErrorKind::Decode => "decode",
        }
    }
}

/// The request a [`BotError`] belongs to.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestInfo {
    /// Remote method name as sent on the wire.
    pub method: String,
    /// Normalized parameters, with attachments replaced by a descriptor.
    pub params: serde_json::Value,
    /// Retries performed before the call failed.
    pub attempt: u32,
    pub retry_budget: RetryBudget,
}

/// Error returned by every remote call.
///
/// ```ignore
/// match client.call("sendMessage", params).await {
///     Ok(message) => println!("sent {message}"),
///     Err(err) if err.is_api() => eprintln!("rejected ({:?}): {}", err.code(), err.message()),
///     Err(err) => eprintln!("failed: {err}"),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
#[error("{}: {}", .request.method, .message)]
pub struct BotError {
    kind: ErrorKind,
    message: String,
    code: Option<i64>,
    parameters: Option<ResponseParameters>,
    request: RequestInfo,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl BotError {
    /// Build an [`ErrorKind::Api`] error from a failed envelope.
    pub(crate) fn from_envelope(envelope: Envelope, request: RequestInfo) -> Self {
        let message = match (&envelope.description, envelope.error_code) {
            (Some(description), _) => description.clone(),
            (None, Some(code)) => format!("request failed with error code {code}"),
            (None, None) => "request failed".to_string(),
        };
        Self {
            kind: ErrorKind::Api,
            message,
            code: envelope.error_code,
            parameters: envelope.parameters,
            request,
            source: None,
        }
    }

    /// Wrap a non-API failure; the message is taken from the cause.
    pub(crate) fn from_fault(fault: Fault, request: RequestInfo) -> Self {
        let (kind, source): (ErrorKind, Box<dyn std::error::Error + Send + Sync>) = match fault {
            Fault::Transport(err) => (ErrorKind::Transport, Box::new(err)),
            Fault::Encode(err) => (ErrorKind::Encode, Box::new(err)),
            Fault::Decode(err) => (ErrorKind::Decode, Box::new(err)),
        };
        Self {
            kind,
            message: source.to_string(),
            code: None,
            parameters: None,
            request,
            source: Some(source),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The envelope's `error_code`, for API errors.
    pub fn code(&self) -> Option<i64> {
        self.code
    }

    pub fn parameters(&self) -> Option<&ResponseParameters> {
        self.parameters.as_ref()
    }

    pub fn request(&self) -> &RequestInfo {
        &self.request
    }

    pub fn method(&self) -> &str {
        &self.request.method
    }

    pub fn is_api(&self) -> bool {
        self.kind == ErrorKind::Api
    }

    pub fn is_transport(&self) -> bool {
        self.kind == ErrorKind::Transport
    }

    /// Whether the client-side timeout elapsed.
    pub fn is_timeout(&self) -> bool {
        self.source
            .as_deref()
            .and_then(|err| err.downcast_ref::<TransportError>())
            .is_some_and(|err| matches!(err, TransportError::Timeout(_)))
    }

    /// Wait the service asked for when the retry budget ran out.
    pub fn retry_after(&self) -> Option<Duration> {
        self.parameters.as_ref()?.retry_after()
    }

    /// Supergroup the target group was migrated to.
    pub fn migrate_to_chat_id(&self) -> Option<i64> {
        self.parameters.as_ref()?.migrate_to_chat_id
    }
}

/// Failure to exchange a request with the service.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] hyper_util::client::legacy::Error),
    #[error("failed to build request: {0}")]
    Build(#[from] http::Error),
    #[error("failed to read response body: {0}")]
    Body(#[from] hyper::Error),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

/// Failure to turn parameters into a request body.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("failed to read file for `{field}`: {source}")]
    Stream {
        field: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid content type for `{field}`: {mime:?}")]
    InvalidMime { field: String, mime: String },
    #[error("failed to serialize parameters: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure to interpret a response.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid response (HTTP {status}): {source}")]
    Envelope {
        status: http::StatusCode,
        #[source]
        source: EnvelopeError,
    },
    #[error("unexpected result: {0}")]
    Result(#[from] serde_json::Error),
}

/// A non-API failure, before it is tied to a request.
#[derive(Debug)]
pub(crate) enum Fault {
    Transport(TransportError),
    Encode(EncodeError),
    Decode(DecodeError),
}

impl From<TransportError> for Fault {
    fn from(err: TransportError) -> Self {
        Fault::Transport(err)
    }
}

impl From<EncodeError> for Fault {
    fn from(err: EncodeError) -> Self {
        Fault::Encode(err)
    }
}

impl From<DecodeError> for Fault {
    fn from(err: DecodeError) -> Self {
        Fault::Decode(err)
    }
}
