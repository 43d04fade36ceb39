//! Response envelopes.
//!
//! Every bot API response body has the same shape:
//!
//! ```text
//! {"ok": true,  "result": ...}
//! {"ok": false, "error_code": 429, "description": "...", "parameters": {"retry_after": 3}}
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Error produced when a response body is not a valid envelope.
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    #[error("response body is empty")]
    Empty,
    #[error("malformed response envelope: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Success or failure wrapper returned by the service for every call.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<ResponseParameters>,
}

impl Envelope {
    /// Parse an envelope from a response body.
    pub fn decode(body: &[u8]) -> Result<Self, EnvelopeError> {
        if body.is_empty() {
            return Err(EnvelopeError::Empty);
        }
        Ok(serde_json::from_slice(body)?)
    }

    /// Successful envelope carrying `result`.
    pub fn success(result: serde_json::Value) -> Self {
        Self {
            ok: true,
            result: Some(result),
            ..Default::default()
        }
    }

    /// Failed envelope with an error code and description.
    pub fn failure(error_code: i64, description: impl Into<String>) -> Self {
        Self {
            ok: false,
            error_code: Some(error_code),
            description: Some(description.into()),
            ..Default::default()
        }
    }

    pub fn with_parameters(mut self, parameters: ResponseParameters) -> Self {
        self.parameters = Some(parameters);
        self
    }

    /// How long the service asked us to wait before calling again.
    ///
    /// Only a positive `parameters.retry_after` that fits in a [`Duration`]
    /// counts as a rate-limit signal.
    pub fn retry_after(&self) -> Option<Duration> {
        self.parameters.as_ref()?.retry_after()
    }
}

/// Extra information attached to a failed envelope.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseParameters {
    /// Seconds to wait before the request may be repeated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<f64>,
    /// The group has been migrated to a supergroup with this identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migrate_to_chat_id: Option<i64>,
    /// Any other fields the service sends.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ResponseParameters {
    pub fn retry_after_secs(seconds: f64) -> Self {
        Self {
            retry_after: Some(seconds),
            ..Default::default()
        }
    }

    pub fn retry_after(&self) -> Option<Duration> {
        self.retry_after
            .filter(|secs| *secs > 0.0)
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }
}
