//! Request body encoding.
//!
//! Parameters without attachments are sent as a JSON object. As soon as one
//! top-level value is a file the whole request switches to
//! `multipart/form-data`, with every other value sent as a text part.

use botrpc_core::{Params, Value};
use bytes::Bytes;

use super::materialize::materialize;
use super::multipart::{MultipartForm, Part};
use crate::error::EncodeError;

/// Filename sent for attachments without a name.
pub const DEFAULT_FILE_NAME: &str = "blob";
/// Content type sent for attachments without a MIME type.
pub const DEFAULT_FILE_MIME: &str = "application/octet-stream";

const JSON_CONTENT_TYPE: &str = "application/json";

/// How a request body is encoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyMode {
    Json,
    Multipart,
}

impl BodyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyMode::Json => "json",
            BodyMode::Multipart => "multipart",
        }
    }
}

/// A fully encoded request body, ready to be sent any number of times.
#[derive(Clone, Debug)]
pub struct EncodedBody {
    pub body: Bytes,
    pub content_type: String,
    pub mode: BodyMode,
}

/// Normalize and encode `params`.
///
/// File streams are drained here; a failing stream is reported as
/// [`EncodeError::Stream`] naming the field. A content type that is not a
/// valid header value is [`EncodeError::InvalidMime`].
pub async fn encode(params: Params) -> Result<EncodedBody, EncodeError> {
    let params = params.normalize();
    if params.has_files() {
        encode_multipart(params).await
    } else {
        encode_json(&params)
    }
}

fn encode_json(params: &Params) -> Result<EncodedBody, EncodeError> {
    Ok(EncodedBody {
        body: Bytes::from(serde_json::to_vec(params)?),
        content_type: JSON_CONTENT_TYPE.to_string(),
        mode: BodyMode::Json,
    })
}

async fn encode_multipart(params: Params) -> Result<EncodedBody, EncodeError> {
    let mut form = MultipartForm::new();

    for (field, value) in params {
        match value {
            Value::File(file) => {
                let file = materialize(file)
                    .await
                    .map_err(|source| EncodeError::Stream {
                        field: field.clone(),
                        source,
                    })?;
                let filename = file.name.unwrap_or_else(|| DEFAULT_FILE_NAME.to_string());
                let mime = file.mime.unwrap_or_else(|| DEFAULT_FILE_MIME.to_string());
                if http::HeaderValue::from_str(&mime).is_err() {
                    return Err(EncodeError::InvalidMime { field, mime });
                }
                form.set(Part::file(field, filename, mime, file.data));
            }
            other => {
                if let Some(text) = other.to_form_text() {
                    form.set(Part::text(field, text?));
                }
            }
        }
    }

    Ok(EncodedBody {
        content_type: form.content_type(),
        body: form.into_bytes(),
        mode: BodyMode::Multipart,
    })
}
