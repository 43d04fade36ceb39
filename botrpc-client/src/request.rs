//! Request encoding.
//!
//! This module turns [`Params`](botrpc_core::Params) into an HTTP body:
//! - [`encode`]: picks JSON or multipart and encodes the normalized parameters
//! - [`materialize`]: drains file streams into memory
//! - [`open_file`]: opens a path as a streamed attachment

mod encoder;
mod materialize;
mod multipart;

pub use encoder::{BodyMode, DEFAULT_FILE_MIME, DEFAULT_FILE_NAME, EncodedBody, encode};
pub use materialize::{MaterializedFile, materialize, open_file};
