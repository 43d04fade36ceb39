//! Core types for botrpc.
//!
//! This crate provides the types shared by the client and anything else that
//! needs to speak the bot API wire format:
//!
//! ## Modules
//!
//! - [`value`]: The recursive parameter [`Value`] and its normalization rules
//! - [`params`]: [`Params`], the insertion-ordered parameter mapping
//! - [`file`]: [`InputFile`] attachments backed by bytes or byte streams
//! - [`envelope`]: The `{ok, result, ...}` response [`Envelope`]

pub mod envelope;
pub mod file;
pub mod params;
pub mod value;

pub use envelope::*;
pub use file::*;
pub use params::*;
pub use value::*;
