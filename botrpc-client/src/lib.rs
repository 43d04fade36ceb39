//! Dynamic client for the bot messaging HTTP API.
//!
//! Every remote method goes through [`BotClient::call`]: the method name is
//! substituted into an endpoint template, the parameters are encoded as JSON
//! or, when they contain files, as `multipart/form-data`, and rate-limited
//! calls are retried after exactly the delay the service asks for.
//!
//! ## Example
//!
//! ```ignore
//! use botrpc_client::{BotClient, InputFile, params};
//!
//! let client = BotClient::new("123456:ABC-DEF")?;
//!
//! let me = client.get_me().await?;
//! println!("running as @{}", me["username"]);
//!
//! // Any method name works, listed in `methods` or not.
//! client
//!     .call("sendMessage", params! {
//!         "chat_id" => 42,
//!         "text" => "hello",
//!         "reply_markup" => params! { "remove_keyboard" => true },
//!     })
//!     .await?;
//!
//! // A file switches the request to multipart.
//! client
//!     .send_document(params! {
//!         "chat_id" => 42,
//!         "document" => InputFile::bytes(report).with_name("report.pdf"),
//!     })
//!     .await?;
//! ```
//!
//! ## Retries
//!
//! A failed envelope carrying `parameters.retry_after` is retried after
//! that many seconds, up to the retry budget (10 by default, see
//! [`RetryBudget`]). Every other failure, including transport errors, is
//! returned at once as a [`BotError`].
//!
//! ## Init data
//!
//! [`BotClient::sign_init_data`] and [`BotClient::verify_init_data`] sign
//! and check the launch payload of an embedded web app with the bot token.
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `tls` (default) | `tls-ring` + `tls-native-roots` |
//! | `tls-ring` / `tls-aws-lc` | rustls crypto provider |
//! | `tls-native-roots` / `tls-webpki-roots` | root certificates |
//! | `tracing` | Tracing spans for calls |
//!
//! With `tracing`, each call runs in an `rpc.call` span with `rpc.method`,
//! `rpc.encoding` (`json` or `multipart`) and `otel.kind = "client"`.
//! Retries are logged at debug level and terminal failures at warn level.

pub mod builder;
pub mod client;
pub mod config;
pub mod error;
pub mod init_data;
pub mod methods;
pub mod request;
pub mod transport;

pub use builder::{ClientBuildError, ClientBuilder};
pub use client::BotClient;
pub use config::{DEFAULT_ENDPOINT, DEFAULT_RETRY_BUDGET, EndpointTemplate, ErrorHook, RetryBudget};
pub use error::{BotError, DecodeError, EncodeError, ErrorKind, RequestInfo, TransportError};
pub use init_data::{DEFAULT_MAX_AGE, InitDataSigner};
pub use request::{BodyMode, EncodedBody, open_file};
pub use transport::{HyperTransport, HyperTransportBuilder};

pub use botrpc_core::{
    ByteStream, Envelope, EnvelopeError, FileSource, InputFile, Params, ResponseParameters, Value,
    params,
};
