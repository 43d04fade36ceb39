//! HTTP transport.
//!
//! [`HyperTransport`] posts encoded bodies over hyper_util's pooled client
//! with rustls TLS. TLS is selected with cargo features:
//!
//! - `tls` (default): `tls-ring` + `tls-native-roots`
//! - `tls-ring` / `tls-aws-lc`: crypto providers
//! - `tls-native-roots` / `tls-webpki-roots`: root certificates

mod connector;
mod hyper;

pub use connector::{
    DangerousAcceptAnyCertVerifier, TlsSetupError, build_https_connector,
    danger_accept_invalid_certs_config, default_tls_config, has_tls_support,
};
pub use self::hyper::{HyperTransport, HyperTransportBuilder};

pub use rustls::ClientConfig as TlsClientConfig;
