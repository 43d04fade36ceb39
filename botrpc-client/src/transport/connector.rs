//! TLS setup for the hyper connector.
//!
//! TLS needs both a crypto provider and root certificates, each picked by a
//! cargo feature:
//!
//! - crypto: `tls-ring` (default with `tls`) or `tls-aws-lc`
//! - roots: `tls-native-roots` (default with `tls`) or `tls-webpki-roots`
//!
//! Without a crypto feature, a process-wide provider installed through
//! `CryptoProvider::install_default()` is used instead.

use std::sync::Arc;

use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::connect::HttpConnector;
use rustls::ClientConfig;

/// Failure to build a TLS configuration.
#[derive(Debug, thiserror::Error)]
pub enum TlsSetupError {
    #[error(
        "HTTPS requires a crypto provider: enable the `tls-ring` or `tls-aws-lc` feature, \
         or install one with `CryptoProvider::install_default()`"
    )]
    NoCryptoProvider,
    #[error(
        "HTTPS requires root certificates: enable the `tls-native-roots` or `tls-webpki-roots` \
         feature, or pass a custom TLS config"
    )]
    NoRootCertificates,
    #[error("invalid TLS configuration: {0}")]
    Rustls(#[from] rustls::Error),
}

/// Whether the enabled features provide both a crypto provider and roots.
#[inline]
pub const fn has_tls_support() -> bool {
    cfg!(any(feature = "tls-ring", feature = "tls-aws-lc"))
        && cfg!(any(
            feature = "tls-native-roots",
            feature = "tls-webpki-roots"
        ))
}

/// Feature-selected crypto provider, else the installed process default.
fn crypto_provider() -> Result<Arc<rustls::crypto::CryptoProvider>, TlsSetupError> {
    #[cfg(feature = "tls-ring")]
    {
        return Ok(Arc::new(rustls::crypto::ring::default_provider()));
    }

    #[cfg(all(feature = "tls-aws-lc", not(feature = "tls-ring")))]
    {
        return Ok(Arc::new(rustls::crypto::aws_lc_rs::default_provider()));
    }

    #[cfg(not(any(feature = "tls-ring", feature = "tls-aws-lc")))]
    {
        rustls::crypto::CryptoProvider::get_default()
            .cloned()
            .ok_or(TlsSetupError::NoCryptoProvider)
    }
}

fn config_builder()
-> Result<rustls::ConfigBuilder<ClientConfig, rustls::WantsVerifier>, TlsSetupError> {
    Ok(ClientConfig::builder_with_provider(crypto_provider()?)
        .with_safe_default_protocol_versions()?)
}

/// Root certificates from the enabled feature; native roots win when both
/// are enabled.
fn root_store() -> Result<rustls::RootCertStore, TlsSetupError> {
    #[cfg(feature = "tls-native-roots")]
    {
        let mut roots = rustls::RootCertStore::empty();
        let native_certs = rustls_native_certs::load_native_certs();
        if !native_certs.errors.is_empty() {
            // Some certificates may still have loaded.
            #[cfg(feature = "tracing")]
            tracing::debug!(errors = ?native_certs.errors, "errors loading native certs");
        }
        roots.add_parsable_certificates(native_certs.certs);
        return Ok(roots);
    }

    #[cfg(all(feature = "tls-webpki-roots", not(feature = "tls-native-roots")))]
    {
        let mut roots = rustls::RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        return Ok(roots);
    }

    #[cfg(not(any(feature = "tls-native-roots", feature = "tls-webpki-roots")))]
    {
        Err(TlsSetupError::NoRootCertificates)
    }
}

/// TLS configuration built from the enabled features.
pub fn default_tls_config() -> Result<ClientConfig, TlsSetupError> {
    let builder = config_builder()?;
    let roots = root_store()?;
    Ok(builder.with_root_certificates(roots).with_no_client_auth())
}

/// HTTPS connector that also accepts plain `http://` URIs.
pub fn build_https_connector(tls_config: ClientConfig) -> HttpsConnector<HttpConnector> {
    HttpsConnectorBuilder::new()
        .with_tls_config(tls_config)
        .https_or_http()
        .enable_all_versions()
        .build()
}

/// A certificate verifier that accepts any certificate.
///
/// # Warning
///
/// Only for development against self-signed local servers. It makes the
/// connection open to man-in-the-middle attacks.
#[derive(Debug)]
pub struct DangerousAcceptAnyCertVerifier {
    schemes: Vec<rustls::SignatureScheme>,
}

impl DangerousAcceptAnyCertVerifier {
    fn new(provider: &rustls::crypto::CryptoProvider) -> Self {
        Self {
            schemes: provider
                .signature_verification_algorithms
                .supported_schemes(),
        }
    }
}

impl rustls::client::danger::ServerCertVerifier for DangerousAcceptAnyCertVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &rustls::pki_types::CertificateDer<'_>,
        _intermediates: &[rustls::pki_types::CertificateDer<'_>],
        _server_name: &rustls::pki_types::ServerName<'_>,
        _ocsp_response: &[u8],
        _now: rustls::pki_types::UnixTime,
    ) -> Result<rustls::client::danger::ServerCertVerified, rustls::Error> {
        Ok(rustls::client::danger::ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<rustls::SignatureScheme> {
        self.schemes.clone()
    }
}

/// TLS configuration that accepts any server certificate.
pub fn danger_accept_invalid_certs_config() -> Result<ClientConfig, TlsSetupError> {
    let provider = crypto_provider()?;
    let verifier = DangerousAcceptAnyCertVerifier::new(&provider);
    Ok(ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()?
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(verifier))
        .with_no_client_auth())
}
