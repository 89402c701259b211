//! TLS configuration for deployments that front the backend with
//! `wss`/`https`.
//!
//! Builds a [`rustls::ClientConfig`] whose root store contains only the
//! CA certificates from an operator-supplied PEM bundle (see the
//! `EMBERDESK_CA_BUNDLE` configuration value). The local development
//! backend speaks plain `ws`/`http` and needs none of this.

use std::path::Path;

use rustls::ClientConfig;

use crate::Result;

/// Builds a [`ClientConfig`] whose root store contains the CA
/// certificates found in the PEM bundle at `ca_bundle`.
///
/// # Errors
///
/// Returns [`EmberdeskError::Tls`](crate::EmberdeskError::Tls) if the
/// bundle cannot be read, cannot be parsed, or contains no usable
/// certificates.
pub fn build_tls_config(ca_bundle: &Path) -> Result<ClientConfig> {
    let pem = std::fs::read(ca_bundle)
        .map_err(|e| crate::EmberdeskError::Tls(format!("failed to read CA bundle: {e}")))?;

    let certs: Vec<_> = rustls_pemfile::certs(&mut &pem[..])
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| crate::EmberdeskError::Tls(format!("failed to parse CA PEM: {e}")))?;

    let mut root_store = rustls::RootCertStore::empty();
    let (added, _ignored) = root_store.add_parsable_certificates(certs);
    if added == 0 {
        return Err(crate::EmberdeskError::Tls(format!(
            "no usable CA certificates in {}",
            ca_bundle.display()
        )));
    }

    let config = ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    Ok(config)
}
