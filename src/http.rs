//! Shared HTTP client construction for the REST endpoints.

use std::time::Duration;

use crate::Result;

/// Client-side deadline for any single REST round-trip. Expiry surfaces
/// as a transport error, which order submission treats as a rejection.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds the [`reqwest::Client`] used by the chart poller, the order
/// flow, and the auth calls.
///
/// Pass a preconfigured TLS config (see [`crate::tls::build_tls_config`])
/// when the backend is fronted with `https`; plain-HTTP deployments pass
/// `None`.
///
/// # Errors
///
/// Returns [`EmberdeskError::Http`](crate::EmberdeskError::Http) if the
/// client cannot be built.
pub fn build_client(tls_config: Option<rustls::ClientConfig>) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().timeout(REQUEST_TIMEOUT);
    if let Some(tls) = tls_config {
        builder = builder.use_preconfigured_tls(tls);
    }

    Ok(builder.build()?)
}
