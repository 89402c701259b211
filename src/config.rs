//! Application configuration loaded from environment variables.
//!
//! All values are optional and fall back to the local development
//! backend:
//! - `EMBERDESK_WS_URL` — WebSocket base URL for the push feed
//! - `EMBERDESK_API_URL` — HTTP base URL for the REST endpoints
//! - `EMBERDESK_SESSION_TOKEN` — opaque session token from `/login/`
//! - `EMBERDESK_CA_BUNDLE` — path to a PEM CA bundle for TLS deployments

use std::path::PathBuf;

/// Default WebSocket endpoint of the local development backend.
const DEFAULT_WS_URL: &str = "ws://localhost:8000";

/// Default REST endpoint of the local development backend.
const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Top-level application configuration.
#[derive(Debug)]
pub struct AppConfig {
    pub backend: BackendConfig,
}

/// Backend connection configuration values.
#[derive(Debug)]
pub struct BackendConfig {
    pub ws_url: String,
    pub api_url: String,
    pub session_token: Option<String>,
    pub ca_bundle: Option<PathBuf>,
}

/// Loads the application configuration from environment variables.
///
/// URLs default to the local development backend and can be overridden
/// with `EMBERDESK_WS_URL` / `EMBERDESK_API_URL`. The session token is
/// optional (anonymous mode); [`crate::session::populate_env_from_keychain`]
/// can fill it in from the keychain before this is called.
///
/// # Errors
///
/// Returns [`EmberdeskError::Config`](crate::EmberdeskError::Config) if
/// an override URL does not carry the scheme its feed requires.
pub fn fetch_config() -> crate::Result<AppConfig> {
    let ws_url = non_empty_var("EMBERDESK_WS_URL").unwrap_or_else(|| DEFAULT_WS_URL.to_string());
    let api_url = non_empty_var("EMBERDESK_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());

    if !ws_url.starts_with("ws://") && !ws_url.starts_with("wss://") {
        return Err(crate::EmberdeskError::Config(format!(
            "EMBERDESK_WS_URL must use ws:// or wss://, got {ws_url}"
        )));
    }
    if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
        return Err(crate::EmberdeskError::Config(format!(
            "EMBERDESK_API_URL must use http:// or https://, got {api_url}"
        )));
    }

    Ok(AppConfig {
        backend: BackendConfig {
            ws_url,
            api_url,
            session_token: non_empty_var(crate::session::SESSION_ENV_VAR),
            ca_bundle: non_empty_var("EMBERDESK_CA_BUNDLE").map(PathBuf::from),
        },
    })
}

/// Returns the value of an environment variable if it exists and is non-empty.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}
