//! Opaque session-token storage via the system keychain.
//!
//! The backend issues a session token from `/login/`; this module is the
//! only local persistence the crate performs. [`populate_env_from_keychain`]
//! copies a stored token into the environment at startup so the existing
//! config flow picks it up transparently.
//!
//! The token travels as a Django-style session cookie on both the
//! WebSocket upgrade and order submission; [`cookie_header`] is the one
//! place that knows the scheme, so a bearer-header backend is a
//! one-function change.

use tracing::{debug, warn};
use zeroize::Zeroizing;

/// Keychain service name used for the stored token.
const SERVICE: &str = "emberdesk";

/// Keychain entry identifier for the session token.
const SESSION_KEY: &str = "session_token";

/// Environment variable bridged into [`crate::config::fetch_config`].
pub const SESSION_ENV_VAR: &str = "EMBERDESK_SESSION_TOKEN";

/// Loads the session token from the keychain, returning `None` if not set.
pub fn load() -> Option<Zeroizing<String>> {
    let entry = keyring::Entry::new(SERVICE, SESSION_KEY).ok()?;
    match entry.get_password() {
        Ok(token) => Some(Zeroizing::new(token)),
        Err(keyring::Error::NoEntry) => None,
        Err(e) => {
            warn!(error = %e, "failed to read keychain entry");
            None
        }
    }
}

/// Saves the session token to the keychain.
pub fn save(token: &str) -> crate::Result<()> {
    let entry = keyring::Entry::new(SERVICE, SESSION_KEY)
        .map_err(|e| crate::EmberdeskError::Session(format!("keyring entry error: {e}")))?;
    entry
        .set_password(token)
        .map_err(|e| crate::EmberdeskError::Session(format!("failed to save to keychain: {e}")))
}

/// Removes the session token from the keychain (logout).
pub fn clear() -> crate::Result<()> {
    let entry = keyring::Entry::new(SERVICE, SESSION_KEY)
        .map_err(|e| crate::EmberdeskError::Session(format!("keyring entry error: {e}")))?;
    match entry.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(crate::EmberdeskError::Session(format!(
            "failed to clear keychain entry: {e}"
        ))),
    }
}

/// Checks whether a session token exists in the keychain.
pub fn is_set() -> bool {
    load().is_some()
}

/// Populates the session environment variable from the keychain when it
/// is not already set.
///
/// Call this at startup before [`crate::config::fetch_config`].
pub fn populate_env_from_keychain() {
    if std::env::var(SESSION_ENV_VAR).is_err()
        && let Some(token) = load()
    {
        debug!(key = SESSION_ENV_VAR, "loaded session token from keychain");
        // SAFETY: single-threaded at this point (before tokio runtime starts tasks)
        unsafe {
            std::env::set_var(SESSION_ENV_VAR, token.as_str());
        }
    }
}

/// Renders the `Cookie` header value carrying the session token, or
/// `None` when no token is available (anonymous mode).
pub fn cookie_header(token: Option<&str>) -> Option<String> {
    token
        .filter(|t| !t.is_empty())
        .map(|t| format!("sessionid={t}"))
}
