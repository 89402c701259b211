//! Crate-level error types.
//!
//! [`EmberdeskError`] unifies every error source (configuration,
//! WebSocket, HTTP, JSON, TLS, backend-reported failures) behind a
//! single enum so callers can match on the variant they care about
//! while still using the `?` operator for easy propagation.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EmberdeskError>;

/// Top-level error type returned by all public APIs.
#[derive(Debug, thiserror::Error)]
pub enum EmberdeskError {
    /// Configuration was missing, malformed, or inconsistent.
    #[error("configuration error: {0}")]
    Config(String),

    /// A WebSocket operation (connect, send, receive) failed.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    /// An HTTP request to the backend failed at the transport level.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// TLS configuration could not be built.
    #[error("tls error: {0}")]
    Tls(String),

    /// A message or response did not match the expected wire shape.
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    /// The backend reported an explicit error payload.
    #[error("backend error: {0}")]
    Backend(String),

    /// The session token store could not be read or written.
    #[error("session store error: {0}")]
    Session(String),
}
