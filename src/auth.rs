//! Backend login and session-token retrieval.
//!
//! `POST /login/` exchanges credentials for the opaque session token the
//! WebSocket upgrade and order submission attach (see
//! [`crate::session`]). The backend may accept a login without issuing a
//! token; that is an anonymous-capable session, not an error.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::Result;

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Submits credentials and returns the session token, when one is
/// issued.
///
/// # Errors
///
/// Returns [`EmberdeskError::Backend`](crate::EmberdeskError::Backend)
/// carrying the server's error text on a non-2xx status or an
/// error-shaped payload, and
/// [`EmberdeskError::Http`](crate::EmberdeskError::Http) if the request
/// itself fails.
pub async fn login(
    client: &reqwest::Client,
    api_url: &str,
    username: &str,
    email: &str,
    password: &str,
) -> Result<Option<String>> {
    let body = LoginRequest {
        username,
        email,
        password,
    };

    let url = format!("{}/login/", api_url.trim_end_matches('/'));
    let response = client.post(url).json(&body).send().await?;

    let status = response.status();
    if !status.is_success() {
        let message = response
            .text()
            .await
            .ok()
            .and_then(|text| serde_json::from_str::<LoginResponse>(&text).ok())
            .and_then(|body| body.error)
            .unwrap_or_else(|| "Invalid login credentials".to_string());
        return Err(crate::EmberdeskError::Backend(message));
    }

    let body: LoginResponse = response.json().await?;
    if let Some(error) = body.error {
        return Err(crate::EmberdeskError::Backend(error));
    }

    info!(token_issued = body.token.is_some(), "Login accepted");
    Ok(body.token)
}
