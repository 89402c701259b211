//! Async WebSocket client for the stock push feed.
//!
//! A [`Subscription`] names one logical push channel (topic plus symbol
//! set) and renders its deterministic connect URL. [`connect`]
//! establishes the full-duplex connection, attaching the session cookie
//! to the upgrade request when one is available. Connection lifecycle
//! (reconnection, teardown, event fan-out) lives in [`connection`].

pub mod connection;

use std::sync::Arc;

use futures_util::StreamExt;
use futures_util::stream::{SplitSink, SplitStream};
use tokio::net::TcpStream;
use tokio_tungstenite::{Connector, MaybeTlsStream, WebSocketStream, connect_async_tls_with_config};
use tracing::{info, warn};
use tungstenite::Message;
use tungstenite::client::IntoClientRequest;
use tungstenite::http::HeaderValue;
use tungstenite::http::header::COOKIE;

use crate::Result;
use crate::models::ticker::TickerMessage;

/// Write half of a feed WebSocket connection.
pub type WsWriter = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Read half of a feed WebSocket connection.
pub type WsReader = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Transitions of one feed connection, delivered to the consumer in
/// arrival order.
#[derive(Debug)]
pub enum FeedEvent {
    /// The connection is open and subscribed.
    Connected,
    /// The connection was lost; a reconnect attempt is starting.
    Reconnecting,
    /// The connection is down. Terminal for this connection instance
    /// unless a reconnect attempt follows.
    Disconnected,
    /// A decoded ticker frame.
    Ticker(TickerMessage),
}

/// One logical push channel: a topic and the symbols to track.
///
/// The symbol set is fixed for the life of the subscription; reconnects
/// always reuse it unchanged.
#[derive(Debug, Clone)]
pub struct Subscription {
    pub topic: String,
    pub symbols: Vec<String>,
}

impl Subscription {
    pub fn new(topic: impl Into<String>, symbols: Vec<String>) -> Self {
        Self {
            topic: topic.into(),
            symbols,
        }
    }

    /// Renders the connect URL: base + `/ws/stock/<topic>/` + one
    /// `stock_picker` query parameter per symbol. Symbol order matters
    /// only for server-side population order.
    pub fn url(&self, ws_base: &str) -> String {
        let mut url = format!("{}/ws/stock/{}/?", ws_base.trim_end_matches('/'), self.topic);
        for (i, symbol) in self.symbols.iter().enumerate() {
            if i > 0 {
                url.push('&');
            }
            url.push_str("stock_picker=");
            url.push_str(&encode_query_value(symbol));
        }
        url
    }
}

/// Percent-encodes everything outside the query unreserved set.
fn encode_query_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Establishes a WebSocket connection to the given URL.
///
/// When a session cookie value is provided it is attached to the upgrade
/// request so the server can authorize the socket before treating it as
/// authenticated. A cookie that cannot be attached degrades to an
/// anonymous connection rather than failing.
///
/// # Errors
///
/// Returns an [`EmberdeskError`](crate::EmberdeskError) if the
/// connection or TLS handshake fails.
pub async fn connect(
    url: &str,
    session_cookie: Option<&str>,
    tls_config: Option<Arc<rustls::ClientConfig>>,
) -> Result<(WsWriter, WsReader)> {
    let mut request = url.into_client_request()?;

    if let Some(cookie) = session_cookie {
        match HeaderValue::from_str(cookie) {
            Ok(value) => {
                request.headers_mut().insert(COOKIE, value);
            }
            Err(e) => {
                warn!(error = %e, "session cookie not attachable, connecting anonymously");
            }
        }
    }

    let connector = tls_config.map(Connector::Rustls);
    let (ws_stream, _) = connect_async_tls_with_config(request, None, false, connector).await?;
    info!("WebSocket handshake completed");

    Ok(ws_stream.split())
}
