//! Feed connection lifecycle management.
//!
//! [`ConnectionManager`] owns one push-feed connection for one
//! [`Subscription`]: it connects, decodes frames into [`FeedEvent`]s,
//! reconnects with bounded exponential backoff, and actively closes the
//! socket on teardown. It carries no business logic; decoded updates go
//! to the consumer (typically a
//! [`TickerBook`](crate::reconciler::TickerBook) owner) over an
//! unbounded channel.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tungstenite::Message as WsMessage;

use super::{FeedEvent, Subscription, WsReader, connect};
use crate::models::ticker::TickerMessage;

/// Initial backoff duration between reconnection attempts.
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Maximum backoff duration between reconnection attempts.
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Consecutive failed connection attempts before giving up. Reconnection
/// is bounded; re-establishing after that is the caller's decision.
const MAX_CONNECT_ATTEMPTS: u32 = 5;

/// Commands sent from the owning scope to the connection manager.
pub enum ConnectionCommand {
    /// Tear the connection down. Dropping the command sender has the
    /// same effect.
    Close,
}

/// Why the reader loop exited.
enum DisconnectReason {
    /// The connection was lost, errored, or delivered a malformed frame.
    ConnectionError,
    /// The owning scope requested teardown or went away.
    Shutdown,
}

/// Manages one push-feed connection: connect, decode, forward, reconnect
/// with bounded backoff, close on teardown.
pub struct ConnectionManager {
    subscription: Subscription,
    ws_url: String,
    session_token: Option<String>,
    tls_config: Option<Arc<rustls::ClientConfig>>,
    tx: mpsc::UnboundedSender<FeedEvent>,
    cmd_rx: mpsc::UnboundedReceiver<ConnectionCommand>,
}

impl ConnectionManager {
    /// Creates a new connection manager for one subscription.
    #[must_use]
    pub fn new(
        subscription: Subscription,
        ws_url: String,
        session_token: Option<String>,
        tls_config: Option<Arc<rustls::ClientConfig>>,
        tx: mpsc::UnboundedSender<FeedEvent>,
        cmd_rx: mpsc::UnboundedReceiver<ConnectionCommand>,
    ) -> Self {
        Self {
            subscription,
            ws_url,
            session_token,
            tls_config,
            tx,
            cmd_rx,
        }
    }

    /// Runs the connection manager until teardown or until the bounded
    /// reconnect budget is exhausted.
    ///
    /// Every reconnect reuses the original subscription URL, so the
    /// server always sees exactly the symbol set the caller requested.
    pub async fn run(mut self) {
        let mut backoff = INITIAL_BACKOFF;
        let mut attempts: u32 = 0;
        let url = self.subscription.url(&self.ws_url);
        let cookie = crate::session::cookie_header(self.session_token.as_deref());

        loop {
            info!(url = %url, "Connecting to stock feed");
            let (mut write, read) =
                match connect(&url, cookie.as_deref(), self.tls_config.clone()).await {
                    Ok(pair) => pair,
                    Err(e) => {
                        error!("Feed connection failed: {e}");
                        let _ = self.tx.send(FeedEvent::Disconnected);
                        attempts += 1;
                        if attempts >= MAX_CONNECT_ATTEMPTS {
                            error!(attempts, "Reconnect budget exhausted, giving up");
                            return;
                        }
                        info!(backoff_secs = backoff.as_secs(), "Backing off before retry");
                        tokio::time::sleep(backoff).await;
                        backoff = (backoff * 2).min(MAX_BACKOFF);
                        let _ = self.tx.send(FeedEvent::Reconnecting);
                        continue;
                    }
                };

            let _ = self.tx.send(FeedEvent::Connected);
            info!("Stock feed connected");

            // Reset the budget once a connection succeeds
            backoff = INITIAL_BACKOFF;
            attempts = 0;

            match self.read_loop(read).await {
                DisconnectReason::Shutdown => {
                    let _ = write.close().await;
                    info!("Connection manager shutting down");
                    return;
                }
                DisconnectReason::ConnectionError => {
                    let _ = self.tx.send(FeedEvent::Disconnected);
                    attempts += 1;
                    if attempts >= MAX_CONNECT_ATTEMPTS {
                        error!(attempts, "Reconnect budget exhausted, giving up");
                        return;
                    }
                    info!(
                        backoff_secs = backoff.as_secs(),
                        "Feed connection lost, backing off"
                    );
                    tokio::time::sleep(backoff).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF);
                    let _ = self.tx.send(FeedEvent::Reconnecting);
                }
            }
        }
    }

    /// Reads frames from the feed until disconnection or teardown.
    ///
    /// Frames are applied in arrival order; there is no reordering
    /// buffer. A frame that does not decode as a ticker message is
    /// terminal for this connection instance; no data is synthesized
    /// locally.
    async fn read_loop(&mut self, mut read: WsReader) -> DisconnectReason {
        loop {
            tokio::select! {
                msg = read.next() => {
                    match msg {
                        Some(Ok(WsMessage::Text(text))) => {
                            match serde_json::from_str::<TickerMessage>(&text) {
                                Ok(update) => {
                                    if self.tx.send(FeedEvent::Ticker(update)).is_err() {
                                        // Consumer dropped its receiver
                                        return DisconnectReason::Shutdown;
                                    }
                                }
                                Err(e) => {
                                    warn!(error = %e, "Malformed feed frame");
                                    return DisconnectReason::ConnectionError;
                                }
                            }
                        }
                        Some(Ok(WsMessage::Close(_))) => {
                            warn!("Feed closed by server");
                            return DisconnectReason::ConnectionError;
                        }
                        Some(Ok(_)) => {} // Binary/Ping/Pong frames
                        Some(Err(e)) => {
                            warn!("WebSocket error: {e}");
                            return DisconnectReason::ConnectionError;
                        }
                        None => {
                            warn!("WebSocket stream ended");
                            return DisconnectReason::ConnectionError;
                        }
                    }
                }

                cmd = self.cmd_rx.recv() => {
                    match cmd {
                        Some(ConnectionCommand::Close) | None => {
                            return DisconnectReason::Shutdown;
                        }
                    }
                }
            }
        }
    }
}
