//! Headless feed driver for local development: connects the push feed,
//! polls chart history for one symbol, and logs the reconciled view.

use emberdesk::EmberdeskError;
use emberdesk::chart::ChartPoller;
use emberdesk::config::fetch_config;
use emberdesk::reconciler::TickerBook;
use emberdesk::websocket::connection::ConnectionManager;
use emberdesk::websocket::{FeedEvent, Subscription};
use tokio::sync::mpsc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), EmberdeskError> {
    // Initialize tracing subscriber for logging output.
    tracing_subscriber::fmt::init();

    emberdesk::session::populate_env_from_keychain();
    let app_config = fetch_config()?;
    let backend = app_config.backend;

    let tls_config = match &backend.ca_bundle {
        Some(path) => Some(std::sync::Arc::new(emberdesk::tls::build_tls_config(path)?)),
        None => None,
    };

    let symbols = vec!["AAPL".to_string(), "MSFT".to_string()];
    let subscription = Subscription::new("track", symbols);

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let (_cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let manager = ConnectionManager::new(
        subscription,
        backend.ws_url.clone(),
        backend.session_token.clone(),
        tls_config.clone(),
        event_tx,
        cmd_rx,
    );
    tokio::spawn(manager.run());

    let client = emberdesk::http::build_client(tls_config.as_deref().cloned())?;
    let (snapshot_tx, mut snapshot_rx) = mpsc::unbounded_channel();
    let (_poll_cmd_tx, poll_cmd_rx) = mpsc::unbounded_channel();
    let poller = ChartPoller::new(
        client,
        backend.api_url.clone(),
        "MSFT".to_string(),
        snapshot_tx,
        poll_cmd_rx,
    );
    tokio::spawn(poller.run());

    let mut book = TickerBook::new();
    loop {
        tokio::select! {
            event = event_rx.recv() => {
                match event {
                    Some(FeedEvent::Ticker(update)) => {
                        for delta in book.apply(&update) {
                            let state = book.get(&delta.symbol);
                            info!(
                                symbol = %delta.symbol,
                                direction = ?delta.direction,
                                price = ?state.and_then(|s| s.price),
                                "Ticker update"
                            );
                        }
                    }
                    Some(event) => info!(?event, "Feed transition"),
                    None => break,
                }
            }
            snapshot = snapshot_rx.recv() => {
                match snapshot {
                    Some(bars) => info!(bars = bars.len(), "Chart series updated"),
                    None => break,
                }
            }
        }
    }

    Ok(())
}
