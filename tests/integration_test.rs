//! Real backend integration tests.
//!
//! These tests require a running backend on the default local endpoints
//! and network access. Run with: `cargo test --features integration-tests`

#![cfg(feature = "integration-tests")]

use futures_util::StreamExt;

use emberdesk::chart::{chart_data_url, fetch_chart_data};
use emberdesk::models::ticker::TickerMessage;
use emberdesk::websocket::{Subscription, connect};

const BACKEND_WS_URL: &str = "ws://localhost:8000";
const BACKEND_API_URL: &str = "http://localhost:8000";

#[tokio::test]
async fn test_connect_to_stock_feed() {
    let subscription = Subscription::new("track", vec!["AAPL".to_string(), "MSFT".to_string()]);
    let result = connect(&subscription.url(BACKEND_WS_URL), None, None).await;
    assert!(result.is_ok(), "Failed to connect to stock feed");
}

#[tokio::test]
async fn test_receive_ticker_frame() {
    let subscription = Subscription::new("track", vec!["MSFT".to_string()]);
    let (_write, mut read) = connect(&subscription.url(BACKEND_WS_URL), None, None)
        .await
        .expect("Failed to connect");

    // Wait for at least one decodable ticker frame (with timeout)
    let timeout = tokio::time::timeout(tokio::time::Duration::from_secs(10), async {
        while let Some(msg) = read.next().await {
            if let Ok(tungstenite::Message::Text(text)) = msg
                && serde_json::from_str::<TickerMessage>(&text).is_ok()
            {
                return true;
            }
        }
        false
    });

    let received = timeout.await.expect("Timeout waiting for ticker frame");
    assert!(received, "Did not receive a decodable ticker frame");
}

#[tokio::test]
async fn test_fetch_chart_history() {
    let client = emberdesk::http::build_client(None).expect("Failed to build client");
    let url = chart_data_url(BACKEND_API_URL, "MSFT");

    let bars = fetch_chart_data(&client, &url)
        .await
        .expect("Failed to fetch chart history");

    // The series contract: strictly ascending by time
    assert!(bars.windows(2).all(|pair| pair[0].time < pair[1].time));
}

#[tokio::test]
async fn test_fetch_live_prices() {
    let client = emberdesk::http::build_client(None).expect("Failed to build client");

    let prices = emberdesk::prices::fetch_live_prices(&client, BACKEND_API_URL)
        .await
        .expect("Failed to fetch live prices");

    assert!(!prices.prices.is_empty());
}
