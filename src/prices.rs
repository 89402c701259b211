//! Live-prices pull endpoint.
//!
//! An alternate polling path for deployments without the push feed. One
//! fetch per call; the caller owns any cadence and treats failures as
//! non-fatal to it, the same way the chart poller does.

use crate::Result;
use crate::models::prices::LivePrices;

/// Fetches the current per-symbol prices and optional portfolio value.
///
/// # Errors
///
/// Returns an [`EmberdeskError`](crate::EmberdeskError) on HTTP failure,
/// a non-success status, or an undecodable body.
pub async fn fetch_live_prices(client: &reqwest::Client, api_url: &str) -> Result<LivePrices> {
    let url = format!("{}/get_live_prices/", api_url.trim_end_matches('/'));
    let response = client.get(url).send().await?.error_for_status()?;

    Ok(response.json::<LivePrices>().await?)
}
