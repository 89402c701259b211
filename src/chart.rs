//! OHLC chart-data polling and merging.
//!
//! [`ChartSeries`] holds the canonical bar series for one symbol as an
//! ordered map keyed by bar time, so the snapshot handed to the renderer
//! is always strictly ascending and duplicate timestamps from
//! overlapping polls resolve last-write-wins. Poll responses carry a
//! monotonically increasing sequence number; a response superseded by a
//! newer one is discarded instead of overwriting it.
//!
//! [`ChartPoller`] drives the cadence: one fetch immediately on start,
//! then one every two seconds. A failed cycle keeps the last good series
//! and the cadence continues. One poller serves one symbol; switching
//! symbols means shutting this poller down before starting the next, so
//! two cadences never write into the same series.

use std::collections::BTreeMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::Result;
use crate::models::bar::{Bar, ChartDataResponse};

/// Fixed polling cadence for chart history.
pub const POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Canonical ascending-time bar series with stale-response protection.
#[derive(Debug, Default)]
pub struct ChartSeries {
    bars: BTreeMap<i64, Bar>,
    last_seq: u64,
}

impl ChartSeries {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges a polled batch tagged with its request sequence number.
    ///
    /// Returns the fresh ascending snapshot, or `None` when the batch is
    /// stale (a response with a higher sequence already landed). The
    /// batch may arrive unsorted or carry revisions of known timestamps;
    /// bars are upserted by time, never appended blindly, and the series
    /// is never wholesale replaced.
    pub fn apply(&mut self, seq: u64, batch: Vec<Bar>) -> Option<Vec<Bar>> {
        if seq < self.last_seq {
            return None;
        }
        self.last_seq = seq;

        for bar in batch {
            self.bars.insert(bar.time, bar);
        }

        Some(self.snapshot())
    }

    /// The full series in ascending time order, as the renderer consumes
    /// it.
    pub fn snapshot(&self) -> Vec<Bar> {
        self.bars.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// Commands sent from the owning scope to a running poller.
pub enum PollerCommand {
    /// Stop the cadence. Dropping the command sender has the same
    /// effect.
    Close,
}

/// Polls `/stock_chart_data/<SYMBOL>/` on a fixed cadence and publishes
/// merged snapshots to the renderer channel.
pub struct ChartPoller {
    client: reqwest::Client,
    api_url: String,
    symbol: String,
    series: ChartSeries,
    next_seq: u64,
    snapshot_tx: mpsc::UnboundedSender<Vec<Bar>>,
    cmd_rx: mpsc::UnboundedReceiver<PollerCommand>,
}

impl ChartPoller {
    /// Creates a poller for one symbol. The client should carry the
    /// shared request timeout (see [`crate::http::build_client`]).
    #[must_use]
    pub fn new(
        client: reqwest::Client,
        api_url: String,
        symbol: String,
        snapshot_tx: mpsc::UnboundedSender<Vec<Bar>>,
        cmd_rx: mpsc::UnboundedReceiver<PollerCommand>,
    ) -> Self {
        Self {
            client,
            api_url,
            symbol,
            series: ChartSeries::new(),
            next_seq: 1,
            snapshot_tx,
            cmd_rx,
        }
    }

    /// Runs the polling cadence until teardown.
    ///
    /// Requests are issued concurrently with the cadence, so a slow
    /// response never delays the next tick; the sequence guard in
    /// [`ChartSeries::apply`] keeps a late response from overwriting a
    /// newer one. Any failure skips the cycle and keeps the last good
    /// series. After teardown, responses still in flight are dropped
    /// unobserved.
    pub async fn run(mut self) {
        let url = chart_data_url(&self.api_url, &self.symbol);
        let (resp_tx, mut resp_rx) = mpsc::unbounded_channel();
        let mut ticker = tokio::time::interval(POLL_INTERVAL);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let seq = self.next_seq;
                    self.next_seq += 1;
                    let client = self.client.clone();
                    let url = url.clone();
                    let tx = resp_tx.clone();
                    tokio::spawn(async move {
                        let result = fetch_chart_data(&client, &url).await;
                        let _ = tx.send((seq, result));
                    });
                }

                resp = resp_rx.recv() => {
                    // The loop holds a sender, so recv never yields None here
                    let Some((seq, result)) = resp else { return };
                    match result {
                        Ok(batch) => match self.series.apply(seq, batch) {
                            Some(snapshot) => {
                                if self.snapshot_tx.send(snapshot).is_err() {
                                    info!(symbol = %self.symbol, "Renderer gone, stopping chart poller");
                                    return;
                                }
                            }
                            None => {
                                debug!(symbol = %self.symbol, seq, "Discarding stale chart response");
                            }
                        },
                        Err(e) => {
                            warn!(symbol = %self.symbol, error = %e, "Chart poll failed, keeping last series");
                        }
                    }
                }

                cmd = self.cmd_rx.recv() => {
                    match cmd {
                        Some(PollerCommand::Close) | None => {
                            info!(symbol = %self.symbol, "Chart poller shutting down");
                            return;
                        }
                    }
                }
            }
        }
    }
}

/// Renders the chart-data endpoint URL for a symbol.
pub fn chart_data_url(api_url: &str, symbol: &str) -> String {
    format!("{}/stock_chart_data/{}/", api_url.trim_end_matches('/'), symbol)
}

/// Fetches one bar batch from the chart-data endpoint.
///
/// # Errors
///
/// Returns an [`EmberdeskError`](crate::EmberdeskError) on HTTP failure,
/// a non-success status, an undecodable body, or a server-reported
/// `{error}` payload. The poller treats all of these as non-fatal to
/// the cadence.
pub async fn fetch_chart_data(client: &reqwest::Client, url: &str) -> Result<Vec<Bar>> {
    let response = client.get(url).send().await?.error_for_status()?;

    match response.json::<ChartDataResponse>().await? {
        ChartDataResponse::Bars(bars) => Ok(bars),
        ChartDataResponse::Error(err) => Err(crate::EmberdeskError::Backend(err.error)),
    }
}
