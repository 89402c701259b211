//! Wire types for the backend's push and pull interfaces.
//!
//! Contains the ticker push-feed message shape, OHLC chart bars, the
//! place-order request/response pair, and the live-prices pull response.

pub mod bar;
pub mod order;
pub mod prices;
pub mod ticker;

use serde::Deserialize;

/// Error-shaped payload the backend multiplexes onto its JSON endpoints.
///
/// Both `/stock_chart_data/` and `/place_order/` answer with
/// `{"error": "..."}` instead of their success shape when the request
/// cannot be served.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendError {
    pub error: String,
}
