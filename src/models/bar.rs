//! OHLC chart-data models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single OHLC bar for one time bucket, as served by
/// `/stock_chart_data/<SYMBOL>/`.
///
/// `time` is epoch seconds, the resolution the candlestick renderer
/// expects. Bars are immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub time: i64,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
}

/// Response from the chart-data endpoint: a bar batch on success, an
/// error payload otherwise.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ChartDataResponse {
    Bars(Vec<Bar>),
    Error(super::BackendError),
}
