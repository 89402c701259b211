//! Live-prices pull models.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;

/// Response from `GET /get_live_prices/`.
#[derive(Debug, Clone, Deserialize)]
pub struct LivePrices {
    /// Latest price per symbol.
    pub prices: HashMap<String, Decimal>,
    /// Aggregate portfolio value, when the backend reports one.
    #[serde(default, rename = "portfolioValue")]
    pub portfolio_value: Option<Decimal>,
}
