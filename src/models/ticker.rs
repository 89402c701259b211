//! Push-feed ticker message models.
//!
//! A feed frame is a JSON object keyed by ticker symbol, each value an
//! object carrying any subset of the recognized fields. An absent field
//! means "no change reported this tick", not "set to empty".

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;

/// One decoded push-feed frame: per-symbol partial field updates.
pub type TickerMessage = HashMap<String, TickerFields>;

/// The recognized per-symbol fields of a ticker update.
///
/// The feed sends values either as JSON numbers or as numeric strings;
/// [`Decimal`] deserializes both.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TickerFields {
    pub price: Option<Decimal>,
    pub open: Option<Decimal>,
    pub high: Option<Decimal>,
    pub low: Option<Decimal>,
    pub vol: Option<Decimal>,
}
