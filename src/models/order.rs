//! Order-submission models.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whether the order executes at market or rests at a limit price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Market,
    Limit,
}

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderAction {
    Buy,
    Sell,
}

impl fmt::Display for OrderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderAction::Buy => f.write_str("buy"),
            OrderAction::Sell => f.write_str("sell"),
        }
    }
}

/// A trade intent as captured from the UI selection, before validation.
#[derive(Debug, Clone)]
pub struct OrderIntent {
    pub symbol: String,
    pub quantity: u32,
    pub order_type: OrderType,
    /// Required iff `order_type` is [`OrderType::Limit`].
    pub limit_price: Option<i64>,
    pub action: OrderAction,
}

/// Form-encoded body of `POST /place_order/`.
#[derive(Debug, Serialize)]
pub struct PlaceOrderRequest {
    pub stock_symbol: String,
    pub quantity: u32,
    pub order_type: OrderType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    pub action: OrderAction,
}

impl PlaceOrderRequest {
    /// Builds the wire body from a validated intent. The limit price is
    /// only sent for limit orders.
    pub fn from_intent(intent: &OrderIntent) -> Self {
        Self {
            stock_symbol: intent.symbol.clone(),
            quantity: intent.quantity,
            order_type: intent.order_type,
            price: match intent.order_type {
                OrderType::Limit => intent.limit_price,
                OrderType::Market => None,
            },
            action: intent.action,
        }
    }
}

/// Response from `/place_order/`: an explicit error payload, or a
/// server-confirmed fill.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PlaceOrderResponse {
    Error(super::BackendError),
    Fill(OrderFill),
}

/// A server-confirmed execution. `balance` is authoritative; the client
/// never recomputes it locally.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderFill {
    #[serde(default)]
    pub message: Option<String>,
    pub quantity: u32,
    pub stock: String,
    pub price: Decimal,
    pub balance: Decimal,
}
