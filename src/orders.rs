//! Order validation, submission, and balance reconciliation.
//!
//! [`OrderFlow`] is the state machine behind the buy/sell controls:
//! Idle → Validating → Submitting → Confirmed or Rejected → Idle. A
//! locally invalid intent never reaches the network; a server-confirmed
//! fill replaces the account balance with the server-reported value, and
//! nothing else ever mutates it.

use reqwest::header::COOKIE;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::models::BackendError;
use crate::models::order::{OrderIntent, OrderType, PlaceOrderRequest, PlaceOrderResponse};

/// Surfaced when the backend gives no usable error text.
const GENERIC_FAILURE: &str = "An error occurred while placing the order.";

/// Surfaced when a submission is attempted while one is in flight.
const BUSY_MESSAGE: &str = "An order is already being submitted.";

/// Account view owned by the order flow. The balance changes only as a
/// direct function of a server-confirmed fill, never from a local
/// quantity times price estimate.
#[derive(Debug, Clone)]
pub struct AccountState {
    pub balance: Decimal,
}

/// Outcome of one submission attempt, for the message surface.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderOutcome {
    Confirmed {
        message: String,
        quantity: u32,
        symbol: String,
        price: Decimal,
    },
    Rejected {
        message: String,
    },
}

/// Internal submission phase. A new submission is ignored unless the
/// flow is idle, so a double-click cannot produce duplicate fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Submitting,
}

/// Validates and submits trade intents against `/place_order/`.
pub struct OrderFlow {
    client: reqwest::Client,
    api_url: String,
    session_token: Option<String>,
    phase: Phase,
    account: AccountState,
}

impl OrderFlow {
    /// Creates an order flow. The client should carry the shared request
    /// timeout (see [`crate::http::build_client`]); a timed-out
    /// submission surfaces as a rejection.
    #[must_use]
    pub fn new(
        client: reqwest::Client,
        api_url: String,
        session_token: Option<String>,
        opening_balance: Decimal,
    ) -> Self {
        Self {
            client,
            api_url,
            session_token,
            phase: Phase::Idle,
            account: AccountState {
                balance: opening_balance,
            },
        }
    }

    /// Current account balance, as last confirmed by the server.
    pub fn balance(&self) -> Decimal {
        self.account.balance
    }

    /// Checks an intent locally, returning the user-facing message for
    /// the first problem found. No network traffic is generated.
    pub fn validate(intent: &OrderIntent) -> std::result::Result<(), &'static str> {
        if intent.symbol.is_empty() || intent.quantity == 0 {
            return Err("Please select a stock and enter a quantity.");
        }
        if intent.order_type == OrderType::Limit
            && !intent.limit_price.is_some_and(|price| price > 0)
        {
            return Err("Please enter a price for the limit order.");
        }
        Ok(())
    }

    /// Validates and submits one intent, applying a confirmed fill to
    /// the account state.
    ///
    /// A locally invalid intent is rejected without a network call. The
    /// server's error text is surfaced verbatim when provided; transport
    /// failures, non-success statuses, and undecodable bodies surface a
    /// generic message. In every rejected case the balance is untouched.
    pub async fn submit(&mut self, intent: &OrderIntent) -> OrderOutcome {
        if self.phase != Phase::Idle {
            warn!(symbol = %intent.symbol, "Ignoring submission while one is in flight");
            return OrderOutcome::Rejected {
                message: BUSY_MESSAGE.to_string(),
            };
        }

        if let Err(message) = Self::validate(intent) {
            return OrderOutcome::Rejected {
                message: message.to_string(),
            };
        }

        self.phase = Phase::Submitting;
        let outcome = self.send_order(intent).await;
        self.phase = Phase::Idle;
        outcome
    }

    async fn send_order(&mut self, intent: &OrderIntent) -> OrderOutcome {
        let request = PlaceOrderRequest::from_intent(intent);
        let url = format!("{}/place_order/", self.api_url.trim_end_matches('/'));

        let mut builder = self.client.post(&url).form(&request);
        if let Some(cookie) = crate::session::cookie_header(self.session_token.as_deref()) {
            builder = builder.header(COOKIE, cookie);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(symbol = %intent.symbol, error = %e, "Order submission failed");
                return OrderOutcome::Rejected {
                    message: GENERIC_FAILURE.to_string(),
                };
            }
        };

        let status = response.status();
        if !status.is_success() {
            // The backend may still carry a usable error payload
            let message = response
                .text()
                .await
                .ok()
                .and_then(|body| serde_json::from_str::<BackendError>(&body).ok())
                .map(|err| err.error);
            warn!(symbol = %intent.symbol, %status, "Order rejected by server");
            return OrderOutcome::Rejected {
                message: message.unwrap_or_else(|| GENERIC_FAILURE.to_string()),
            };
        }

        match response.json::<PlaceOrderResponse>().await {
            Ok(PlaceOrderResponse::Fill(fill)) => {
                self.account.balance = fill.balance;
                let message = fill.message.clone().unwrap_or_else(|| {
                    format!(
                        "Successfully {} {} shares of {} at ${:.2}!",
                        intent.action, fill.quantity, fill.stock, fill.price
                    )
                });
                info!(
                    action = %intent.action,
                    quantity = fill.quantity,
                    symbol = %fill.stock,
                    price = %fill.price,
                    balance = %fill.balance,
                    "Order confirmed"
                );
                OrderOutcome::Confirmed {
                    message,
                    quantity: fill.quantity,
                    symbol: fill.stock,
                    price: fill.price,
                }
            }
            Ok(PlaceOrderResponse::Error(err)) => {
                warn!(symbol = %intent.symbol, error = %err.error, "Order rejected by server");
                OrderOutcome::Rejected { message: err.error }
            }
            Err(e) => {
                warn!(symbol = %intent.symbol, error = %e, "Undecodable order response");
                OrderOutcome::Rejected {
                    message: GENERIC_FAILURE.to_string(),
                }
            }
        }
    }
}
