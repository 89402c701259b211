//! Validation and balance-reconciliation semantics for order submission.

mod common;

use std::sync::atomic::Ordering;

use rust_decimal_macros::dec;

use emberdesk::models::order::{OrderAction, OrderIntent, OrderType};
use emberdesk::orders::{OrderFlow, OrderOutcome};

fn market_buy(symbol: &str, quantity: u32) -> OrderIntent {
    OrderIntent {
        symbol: symbol.to_string(),
        quantity,
        order_type: OrderType::Market,
        limit_price: None,
        action: OrderAction::Buy,
    }
}

#[test]
fn validation_rejects_missing_symbol_and_quantity() {
    let intent = market_buy("", 5);
    assert_eq!(
        OrderFlow::validate(&intent),
        Err("Please select a stock and enter a quantity.")
    );

    let intent = market_buy("MSFT", 0);
    assert_eq!(
        OrderFlow::validate(&intent),
        Err("Please select a stock and enter a quantity.")
    );
}

#[test]
fn validation_rejects_limit_order_without_price() {
    let mut intent = market_buy("MSFT", 10);
    intent.order_type = OrderType::Limit;
    assert_eq!(
        OrderFlow::validate(&intent),
        Err("Please enter a price for the limit order.")
    );

    intent.limit_price = Some(0);
    assert!(OrderFlow::validate(&intent).is_err());

    intent.limit_price = Some(55);
    assert!(OrderFlow::validate(&intent).is_ok());
}

#[tokio::test]
async fn invalid_intent_is_rejected_without_a_network_call() {
    let (base, hits) = common::spawn_backend("200 OK", "{}").await;
    let client = emberdesk::http::build_client(None).unwrap();
    let mut flow = OrderFlow::new(client, base, None, dec!(1000));

    let outcome = flow.submit(&market_buy("", 5)).await;
    assert!(matches!(outcome, OrderOutcome::Rejected { .. }));

    let outcome = flow.submit(&market_buy("MSFT", 0)).await;
    assert!(matches!(outcome, OrderOutcome::Rejected { .. }));

    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert_eq!(flow.balance(), dec!(1000));
}

#[tokio::test]
async fn confirmed_fill_replaces_balance_with_server_value() {
    let (base, _hits) = common::spawn_backend(
        "200 OK",
        r#"{"message":"ok","quantity":10,"stock":"MSFT","price":50.5,"balance":949.5}"#,
    )
    .await;
    let client = emberdesk::http::build_client(None).unwrap();
    let mut flow = OrderFlow::new(client, base, None, dec!(1000));

    let outcome = flow.submit(&market_buy("MSFT", 10)).await;
    match outcome {
        OrderOutcome::Confirmed {
            message,
            quantity,
            symbol,
            price,
        } => {
            assert_eq!(message, "ok");
            assert_eq!(quantity, 10);
            assert_eq!(symbol, "MSFT");
            assert_eq!(price, dec!(50.5));
        }
        other => panic!("expected confirmation, got {other:?}"),
    }

    // The server's number, not 1000 - 10 * 50.5 recomputed locally
    assert_eq!(flow.balance(), dec!(949.5));
}

#[tokio::test]
async fn fill_without_message_surfaces_synthesized_text() {
    let (base, _hits) = common::spawn_backend(
        "200 OK",
        r#"{"quantity":10,"stock":"MSFT","price":50.5,"balance":495.0}"#,
    )
    .await;
    let client = emberdesk::http::build_client(None).unwrap();
    let mut flow = OrderFlow::new(client, base, None, dec!(1000));

    let outcome = flow.submit(&market_buy("MSFT", 10)).await;
    match outcome {
        OrderOutcome::Confirmed { message, .. } => {
            assert_eq!(message, "Successfully buy 10 shares of MSFT at $50.50!");
        }
        other => panic!("expected confirmation, got {other:?}"),
    }
}

#[tokio::test]
async fn server_error_is_surfaced_verbatim_and_balance_untouched() {
    let (base, _hits) = common::spawn_backend("200 OK", r#"{"error":"Insufficient funds"}"#).await;
    let client = emberdesk::http::build_client(None).unwrap();
    let mut flow = OrderFlow::new(client, base, None, dec!(1000));

    let outcome = flow.submit(&market_buy("MSFT", 10)).await;
    assert_eq!(
        outcome,
        OrderOutcome::Rejected {
            message: "Insufficient funds".to_string()
        }
    );
    assert_eq!(flow.balance(), dec!(1000));
}

#[tokio::test]
async fn http_failure_with_error_payload_surfaces_server_text() {
    let (base, _hits) =
        common::spawn_backend("400 Bad Request", r#"{"error":"Unknown order type"}"#).await;
    let client = emberdesk::http::build_client(None).unwrap();
    let mut flow = OrderFlow::new(client, base, None, dec!(1000));

    let outcome = flow.submit(&market_buy("MSFT", 10)).await;
    assert_eq!(
        outcome,
        OrderOutcome::Rejected {
            message: "Unknown order type".to_string()
        }
    );
    assert_eq!(flow.balance(), dec!(1000));
}

#[tokio::test]
async fn undecodable_response_surfaces_generic_message() {
    let (base, _hits) = common::spawn_backend("200 OK", "not json").await;
    let client = emberdesk::http::build_client(None).unwrap();
    let mut flow = OrderFlow::new(client, base, None, dec!(1000));

    let outcome = flow.submit(&market_buy("MSFT", 10)).await;
    assert_eq!(
        outcome,
        OrderOutcome::Rejected {
            message: "An error occurred while placing the order.".to_string()
        }
    );
    assert_eq!(flow.balance(), dec!(1000));
}

#[tokio::test]
async fn unreachable_backend_is_a_rejection_not_a_panic() {
    // Nothing listens on this port
    let client = emberdesk::http::build_client(None).unwrap();
    let mut flow = OrderFlow::new(client, "http://127.0.0.1:1".to_string(), None, dec!(1000));

    let outcome = flow.submit(&market_buy("MSFT", 10)).await;
    assert!(matches!(outcome, OrderOutcome::Rejected { .. }));
    assert_eq!(flow.balance(), dec!(1000));

    // The controller stays usable after a failed operation
    let outcome = flow.submit(&market_buy("", 1)).await;
    assert!(matches!(outcome, OrderOutcome::Rejected { .. }));
}
