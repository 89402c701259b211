//! Market-data synchronization and order-flow core for the emberdesk
//! trading interface.
//!
//! Reconciles two independently arriving feeds into one consistent view
//! of instrument state: a persistent WebSocket push feed of per-symbol
//! ticker updates ([`websocket`] + [`reconciler`]) and a polled REST
//! feed of OHLC candle history ([`chart`]). On top of that view,
//! [`orders`] validates and submits trade intents and applies
//! server-confirmed fills to the account balance. Presentation is an
//! external consumer of the events and snapshots these components emit.

pub mod auth;
pub mod chart;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod orders;
pub mod prices;
pub mod reconciler;
pub mod session;
pub mod tls;
pub mod websocket;

pub use error::{EmberdeskError, Result};
