//! Per-symbol reconciliation of partial ticker updates.
//!
//! [`TickerBook`] is the process-wide view of instrument state the
//! display layer reads. It consumes decoded feed frames and merges each
//! symbol's partial field set into the stored state without disturbing
//! fields the frame did not mention. It performs no I/O and is
//! independent of the transport that delivered the frame.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::models::ticker::TickerMessage;

/// Direction of the latest price move, for the presentation indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    /// Price equal to the previous one, or no previous price to compare
    /// against (first-ever update for the symbol).
    Unchanged,
}

/// Presentation delta derived from applying one frame: which symbol
/// moved, and which way its price went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerDelta {
    pub symbol: String,
    pub direction: Direction,
}

/// Reconciled state for one symbol.
///
/// Fields start unset; the display layer renders its own placeholder
/// (e.g. "N/A") until the feed first mentions a field. `previous_price`
/// exists only to derive [`Direction`] and is not part of the wire
/// message.
#[derive(Debug, Clone, Default)]
pub struct TickerState {
    pub price: Option<Decimal>,
    pub open: Option<Decimal>,
    pub high: Option<Decimal>,
    pub low: Option<Decimal>,
    pub volume: Option<Decimal>,
    pub previous_price: Option<Decimal>,
}

/// Process-wide ticker state, keyed by symbol.
#[derive(Debug, Default)]
pub struct TickerBook {
    states: HashMap<String, TickerState>,
}

impl TickerBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one decoded feed frame, mutating state for exactly the
    /// symbols the frame names. Unknown symbols are accepted and stored;
    /// whether to render them is the display layer's decision.
    ///
    /// Returns one delta per symbol in the frame. A frame that carries
    /// no price for a symbol yields [`Direction::Unchanged`] for it.
    pub fn apply(&mut self, update: &TickerMessage) -> Vec<TickerDelta> {
        let mut deltas = Vec::with_capacity(update.len());

        for (symbol, fields) in update {
            let state = self.states.entry(symbol.clone()).or_default();

            let direction = match fields.price {
                Some(new_price) => {
                    // Compare before overwriting; the first price for a
                    // symbol has no reference and reads as unchanged.
                    let direction = match state.previous_price {
                        Some(prev) if new_price > prev => Direction::Up,
                        Some(prev) if new_price < prev => Direction::Down,
                        _ => Direction::Unchanged,
                    };
                    state.price = Some(new_price);
                    state.previous_price = Some(new_price);
                    direction
                }
                None => Direction::Unchanged,
            };

            if let Some(open) = fields.open {
                state.open = Some(open);
            }
            if let Some(high) = fields.high {
                state.high = Some(high);
            }
            if let Some(low) = fields.low {
                state.low = Some(low);
            }
            if let Some(vol) = fields.vol {
                state.volume = Some(vol);
            }

            deltas.push(TickerDelta {
                symbol: symbol.clone(),
                direction,
            });
        }

        deltas
    }

    /// Returns the reconciled state for a symbol, if the feed has ever
    /// mentioned it.
    pub fn get(&self, symbol: &str) -> Option<&TickerState> {
        self.states.get(symbol)
    }

    /// Symbols the feed has mentioned so far, in no particular order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
