//! Order quantities for ranked signals.
//!
//! Buys spend a fixed fraction of the maximum position value. Sells exit the
//! whole position on high confidence and half of it otherwise.

use crate::domain::position::PositionBook;
use crate::domain::signal::{Action, Signal};

#[derive(Debug, Clone, PartialEq)]
pub struct OrderSizing {
    pub max_position_value: f64,
    /// Fraction of `max_position_value` spent per buy.
    pub allocation_pct: f64,
    /// Sells above this confidence close the whole position.
    pub full_exit_confidence: f64,
}

impl Default for OrderSizing {
    fn default() -> Self {
        Self {
            max_position_value: 1_000_000.0,
            allocation_pct: 0.05,
            full_exit_confidence: 70.0,
        }
    }
}

/// A signal paired with the quantity to order.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedOrder {
    pub signal: Signal,
    pub quantity: u64,
}

fn whole_units(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.floor() as u64
    } else {
        0
    }
}

impl OrderSizing {
    pub fn buy_quantity(&self, price: f64) -> u64 {
        self.position_size(price, self.max_position_value * self.allocation_pct)
    }

    pub fn sell_quantity(&self, held: u64, confidence: f64) -> u64 {
        if confidence > self.full_exit_confidence {
            held
        } else {
            held / 2
        }
    }

    /// Whole units affordable with `risk_amount` at `price`.
    pub fn position_size(&self, price: f64, risk_amount: f64) -> u64 {
        if price <= 0.0 {
            return 0;
        }
        whole_units(risk_amount / price)
    }

    /// Quantity for one signal, or `None` when it sizes to zero.
    pub fn plan_order(&self, signal: &Signal, book: &PositionBook) -> Option<PlannedOrder> {
        let quantity = match signal.action() {
            Action::Buy => self.buy_quantity(signal.reference_price()),
            Action::Sell => {
                let held = book
                    .get_position(signal.instrument())
                    .map_or(0, |p| p.quantity);
                self.sell_quantity(held, signal.confidence())
            }
        };
        (quantity > 0).then(|| PlannedOrder {
            signal: signal.clone(),
            quantity,
        })
    }
}
