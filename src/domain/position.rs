//! Positions and the per-strategy position book.
//!
//! A book belongs to exactly one strategy. It changes only through confirmed
//! fills; a position exists only while its quantity is positive.

use std::collections::HashMap;

use tracing::info;

use crate::domain::error::SigtraderError;
use crate::domain::signal::Action;

#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub instrument: String,
    pub quantity: u64,
    pub average_cost: f64,
}

/// Broker confirmation of an order.
#[derive(Debug, Clone, PartialEq)]
pub struct FillConfirmation {
    pub instrument: String,
    pub action: Action,
    pub quantity: u64,
    pub price: f64,
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PositionBook {
    strategy_id: String,
    positions: HashMap<String, Position>,
}

impl PositionBook {
    pub fn new(strategy_id: impl Into<String>) -> Self {
        PositionBook {
            strategy_id: strategy_id.into(),
            positions: HashMap::new(),
        }
    }

    pub fn strategy_id(&self) -> &str {
        &self.strategy_id
    }

    pub fn get_position(&self, instrument: &str) -> Option<&Position> {
        self.positions.get(instrument)
    }

    pub fn has_position(&self, instrument: &str) -> bool {
        self.positions.contains_key(instrument)
    }

    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    /// All open positions, sorted by instrument.
    pub fn snapshot(&self) -> Vec<Position> {
        let mut positions: Vec<Position> = self.positions.values().cloned().collect();
        positions.sort_by(|a, b| a.instrument.cmp(&b.instrument));
        positions
    }

    /// Apply one fill. Returns the position after the fill, or `None` once it
    /// is closed. On error the book is left untouched.
    pub fn apply_fill(
        &mut self,
        instrument: &str,
        action: Action,
        quantity: u64,
        price: f64,
    ) -> Result<Option<Position>, SigtraderError> {
        if quantity == 0 {
            return Err(SigtraderError::upstream(instrument, "fill quantity is zero"));
        }
        if !price.is_finite() || price <= 0.0 {
            return Err(SigtraderError::upstream(
                instrument,
                format!("fill price must be positive, got {price}"),
            ));
        }

        let updated = match action {
            Action::Buy => {
                let (held, avg) = self
                    .positions
                    .get(instrument)
                    .map_or((0, 0.0), |p| (p.quantity, p.average_cost));
                let new_quantity = held.checked_add(quantity).ok_or_else(|| {
                    SigtraderError::upstream(
                        instrument,
                        format!("fill of {quantity} overflows held quantity {held}"),
                    )
                })?;
                let average_cost =
                    (held as f64 * avg + quantity as f64 * price) / new_quantity as f64;
                let position = Position {
                    instrument: instrument.to_string(),
                    quantity: new_quantity,
                    average_cost,
                };
                self.positions
                    .insert(instrument.to_string(), position.clone());
                Some(position)
            }
            Action::Sell => {
                let held = self.positions.get(instrument).map_or(0, |p| p.quantity);
                if quantity > held {
                    return Err(SigtraderError::InvalidFill {
                        instrument: instrument.to_string(),
                        requested: quantity,
                        held,
                    });
                }
                if quantity == held {
                    self.positions.remove(instrument);
                    None
                } else {
                    self.positions.get_mut(instrument).map(|p| {
                        p.quantity -= quantity;
                        p.clone()
                    })
                }
            }
        };

        info!(
            strategy = %self.strategy_id,
            instrument,
            action = %action,
            quantity,
            price,
            remaining = updated.as_ref().map_or(0, |p| p.quantity),
            "fill applied"
        );
        Ok(updated)
    }

    /// Apply a broker confirmation; unsuccessful confirmations change nothing.
    pub fn apply_confirmation(
        &mut self,
        fill: &FillConfirmation,
    ) -> Result<Option<Position>, SigtraderError> {
        if !fill.success {
            return Ok(self.get_position(&fill.instrument).cloned());
        }
        self.apply_fill(&fill.instrument, fill.action, fill.quantity, fill.price)
    }
}
