//! Signal-generating strategies.
//!
//! A strategy runs in two steps: `analyze` turns bars into an indicator
//! bundle, then `generate_signals` decides on the last bar of that bundle,
//! reading the strategy's position book for sell eligibility.

pub mod macd;
pub mod squeeze_momentum;

pub use macd::{MacdBundle, MacdParams, MacdStrategy};
pub use squeeze_momentum::{SqueezeBundle, SqueezeMomentumParams, SqueezeMomentumStrategy};

use tracing::debug;

use crate::domain::error::SigtraderError;
use crate::domain::ohlcv::BarSeries;
use crate::domain::position::PositionBook;
use crate::domain::signal::Signal;

/// Both strategies decide on a current bar against the one before it.
pub const MIN_BARS: usize = 2;

pub trait Strategy: Send + Sync {
    type Bundle;

    fn id(&self) -> &str;

    fn analyze(&self, bars: &BarSeries) -> Result<Self::Bundle, SigtraderError>;

    fn generate_signals(&self, bundle: &Self::Bundle, book: &PositionBook) -> Vec<Signal>;
}

/// Object-safe view of a [`Strategy`], used where strategies of different
/// bundle types are stored side by side.
pub trait SignalSource: Send + Sync {
    fn strategy_id(&self) -> &str;

    fn evaluate(&self, bars: &BarSeries, book: &PositionBook) -> Result<Vec<Signal>, SigtraderError>;
}

impl<S: Strategy> SignalSource for S {
    fn strategy_id(&self) -> &str {
        Strategy::id(self)
    }

    fn evaluate(&self, bars: &BarSeries, book: &PositionBook) -> Result<Vec<Signal>, SigtraderError> {
        let bundle = self.analyze(bars)?;
        let signals = self.generate_signals(&bundle, book);
        debug!(
            strategy = Strategy::id(self),
            instrument = bars.instrument(),
            bars = bars.len(),
            signals = signals.len(),
            "strategy evaluated"
        );
        Ok(signals)
    }
}

pub(crate) fn require_bars(bars: &BarSeries) -> Result<(), SigtraderError> {
    if bars.len() < MIN_BARS {
        return Err(SigtraderError::InsufficientData {
            instrument: bars.instrument().to_string(),
            bars: bars.len(),
            minimum: MIN_BARS,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_bars::flat_bars;

    #[test]
    fn strategies_are_usable_as_trait_objects() {
        let sources: Vec<Box<dyn SignalSource>> = vec![
            Box::new(SqueezeMomentumStrategy::default()),
            Box::new(MacdStrategy::default()),
        ];
        let ids: Vec<&str> = sources.iter().map(|s| s.strategy_id()).collect();
        assert_eq!(ids, vec!["squeeze_momentum", "macd"]);
    }

    #[test]
    fn single_bar_is_insufficient() {
        let bars = flat_bars(&[10.0]);
        let book = PositionBook::new("macd");
        let err = MacdStrategy::default().evaluate(&bars, &book).unwrap_err();
        assert!(matches!(
            err,
            SigtraderError::InsufficientData {
                bars: 1,
                minimum: 2,
                ..
            }
        ));
    }

    #[test]
    fn flat_closes_produce_no_signals() {
        let bars = flat_bars(&[10.0; 60]);
        let mut book = PositionBook::new("any");
        book.apply_fill("TEST", crate::domain::signal::Action::Buy, 10, 10.0)
            .unwrap();

        let squeeze = SqueezeMomentumStrategy::default();
        let macd = MacdStrategy::default();
        assert!(squeeze.evaluate(&bars, &book).unwrap().is_empty());
        assert!(macd.evaluate(&bars, &book).unwrap().is_empty());
    }
}
