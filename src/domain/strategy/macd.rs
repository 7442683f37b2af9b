//! MACD crossover strategy with an RSI filter.
//!
//! BUY on a golden cross (histogram from ≤ 0 to > 0) above a minimum
//! histogram while RSI is below the threshold. SELL a held position on a
//! dead cross (histogram from ≥ 0 to < 0) while RSI is above the threshold.

use crate::domain::error::SigtraderError;
use crate::domain::indicator::macd::{DEFAULT_FAST, DEFAULT_SIGNAL, DEFAULT_SLOW};
use crate::domain::indicator::{IndicatorEngine, IndicatorSeries, MacdSeries, VolumeProfile};
use crate::domain::ohlcv::BarSeries;
use crate::domain::position::PositionBook;
use crate::domain::signal::{Action, Signal, SignalMetrics, SignalReason};
use crate::domain::strategy::{Strategy, require_bars};

pub const STRATEGY_ID: &str = "macd";

#[derive(Debug, Clone, PartialEq)]
pub struct MacdParams {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
    pub rsi_period: usize,
    pub min_histogram: f64,
    pub rsi_threshold: f64,
    pub profile_bins: usize,
    pub volume_window: usize,
    pub confidence_scale: f64,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast: DEFAULT_FAST,
            slow: DEFAULT_SLOW,
            signal: DEFAULT_SIGNAL,
            rsi_period: 14,
            min_histogram: 0.1,
            rsi_threshold: 50.0,
            profile_bins: 20,
            volume_window: 20,
            confidence_scale: 20.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MacdBundle {
    pub instrument: String,
    pub macd: MacdSeries,
    pub rsi: IndicatorSeries,
    pub profile: VolumeProfile,
    pub current_price: f64,
}

/// Last-bar readings the decision is made on.
#[derive(Debug, Clone, Copy)]
struct Reading {
    line: f64,
    signal: f64,
    histogram: f64,
    previous_histogram: f64,
    rsi: f64,
}

impl Reading {
    fn from_bundle(bundle: &MacdBundle) -> Option<Self> {
        Some(Reading {
            line: bundle.macd.line.current()?,
            signal: bundle.macd.signal.current()?,
            histogram: bundle.macd.histogram.current()?,
            previous_histogram: bundle.macd.histogram.previous()?,
            rsi: bundle.rsi.current()?,
        })
    }

    fn metrics(&self) -> SignalMetrics {
        SignalMetrics::Macd {
            line: self.line,
            signal: self.signal,
            histogram: self.histogram,
            rsi: self.rsi,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MacdStrategy {
    engine: IndicatorEngine,
    params: MacdParams,
}

impl MacdStrategy {
    pub fn new(params: MacdParams) -> Self {
        Self {
            engine: IndicatorEngine::new(),
            params,
        }
    }

    pub fn params(&self) -> &MacdParams {
        &self.params
    }

    fn confidence(&self, histogram: f64) -> f64 {
        histogram.abs() / self.params.min_histogram * self.params.confidence_scale
    }

    fn is_golden_cross(&self, r: &Reading) -> bool {
        r.previous_histogram <= 0.0
            && r.histogram > 0.0
            && r.histogram > self.params.min_histogram
            && r.rsi < self.params.rsi_threshold
    }

    fn is_dead_cross(&self, r: &Reading) -> bool {
        r.previous_histogram >= 0.0 && r.histogram < 0.0 && r.rsi > self.params.rsi_threshold
    }
}

impl Strategy for MacdStrategy {
    type Bundle = MacdBundle;

    fn id(&self) -> &str {
        STRATEGY_ID
    }

    fn analyze(&self, bars: &BarSeries) -> Result<MacdBundle, SigtraderError> {
        require_bars(bars)?;
        let p = &self.params;
        Ok(MacdBundle {
            instrument: bars.instrument().to_string(),
            macd: self.engine.macd(bars, p.fast, p.slow, p.signal),
            rsi: self.engine.rsi(bars, p.rsi_period),
            profile: self.engine.volume_profile(bars, p.profile_bins, p.volume_window),
            current_price: bars.last().close,
        })
    }

    fn generate_signals(&self, bundle: &MacdBundle, book: &PositionBook) -> Vec<Signal> {
        let Some(reading) = Reading::from_bundle(bundle) else {
            return Vec::new();
        };

        let decision = if self.is_golden_cross(&reading) {
            Some((Action::Buy, SignalReason::MacdGoldenCross))
        } else if self.is_dead_cross(&reading) && book.has_position(&bundle.instrument) {
            Some((Action::Sell, SignalReason::MacdDeadCross))
        } else {
            None
        };

        decision
            .map(|(action, reason)| {
                Signal::new(
                    bundle.instrument.as_str(),
                    STRATEGY_ID,
                    action,
                    reason,
                    bundle.current_price,
                    self.confidence(reading.histogram),
                    reading.metrics(),
                )
            })
            .into_iter()
            .collect()
    }
}
