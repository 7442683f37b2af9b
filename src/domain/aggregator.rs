//! Merging and ranking of signals from several strategies.

use tracing::debug;

use crate::domain::signal::Signal;

pub const DEFAULT_MIN_CONFIDENCE: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalAggregator {
    min_confidence: f64,
}

impl Default for SignalAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_CONFIDENCE)
    }
}

impl SignalAggregator {
    pub fn new(min_confidence: f64) -> Self {
        Self { min_confidence }
    }

    pub fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    /// Drop signals below the confidence threshold and order the rest by
    /// confidence, highest first. Equal confidences keep their input order.
    pub fn aggregate(&self, signals: Vec<Signal>) -> Vec<Signal> {
        let received = signals.len();
        let mut ranked: Vec<Signal> = signals
            .into_iter()
            .filter(|s| s.confidence() >= self.min_confidence)
            .collect();
        ranked.sort_by(|a, b| b.confidence().total_cmp(&a.confidence()));

        debug!(
            received,
            kept = ranked.len(),
            min_confidence = self.min_confidence,
            "signals aggregated"
        );
        ranked
    }
}
