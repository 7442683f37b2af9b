//! Trading signals produced by strategies.
//!
//! A `Signal` is built once and then only read: its fields are private and
//! the confidence is clamped to [0, 100] at construction.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Buy,
    Sell,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Buy => write!(f, "BUY"),
            Action::Sell => write!(f, "SELL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalReason {
    /// Squeeze released with rising momentum and a volume surge.
    SqueezeRelease,
    /// Squeeze momentum turned from positive to non-positive.
    MomentumReversal,
    /// MACD histogram crossed above zero with RSI below threshold.
    MacdGoldenCross,
    /// MACD histogram crossed below zero with RSI above threshold.
    MacdDeadCross,
}

impl SignalReason {
    pub fn code(&self) -> &'static str {
        match self {
            SignalReason::SqueezeRelease => "SQUEEZE_RELEASE",
            SignalReason::MomentumReversal => "MOMENTUM_REVERSAL",
            SignalReason::MacdGoldenCross => "MACD_GOLDEN_CROSS",
            SignalReason::MacdDeadCross => "MACD_DEAD_CROSS",
        }
    }
}

impl fmt::Display for SignalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Heuristic score in [0, 100]. NaN becomes 0.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Confidence(f64);

impl Confidence {
    pub const MAX: f64 = 100.0;

    pub fn new(raw: f64) -> Self {
        if raw.is_nan() {
            return Confidence(0.0);
        }
        Confidence(raw.clamp(0.0, Self::MAX))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

/// Indicator readings that justified a signal, kept for reporting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SignalMetrics {
    Squeeze {
        momentum: f64,
        previous_momentum: f64,
    },
    Macd {
        line: f64,
        signal: f64,
        histogram: f64,
        rsi: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    instrument: String,
    strategy_id: String,
    action: Action,
    reason: SignalReason,
    reference_price: f64,
    confidence: Confidence,
    metrics: SignalMetrics,
}

impl Signal {
    pub fn new(
        instrument: impl Into<String>,
        strategy_id: impl Into<String>,
        action: Action,
        reason: SignalReason,
        reference_price: f64,
        raw_confidence: f64,
        metrics: SignalMetrics,
    ) -> Self {
        Self {
            instrument: instrument.into(),
            strategy_id: strategy_id.into(),
            action,
            reason,
            reference_price,
            confidence: Confidence::new(raw_confidence),
            metrics,
        }
    }

    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    pub fn strategy_id(&self) -> &str {
        &self.strategy_id
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn reason(&self) -> SignalReason {
        self.reason
    }

    pub fn reference_price(&self) -> f64 {
        self.reference_price
    }

    pub fn confidence(&self) -> f64 {
        self.confidence.value()
    }

    pub fn metrics(&self) -> &SignalMetrics {
        &self.metrics
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}] {} @ {} ({})",
            self.action,
            self.instrument,
            self.strategy_id,
            self.reason,
            self.reference_price,
            self.confidence
        )
    }
}
