//! OHLCV bar representation and the validated bar series.

use chrono::NaiveDate;

use crate::domain::error::SigtraderError;

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl OhlcvBar {
    /// (high + low) / 2
    pub fn hl2(&self) -> f64 {
        (self.high + self.low) / 2.0
    }

    /// (high + low + close) / 3
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }

    fn check(&self) -> Result<(), String> {
        let prices = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ];
        for (name, value) in prices {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{name} must be positive, got {value}"));
            }
        }
        if self.high < self.low {
            return Err(format!("high {} below low {}", self.high, self.low));
        }
        Ok(())
    }
}

/// Ordered bars of one instrument with strictly increasing dates.
///
/// The only way to build one is [`BarSeries::new`], so every series seen by
/// the indicator engine is non-empty and well formed.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    instrument: String,
    bars: Vec<OhlcvBar>,
}

impl BarSeries {
    pub fn new(instrument: impl Into<String>, bars: Vec<OhlcvBar>) -> Result<Self, SigtraderError> {
        let instrument = instrument.into();
        if bars.is_empty() {
            return Err(SigtraderError::upstream(&instrument, "empty bar series"));
        }
        for (i, bar) in bars.iter().enumerate() {
            bar.check()
                .map_err(|reason| SigtraderError::upstream(&instrument, format!("bar {i}: {reason}")))?;
        }
        if let Some(i) = bars.windows(2).position(|w| w[1].date <= w[0].date) {
            return Err(SigtraderError::upstream(
                &instrument,
                format!(
                    "bar {}: date {} does not follow {}",
                    i + 1,
                    bars[i + 1].date,
                    bars[i].date
                ),
            ));
        }
        Ok(Self { instrument, bars })
    }

    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    pub fn bars(&self) -> &[OhlcvBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always false; kept for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> &OhlcvBar {
        // non-empty by construction
        &self.bars[self.bars.len() - 1]
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.bars.iter().map(|b| b.date)
    }

    /// The first `n` bars (clamped to at least one), for walk-forward evaluation.
    pub fn prefix(&self, n: usize) -> BarSeries {
        let n = n.clamp(1, self.bars.len());
        BarSeries {
            instrument: self.instrument.clone(),
            bars: self.bars[..n].to_vec(),
        }
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume as f64).collect()
    }

    pub fn hl2(&self) -> Vec<f64> {
        self.bars.iter().map(OhlcvBar::hl2).collect()
    }

    pub fn typical_prices(&self) -> Vec<f64> {
        self.bars.iter().map(OhlcvBar::typical_price).collect()
    }

    /// True range per bar; the first bar has no previous close and uses high - low.
    pub fn true_ranges(&self) -> Vec<f64> {
        self.bars
            .iter()
            .enumerate()
            .map(|(i, bar)| match i {
                0 => bar.high - bar.low,
                _ => bar.true_range(self.bars[i - 1].close),
            })
            .collect()
    }
}
