//! RSI (Relative Strength Index) indicator.
//!
//! Uses Wilder's smoothing for average gain/loss calculation:
//! - First average: simple mean of gains/losses over the first n price changes
//! - Subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: first n bars are undefined (need n price changes to compute initial average).

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::BarSeries;

/// Running state threaded through the smoothing pass.
#[derive(Debug, Clone, Copy, Default)]
struct Averages {
    seen: usize,
    gain_sum: f64,
    loss_sum: f64,
    avg_gain: f64,
    avg_loss: f64,
}

impl Averages {
    fn step(self, gain: f64, loss: f64, period: usize) -> Self {
        let seen = self.seen + 1;
        let n = period as f64;
        if seen < period {
            Averages {
                seen,
                gain_sum: self.gain_sum + gain,
                loss_sum: self.loss_sum + loss,
                ..self
            }
        } else if seen == period {
            Averages {
                seen,
                gain_sum: self.gain_sum + gain,
                loss_sum: self.loss_sum + loss,
                avg_gain: (self.gain_sum + gain) / n,
                avg_loss: (self.loss_sum + loss) / n,
            }
        } else {
            Averages {
                seen,
                avg_gain: (self.avg_gain * (n - 1.0) + gain) / n,
                avg_loss: (self.avg_loss * (n - 1.0) + loss) / n,
                ..self
            }
        }
    }

    fn rsi(&self, period: usize) -> Option<f64> {
        if self.seen < period {
            return None;
        }
        if self.avg_loss == 0.0 {
            return Some(100.0);
        }
        Some(100.0 - 100.0 / (1.0 + self.avg_gain / self.avg_loss))
    }
}

pub fn calculate_rsi(bars: &BarSeries, period: usize) -> IndicatorSeries {
    let closes = bars.closes();
    let mut values = Vec::with_capacity(closes.len());
    values.push(None);

    if period > 0 {
        values.extend(
            closes
                .windows(2)
                .scan(Averages::default(), |state, pair| {
                    let change = pair[1] - pair[0];
                    *state = state.step(change.max(0.0), (-change).max(0.0), period);
                    Some(state.rsi(period))
                }),
        );
    } else {
        values.resize(closes.len(), None);
    }

    IndicatorSeries::from_values(IndicatorType::Rsi(period), bars, values)
}
