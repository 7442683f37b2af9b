//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! Default parameters: fast=12, slow=26, signal=9
//! Every EMA is seeded with its first input, so all three lines are defined
//! from the first bar.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::ema_values;
use crate::domain::ohlcv::BarSeries;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub line: IndicatorSeries,
    pub signal: IndicatorSeries,
    pub histogram: IndicatorSeries,
}

pub fn calculate_macd(
    bars: &BarSeries,
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> MacdSeries {
    let indicator_type = IndicatorType::Macd {
        fast,
        slow,
        signal: signal_period,
    };

    if fast == 0 || slow == 0 || signal_period == 0 {
        let undefined = vec![None; bars.len()];
        return MacdSeries {
            line: IndicatorSeries::from_values(indicator_type.clone(), bars, undefined.clone()),
            signal: IndicatorSeries::from_values(indicator_type.clone(), bars, undefined.clone()),
            histogram: IndicatorSeries::from_values(indicator_type, bars, undefined),
        };
    }

    let closes = bars.closes();
    let ema_fast = ema_values(&closes, fast);
    let ema_slow = ema_values(&closes, slow);

    let line: Vec<f64> = ema_fast.iter().zip(&ema_slow).map(|(f, s)| f - s).collect();
    let signal = ema_values(&line, signal_period);
    let histogram: Vec<f64> = line.iter().zip(&signal).map(|(l, s)| l - s).collect();

    let lift = |v: Vec<f64>| v.into_iter().map(Some).collect::<Vec<_>>();
    MacdSeries {
        line: IndicatorSeries::from_values(indicator_type.clone(), bars, lift(line)),
        signal: IndicatorSeries::from_values(indicator_type.clone(), bars, lift(signal)),
        histogram: IndicatorSeries::from_values(indicator_type, bars, lift(histogram)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_bars::flat_bars;
    use approx::assert_abs_diff_eq;

    #[test]
    fn macd_constant_prices_is_exactly_zero() {
        let bars = flat_bars(&[10.0; 60]);
        let macd = calculate_macd(&bars, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL);
        for i in 0..60 {
            assert_eq!(macd.line.value_at(i), Some(0.0));
            assert_eq!(macd.histogram.value_at(i), Some(0.0));
        }
    }

    #[test]
    fn macd_defined_from_first_bar() {
        let bars = flat_bars(&[10.0, 11.0, 12.0]);
        let macd = calculate_macd(&bars, 12, 26, 9);
        assert!(macd.histogram.values.iter().all(|p| p.value.is_some()));
        assert_eq!(macd.histogram.value_at(0), Some(0.0));
    }

    #[test]
    fn macd_histogram_is_line_minus_signal() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let bars = flat_bars(&closes);
        let macd = calculate_macd(&bars, 12, 26, 9);
        for i in 0..40 {
            let expected = macd.line.value_at(i).unwrap() - macd.signal.value_at(i).unwrap();
            assert_abs_diff_eq!(macd.histogram.value_at(i).unwrap(), expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn macd_uptrend_is_positive() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let bars = flat_bars(&closes);
        let macd = calculate_macd(&bars, 12, 26, 9);
        assert!(macd.line.current().unwrap() > 0.0);
        assert!(macd.histogram.value_at(1).unwrap() > 0.0);
    }

    #[test]
    fn macd_zero_period_is_undefined() {
        let bars = flat_bars(&[10.0, 11.0]);
        let macd = calculate_macd(&bars, 0, 26, 9);
        assert_eq!(macd.line.raw(), vec![None, None]);
        assert_eq!(macd.histogram.raw(), vec![None, None]);
    }

    #[test]
    fn macd_indicator_type() {
        let bars = flat_bars(&[10.0]);
        let macd = calculate_macd(&bars, 12, 26, 9);
        assert_eq!(
            macd.line.indicator_type,
            IndicatorType::Macd {
                fast: 12,
                slow: 26,
                signal: 9
            }
        );
    }
}
