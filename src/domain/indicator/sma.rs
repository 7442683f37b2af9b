//! Simple Moving Average indicator.
//!
//! SMA(n)[i] = mean(C[i-n+1..=i]).
//! Warmup: first (n-1) bars are undefined.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::{defined, sma_values};
use crate::domain::ohlcv::BarSeries;

pub fn calculate_sma(bars: &BarSeries, period: usize) -> IndicatorSeries {
    let values = sma_values(&defined(&bars.closes()), period);
    IndicatorSeries::from_values(IndicatorType::Sma(period), bars, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_bars::flat_bars;
    use approx::assert_abs_diff_eq;

    #[test]
    fn sma_warmup() {
        let bars = flat_bars(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let series = calculate_sma(&bars, 3);

        assert_eq!(series.value_at(0), None);
        assert_eq!(series.value_at(1), None);
        assert_abs_diff_eq!(series.value_at(2).unwrap(), 20.0);
        assert_abs_diff_eq!(series.value_at(4).unwrap(), 40.0);
    }

    #[test]
    fn sma_shorter_than_period() {
        let bars = flat_bars(&[10.0, 20.0]);
        let series = calculate_sma(&bars, 5);
        assert_eq!(series.len(), 2);
        assert!(series.values.iter().all(|p| p.value.is_none()));
    }

    #[test]
    fn sma_period_1_is_close() {
        let bars = flat_bars(&[10.0, 20.0]);
        let series = calculate_sma(&bars, 1);
        assert_eq!(series.raw(), vec![Some(10.0), Some(20.0)]);
    }

    #[test]
    fn sma_indicator_type() {
        let bars = flat_bars(&[10.0]);
        assert_eq!(calculate_sma(&bars, 20).indicator_type, IndicatorType::Sma(20));
    }
}
