//! Average True Range indicator.
//!
//! TR[0] = high − low, TR[i] = max(high−low, |high−prevClose|, |low−prevClose|).
//! ATR(n) = SMA(TR, n). Warmup: first (n-1) bars are undefined.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::{defined, sma_values};
use crate::domain::ohlcv::BarSeries;

pub fn calculate_atr(bars: &BarSeries, period: usize) -> IndicatorSeries {
    let values = sma_values(&defined(&bars.true_ranges()), period);
    IndicatorSeries::from_values(IndicatorType::Atr(period), bars, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_bars::ohlc_bars;
    use approx::assert_abs_diff_eq;

    #[test]
    fn atr_warmup() {
        let bars = ohlc_bars(&[(110.0, 90.0, 100.0); 5]);
        let series = calculate_atr(&bars, 3);
        assert_eq!(series.len(), 5);
        assert_eq!(series.value_at(0), None);
        assert_eq!(series.value_at(1), None);
        assert!(series.value_at(2).is_some());
    }

    #[test]
    fn atr_is_simple_average_of_true_range() {
        let bars = ohlc_bars(&[
            (110.0, 100.0, 105.0),
            (115.0, 105.0, 110.0),
            (120.0, 110.0, 115.0),
            (140.0, 115.0, 120.0),
        ]);
        let series = calculate_atr(&bars, 3);
        assert_abs_diff_eq!(series.value_at(2).unwrap(), 10.0, epsilon = 1e-9);
        // TRs 10, 10, 25 → 15
        assert_abs_diff_eq!(series.value_at(3).unwrap(), 15.0, epsilon = 1e-9);
    }

    #[test]
    fn atr_handles_gaps() {
        let bars = ohlc_bars(&[
            (110.0, 100.0, 105.0),
            (130.0, 120.0, 125.0),
            (120.0, 110.0, 115.0),
        ]);
        let series = calculate_atr(&bars, 2);
        // TRs: 10, 25 (130 − 105), 15 (|110 − 125|)
        assert_abs_diff_eq!(series.value_at(1).unwrap(), 17.5, epsilon = 1e-9);
        assert_abs_diff_eq!(series.value_at(2).unwrap(), 20.0, epsilon = 1e-9);
    }

    #[test]
    fn atr_insufficient_bars() {
        let bars = ohlc_bars(&[(110.0, 90.0, 100.0); 2]);
        let series = calculate_atr(&bars, 5);
        assert_eq!(series.len(), 2);
        assert!(series.values.iter().all(|p| p.value.is_none()));
    }
}
