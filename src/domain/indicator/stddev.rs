//! Standard Deviation indicator.
//!
//! Population standard deviation over n closing prices.
//! STDDEV(n)[i] = sqrt(sum((C[i-j] - SMA(n)[i])^2 for j in 0..n-1) / n)
//! Warmup: first (n-1) bars are undefined.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::{defined, population_stddev, rolling};
use crate::domain::ohlcv::BarSeries;

pub fn calculate_stddev(bars: &BarSeries, period: usize) -> IndicatorSeries {
    let values = rolling(&defined(&bars.closes()), period, population_stddev);
    IndicatorSeries::from_values(IndicatorType::Stddev(period), bars, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_bars::flat_bars;
    use approx::assert_abs_diff_eq;

    #[test]
    fn stddev_warmup() {
        let bars = flat_bars(&[10.0, 20.0, 30.0, 40.0]);
        let series = calculate_stddev(&bars, 3);
        assert_eq!(series.value_at(1), None);
        assert!(series.value_at(2).is_some());
    }

    #[test]
    fn stddev_constant_is_zero() {
        let bars = flat_bars(&[5.0; 4]);
        let series = calculate_stddev(&bars, 4);
        assert_abs_diff_eq!(series.value_at(3).unwrap(), 0.0);
    }

    #[test]
    fn stddev_known_values() {
        // 2, 4, 4, 4, 5, 5, 7, 9 → population σ = 2
        let bars = flat_bars(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        let series = calculate_stddev(&bars, 8);
        assert_abs_diff_eq!(series.value_at(7).unwrap(), 2.0, epsilon = 1e-12);
    }
}
