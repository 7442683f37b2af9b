//! Commodity Channel Index.
//!
//! TP = (high + low + close) / 3
//! CCI = (TP − SMA(TP, n)) / (0.015 × mean absolute deviation of TP over n)
//! Undefined during warmup and when the mean deviation is zero.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::{checked_div, defined, mean, mean_abs_deviation, rolling};
use crate::domain::ohlcv::BarSeries;

pub const CCI_CONSTANT: f64 = 0.015;

pub fn calculate_cci(bars: &BarSeries, period: usize) -> IndicatorSeries {
    let typical = bars.typical_prices();

    let values = rolling(&defined(&typical), period, |window| {
        let tp = *window.last()?;
        let sma = mean(window)?;
        let mad = mean_abs_deviation(window)?;
        checked_div(tp - sma, CCI_CONSTANT * mad)
    });

    IndicatorSeries::from_values(IndicatorType::Cci(period), bars, values)
}
