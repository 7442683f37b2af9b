//! Williams %R.
//!
//! %R = −100 × (highest high(n) − close) / (highest high(n) − lowest low(n)).
//! Undefined during warmup and when the n-bar range is zero.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::{checked_div, defined, max, min, rolling};
use crate::domain::ohlcv::BarSeries;

pub fn calculate_williams_r(bars: &BarSeries, period: usize) -> IndicatorSeries {
    let highest = rolling(&defined(&bars.highs()), period, max);
    let lowest = rolling(&defined(&bars.lows()), period, min);

    let values = bars
        .bars()
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let (hh, ll) = (highest[i]?, lowest[i]?);
            checked_div(hh - bar.close, hh - ll).map(|ratio| -100.0 * ratio)
        })
        .collect();

    IndicatorSeries::from_values(IndicatorType::WilliamsR(period), bars, values)
}
