//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seeded with the first close, then EMA[i] = EMA[i-1] + k·(C[i] − EMA[i-1]).
//! No warmup beyond the first bar: every point is defined.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::ema_values;
use crate::domain::ohlcv::BarSeries;

pub fn calculate_ema(bars: &BarSeries, period: usize) -> IndicatorSeries {
    let values = if period == 0 {
        vec![None; bars.len()]
    } else {
        ema_values(&bars.closes(), period).into_iter().map(Some).collect()
    };
    IndicatorSeries::from_values(IndicatorType::Ema(period), bars, values)
}
