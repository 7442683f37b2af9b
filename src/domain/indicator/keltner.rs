//! Keltner Channel.
//!
//! Middle = SMA(hl2, n), band = ATR(n) × multiplier, where ATR is the simple
//! average of true range. Warmup: first (n-1) bars are undefined.

use crate::domain::indicator::{IndicatorSeries, IndicatorType, calculate_atr, mult_x100};
use crate::domain::indicator_helpers::{defined, sma_values, zip_with};
use crate::domain::ohlcv::BarSeries;

#[derive(Debug, Clone, PartialEq)]
pub struct KeltnerChannel {
    pub upper: IndicatorSeries,
    pub middle: IndicatorSeries,
    pub lower: IndicatorSeries,
}

pub fn calculate_keltner(bars: &BarSeries, length: usize, mult: f64) -> KeltnerChannel {
    let middle = sma_values(&defined(&bars.hl2()), length);
    let atr = calculate_atr(bars, length).raw();

    let upper = zip_with(&middle, &atr, |m, a| Some(m + a * mult));
    let lower = zip_with(&middle, &atr, |m, a| Some(m - a * mult));

    let indicator_type = IndicatorType::Keltner {
        length,
        atr_mult_x100: mult_x100(mult),
    };
    KeltnerChannel {
        upper: IndicatorSeries::from_values(indicator_type.clone(), bars, upper),
        middle: IndicatorSeries::from_values(indicator_type.clone(), bars, middle),
        lower: IndicatorSeries::from_values(indicator_type, bars, lower),
    }
}
