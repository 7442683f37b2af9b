//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! Where StdDev is population standard deviation (divides by N, not N-1).
//!
//! Default parameters: period=20, multiplier=2.0
//! Warmup: first (period-1) bars are undefined.

use crate::domain::indicator::{IndicatorSeries, IndicatorType, mult_x100};
use crate::domain::indicator_helpers::{defined, population_stddev, rolling, sma_values, zip_with};
use crate::domain::ohlcv::BarSeries;

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_MULT: f64 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub upper: IndicatorSeries,
    pub middle: IndicatorSeries,
    pub lower: IndicatorSeries,
}

pub fn calculate_bollinger(bars: &BarSeries, period: usize, mult: f64) -> BollingerBands {
    let closes = defined(&bars.closes());
    let middle = sma_values(&closes, period);
    let stddev = rolling(&closes, period, population_stddev);

    let upper = zip_with(&middle, &stddev, |m, sd| Some(m + mult * sd));
    let lower = zip_with(&middle, &stddev, |m, sd| Some(m - mult * sd));

    let indicator_type = IndicatorType::Bollinger {
        period,
        stddev_mult_x100: mult_x100(mult),
    };
    BollingerBands {
        upper: IndicatorSeries::from_values(indicator_type.clone(), bars, upper),
        middle: IndicatorSeries::from_values(indicator_type.clone(), bars, middle),
        lower: IndicatorSeries::from_values(indicator_type, bars, lower),
    }
}
