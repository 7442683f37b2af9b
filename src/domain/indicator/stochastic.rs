//! Stochastic Oscillator.
//!
//! %K = 100 × (close − lowest low(k)) / (highest high(k) − lowest low(k))
//! %D = SMA(%K, d)
//!
//! %K is undefined when the k-bar range is zero; %D is undefined whenever
//! its window holds an undefined %K.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::{checked_div, defined, max, min, rolling, sma_values};
use crate::domain::ohlcv::BarSeries;

#[derive(Debug, Clone, PartialEq)]
pub struct StochasticSeries {
    pub k: IndicatorSeries,
    pub d: IndicatorSeries,
}

pub fn calculate_stochastic(bars: &BarSeries, k_period: usize, d_period: usize) -> StochasticSeries {
    let highest = rolling(&defined(&bars.highs()), k_period, max);
    let lowest = rolling(&defined(&bars.lows()), k_period, min);

    let k: Vec<Option<f64>> = bars
        .bars()
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let (hh, ll) = (highest[i]?, lowest[i]?);
            checked_div(bar.close - ll, hh - ll).map(|ratio| 100.0 * ratio)
        })
        .collect();
    let d = sma_values(&k, d_period);

    let indicator_type = IndicatorType::Stochastic { k_period, d_period };
    StochasticSeries {
        k: IndicatorSeries::from_values(indicator_type.clone(), bars, k),
        d: IndicatorSeries::from_values(indicator_type, bars, d),
    }
}
