//! Technical indicator implementations.
//!
//! This module provides types for representing indicator values and series:
//! - `IndicatorPoint`: A single point in an indicator time series
//! - `IndicatorType`: Enum for indicator identity + parameters (serves as HashMap key)
//! - `IndicatorSeries`: A time series of indicator values aligned with its bars
//! - `IndicatorEngine`: Stateless facade over the per-indicator functions
//!
//! Points inside an indicator's warm-up window carry `None`. No indicator ever
//! reports zero in place of a value it could not compute, except where a
//! neutral default is part of the indicator's definition (squeeze momentum
//! before its first full window, RSI with zero average loss).

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod cci;
pub mod ema;
pub mod keltner;
pub mod macd;
pub mod obv;
pub mod rsi;
pub mod sma;
pub mod squeeze;
pub mod stddev;
pub mod stochastic;
pub mod volume_profile;
pub mod williams_r;

use chrono::NaiveDate;
use std::fmt;

use crate::domain::ohlcv::BarSeries;

pub use adx::{AdxSeries, calculate_adx};
pub use atr::calculate_atr;
pub use bollinger::{BollingerBands, calculate_bollinger};
pub use cci::calculate_cci;
pub use ema::calculate_ema;
pub use keltner::{KeltnerChannel, calculate_keltner};
pub use macd::{MacdSeries, calculate_macd};
pub use obv::calculate_obv;
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;
pub use squeeze::{SqueezeParams, SqueezeSeries, SqueezeState, calculate_squeeze_momentum};
pub use stddev::calculate_stddev;
pub use stochastic::{StochasticSeries, calculate_stochastic};
pub use volume_profile::{PriceBin, VolumeProfile, calculate_volume_profile};
pub use williams_r::calculate_williams_r;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Atr(usize),
    Stddev(usize),
    Rsi(usize),
    Cci(usize),
    WilliamsR(usize),
    Adx(usize),
    Obv,
    VolumeSma(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    Stochastic {
        k_period: usize,
        d_period: usize,
    },
    Bollinger {
        period: usize,
        stddev_mult_x100: u32,
    },
    Keltner {
        length: usize,
        atr_mult_x100: u32,
    },
    SqueezeMomentum {
        length: usize,
    },
}

/// Multipliers are stored as hundredths so the type stays `Eq + Hash`.
pub(crate) fn mult_x100(mult: f64) -> u32 {
    (mult * 100.0).round().max(0.0) as u32
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Atr(period) => write!(f, "ATR({})", period),
            IndicatorType::Stddev(period) => write!(f, "STDDEV({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Cci(period) => write!(f, "CCI({})", period),
            IndicatorType::WilliamsR(period) => write!(f, "WILLIAMS_R({})", period),
            IndicatorType::Adx(period) => write!(f, "ADX({})", period),
            IndicatorType::Obv => write!(f, "OBV"),
            IndicatorType::VolumeSma(period) => write!(f, "VOLUME_SMA({})", period),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
            IndicatorType::Stochastic { k_period, d_period } => {
                write!(f, "STOCHASTIC({},{})", k_period, d_period)
            }
            IndicatorType::Bollinger {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BOLLINGER({},{})", period, mult)
            }
            IndicatorType::Keltner {
                length,
                atr_mult_x100,
            } => {
                let mult = *atr_mult_x100 as f64 / 100.0;
                write!(f, "KELTNER({},{})", length, mult)
            }
            IndicatorType::SqueezeMomentum { length } => write!(f, "SQUEEZE_MOM({})", length),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// Pairs raw values with the dates of `bars`. Both must have the same length.
    pub fn from_values(
        indicator_type: IndicatorType,
        bars: &BarSeries,
        values: Vec<Option<f64>>,
    ) -> Self {
        debug_assert_eq!(bars.len(), values.len());
        let values = bars
            .dates()
            .zip(values)
            .map(|(date, value)| IndicatorPoint { date, value })
            .collect();
        Self {
            indicator_type,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn value_at(&self, index: usize) -> Option<f64> {
        self.values.get(index).and_then(|p| p.value)
    }

    /// Value at the most recent bar.
    pub fn current(&self) -> Option<f64> {
        self.values.last().and_then(|p| p.value)
    }

    /// Value at the bar before the most recent one.
    pub fn previous(&self) -> Option<f64> {
        self.values
            .len()
            .checked_sub(2)
            .and_then(|i| self.value_at(i))
    }

    pub fn raw(&self) -> Vec<Option<f64>> {
        self.values.iter().map(|p| p.value).collect()
    }

    pub fn first_defined(&self) -> Option<usize> {
        self.values.iter().position(|p| p.value.is_some())
    }
}

/// Stateless entry point to every indicator.
///
/// Strategies hold one of these by value; all methods are pure and the type
/// carries no data, so it can be shared freely across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndicatorEngine;

impl IndicatorEngine {
    pub fn new() -> Self {
        IndicatorEngine
    }

    pub fn sma(&self, bars: &BarSeries, period: usize) -> IndicatorSeries {
        calculate_sma(bars, period)
    }

    pub fn ema(&self, bars: &BarSeries, period: usize) -> IndicatorSeries {
        calculate_ema(bars, period)
    }

    pub fn atr(&self, bars: &BarSeries, period: usize) -> IndicatorSeries {
        calculate_atr(bars, period)
    }

    pub fn stddev(&self, bars: &BarSeries, period: usize) -> IndicatorSeries {
        calculate_stddev(bars, period)
    }

    pub fn bollinger(&self, bars: &BarSeries, period: usize, mult: f64) -> BollingerBands {
        calculate_bollinger(bars, period, mult)
    }

    pub fn keltner(&self, bars: &BarSeries, length: usize, mult: f64) -> KeltnerChannel {
        calculate_keltner(bars, length, mult)
    }

    pub fn squeeze_momentum(&self, bars: &BarSeries, params: &SqueezeParams) -> SqueezeSeries {
        calculate_squeeze_momentum(bars, params)
    }

    pub fn macd(&self, bars: &BarSeries, fast: usize, slow: usize, signal: usize) -> MacdSeries {
        calculate_macd(bars, fast, slow, signal)
    }

    pub fn rsi(&self, bars: &BarSeries, period: usize) -> IndicatorSeries {
        calculate_rsi(bars, period)
    }

    pub fn stochastic(&self, bars: &BarSeries, k_period: usize, d_period: usize) -> StochasticSeries {
        calculate_stochastic(bars, k_period, d_period)
    }

    pub fn williams_r(&self, bars: &BarSeries, period: usize) -> IndicatorSeries {
        calculate_williams_r(bars, period)
    }

    pub fn cci(&self, bars: &BarSeries, period: usize) -> IndicatorSeries {
        calculate_cci(bars, period)
    }

    pub fn obv(&self, bars: &BarSeries) -> IndicatorSeries {
        calculate_obv(bars)
    }

    pub fn adx(&self, bars: &BarSeries, period: usize) -> AdxSeries {
        calculate_adx(bars, period)
    }

    pub fn volume_profile(&self, bars: &BarSeries, bins: usize, average_window: usize) -> VolumeProfile {
        calculate_volume_profile(bars, bins, average_window)
    }
}
