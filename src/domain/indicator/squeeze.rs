//! Squeeze Momentum indicator.
//!
//! Compares Bollinger Bands with a Keltner Channel to classify each bar:
//! - On: both Bollinger bands strictly inside the Keltner channel
//! - Off: either Bollinger band strictly outside the Keltner channel
//! - NoSqueeze: neither (a band touches its Keltner counterpart)
//!
//! Momentum is the least-squares slope of the oscillator
//! `close − ((highest(high, n) + lowest(low, n))/2 + SMA(close, n))/2`
//! over its trailing n values. Bars before index n report a neutral 0.

use std::collections::VecDeque;

use crate::domain::indicator::{
    BollingerBands, IndicatorSeries, IndicatorType, KeltnerChannel, calculate_bollinger,
    calculate_keltner,
};
use crate::domain::indicator_helpers::{defined, max, min, rolling, slope, sma_values};
use crate::domain::ohlcv::BarSeries;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqueezeState {
    On,
    Off,
    NoSqueeze,
}

impl SqueezeState {
    pub fn classify(bb_upper: f64, bb_lower: f64, kc_upper: f64, kc_lower: f64) -> Self {
        if bb_lower > kc_lower && bb_upper < kc_upper {
            SqueezeState::On
        } else if bb_lower < kc_lower || bb_upper > kc_upper {
            SqueezeState::Off
        } else {
            SqueezeState::NoSqueeze
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqueezeParams {
    pub bb_length: usize,
    pub bb_mult: f64,
    pub kc_length: usize,
    pub kc_mult: f64,
    pub mom_length: usize,
}

impl Default for SqueezeParams {
    fn default() -> Self {
        Self {
            bb_length: 20,
            bb_mult: 2.0,
            kc_length: 20,
            kc_mult: 1.5,
            mom_length: 12,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqueezeSeries {
    pub bollinger: BollingerBands,
    pub keltner: KeltnerChannel,
    pub states: Vec<Option<SqueezeState>>,
    pub oscillator: IndicatorSeries,
    pub momentum: IndicatorSeries,
}

impl SqueezeSeries {
    pub fn current_state(&self) -> Option<SqueezeState> {
        self.states.last().copied().flatten()
    }

    pub fn previous_state(&self) -> Option<SqueezeState> {
        self.states
            .len()
            .checked_sub(2)
            .and_then(|i| self.states[i])
    }
}

/// Trailing oscillator values fed to the regression.
struct FitWindow {
    points: VecDeque<Option<f64>>,
    capacity: usize,
}

impl FitWindow {
    fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    fn push(mut self, value: Option<f64>) -> Self {
        self.points.push_back(value);
        if self.points.len() > self.capacity {
            self.points.pop_front();
        }
        self
    }

    fn slope(&self) -> Option<f64> {
        if self.capacity < 2 {
            return Some(0.0);
        }
        let window: Vec<f64> = self.points.iter().copied().collect::<Option<_>>()?;
        Some(slope(&window))
    }
}

fn regression_momentum(oscillator: &[Option<f64>], length: usize) -> Vec<Option<f64>> {
    let (_, momentum) = oscillator.iter().enumerate().fold(
        (FitWindow::new(length), Vec::with_capacity(oscillator.len())),
        |(window, mut out), (i, &value)| {
            let window = window.push(value);
            out.push(if i < length { Some(0.0) } else { window.slope() });
            (window, out)
        },
    );
    momentum
}

fn oscillator(bars: &BarSeries, length: usize) -> Vec<Option<f64>> {
    let highest = rolling(&defined(&bars.highs()), length, max);
    let lowest = rolling(&defined(&bars.lows()), length, min);
    let mean_close = sma_values(&defined(&bars.closes()), length);

    bars.bars()
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let m1 = (highest[i]? + lowest[i]?) / 2.0;
            let m2 = (m1 + mean_close[i]?) / 2.0;
            Some(bar.close - m2)
        })
        .collect()
}

pub fn calculate_squeeze_momentum(bars: &BarSeries, params: &SqueezeParams) -> SqueezeSeries {
    let bollinger = calculate_bollinger(bars, params.bb_length, params.bb_mult);
    let keltner = calculate_keltner(bars, params.kc_length, params.kc_mult);

    let states = (0..bars.len())
        .map(|i| {
            Some(SqueezeState::classify(
                bollinger.upper.value_at(i)?,
                bollinger.lower.value_at(i)?,
                keltner.upper.value_at(i)?,
                keltner.lower.value_at(i)?,
            ))
        })
        .collect();

    let osc = oscillator(bars, params.mom_length);
    let momentum = regression_momentum(&osc, params.mom_length);

    let indicator_type = IndicatorType::SqueezeMomentum {
        length: params.mom_length,
    };
    SqueezeSeries {
        bollinger,
        keltner,
        states,
        oscillator: IndicatorSeries::from_values(indicator_type.clone(), bars, osc),
        momentum: IndicatorSeries::from_values(indicator_type, bars, momentum),
    }
}
