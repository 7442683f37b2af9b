//! Latest indicator readings for a single instrument.

use crate::domain::indicator::{IndicatorEngine, IndicatorSeries, SqueezeState};
use crate::domain::ohlcv::BarSeries;
use crate::domain::strategy::{MacdParams, SqueezeMomentumParams};

/// Lookback used for the indicators no strategy configures.
pub const GENERAL_PERIOD: usize = 14;
/// Lookback for the moving averages and deviation bands.
pub const AVERAGE_PERIOD: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorReading {
    pub name: String,
    /// `None` while the indicator is still warming up.
    pub value: Option<f64>,
}

impl IndicatorReading {
    fn new(name: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    fn latest(series: &IndicatorSeries) -> Self {
        Self::new(series.indicator_type.to_string(), series.current())
    }

    fn band(series: &IndicatorSeries, part: &str) -> Self {
        Self::new(
            format!("{}.{}", series.indicator_type, part),
            series.current(),
        )
    }
}

/// Evaluate every indicator over `bars` and report the value at the last bar.
pub fn latest_readings(
    bars: &BarSeries,
    squeeze: &SqueezeMomentumParams,
    macd: &MacdParams,
) -> Vec<IndicatorReading> {
    let engine = IndicatorEngine::new();
    let mut readings = vec![
        IndicatorReading::latest(&engine.sma(bars, AVERAGE_PERIOD)),
        IndicatorReading::latest(&engine.ema(bars, AVERAGE_PERIOD)),
        IndicatorReading::latest(&engine.stddev(bars, AVERAGE_PERIOD)),
        IndicatorReading::latest(&engine.atr(bars, GENERAL_PERIOD)),
    ];

    let bb = engine.bollinger(bars, squeeze.squeeze.bb_length, squeeze.squeeze.bb_mult);
    let kc = engine.keltner(bars, squeeze.squeeze.kc_length, squeeze.squeeze.kc_mult);
    for (series, part) in [
        (&bb.upper, "upper"),
        (&bb.middle, "middle"),
        (&bb.lower, "lower"),
        (&kc.upper, "upper"),
        (&kc.middle, "middle"),
        (&kc.lower, "lower"),
    ] {
        readings.push(IndicatorReading::band(series, part));
    }

    let sqz = engine.squeeze_momentum(bars, &squeeze.squeeze);
    readings.push(IndicatorReading::latest(&sqz.momentum));
    let state = sqz.current_state().map(|s| match s {
        SqueezeState::On => 1.0,
        SqueezeState::Off => -1.0,
        SqueezeState::NoSqueeze => 0.0,
    });
    readings.push(IndicatorReading::new("SQUEEZE_STATE", state));

    let m = engine.macd(bars, macd.fast, macd.slow, macd.signal);
    for (series, part) in [(&m.line, "line"), (&m.signal, "signal"), (&m.histogram, "histogram")] {
        readings.push(IndicatorReading::band(series, part));
    }
    readings.push(IndicatorReading::latest(&engine.rsi(bars, macd.rsi_period)));

    let stoch = engine.stochastic(bars, GENERAL_PERIOD, 3);
    readings.push(IndicatorReading::band(&stoch.k, "k"));
    readings.push(IndicatorReading::band(&stoch.d, "d"));
    readings.push(IndicatorReading::latest(&engine.williams_r(bars, GENERAL_PERIOD)));
    readings.push(IndicatorReading::latest(&engine.cci(bars, AVERAGE_PERIOD)));
    readings.push(IndicatorReading::latest(&engine.obv(bars)));

    let adx = engine.adx(bars, GENERAL_PERIOD);
    readings.push(IndicatorReading::band(&adx.adx, "adx"));
    readings.push(IndicatorReading::band(&adx.plus_di, "plus_di"));
    readings.push(IndicatorReading::band(&adx.minus_di, "minus_di"));

    let profile = engine.volume_profile(bars, squeeze.profile_bins, squeeze.volume_window);
    readings.push(IndicatorReading::new(
        "VOLUME_PROFILE.poc",
        Some(profile.point_of_control),
    ));
    readings.push(IndicatorReading::latest(&profile.average_volume));

    readings
}
