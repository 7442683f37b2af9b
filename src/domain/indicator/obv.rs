//! OBV (On-Balance Volume) indicator.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::BarSeries;

/// Calculate OBV (On-Balance Volume) indicator.
///
/// OBV[0] = volume[0]
/// If close[i] > close[i-1]: OBV[i] = OBV[i-1] + volume[i]
/// If close[i] < close[i-1]: OBV[i] = OBV[i-1] - volume[i]
/// If close[i] == close[i-1]: OBV[i] = OBV[i-1]
///
/// No warmup period; all bars are defined.
pub fn calculate_obv(bars: &BarSeries) -> IndicatorSeries {
    let values = bars
        .bars()
        .iter()
        .scan(None, |state: &mut Option<(f64, f64)>, bar| {
            let volume = bar.volume as f64;
            let obv = match *state {
                None => volume,
                Some((obv, prev_close)) if bar.close > prev_close => obv + volume,
                Some((obv, prev_close)) if bar.close < prev_close => obv - volume,
                Some((obv, _)) => obv,
            };
            *state = Some((obv, bar.close));
            Some(Some(obv))
        })
        .collect();

    IndicatorSeries::from_values(IndicatorType::Obv, bars, values)
}
