//! ADX (Average Directional Index) with +DI / −DI.
//!
//! +DM = high − prevHigh, −DM = prevLow − low; each is kept only when it is
//! positive and larger than the other, otherwise 0. TR as in ATR. The first
//! bar has no previous bar, so all three are undefined there.
//!
//! +DI = 100 × SMA(+DM, n) / SMA(TR, n), −DI likewise.
//! DX = 100 × |+DI − −DI| / (+DI + −DI); ADX = SMA(DX, n).
//! Warmup: DI from index n, ADX from index 2n − 1.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::{checked_div, sma_values, zip_with};
use crate::domain::ohlcv::BarSeries;

#[derive(Debug, Clone, PartialEq)]
pub struct AdxSeries {
    pub adx: IndicatorSeries,
    pub plus_di: IndicatorSeries,
    pub minus_di: IndicatorSeries,
}

fn directional_movement(bars: &BarSeries) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    let bars = bars.bars();
    let mut plus = vec![None; bars.len()];
    let mut minus = vec![None; bars.len()];
    for (i, pair) in bars.windows(2).enumerate() {
        let up = pair[1].high - pair[0].high;
        let down = pair[0].low - pair[1].low;
        plus[i + 1] = Some(if up > down && up > 0.0 { up } else { 0.0 });
        minus[i + 1] = Some(if down > up && down > 0.0 { down } else { 0.0 });
    }
    (plus, minus)
}

pub fn calculate_adx(bars: &BarSeries, period: usize) -> AdxSeries {
    let (plus_dm, minus_dm) = directional_movement(bars);
    let true_range: Vec<Option<f64>> = bars
        .true_ranges()
        .into_iter()
        .enumerate()
        .map(|(i, tr)| (i > 0).then_some(tr))
        .collect();

    let tr_smooth = sma_values(&true_range, period);
    let plus_di = zip_with(&sma_values(&plus_dm, period), &tr_smooth, |dm, tr| {
        checked_div(dm, tr).map(|r| 100.0 * r)
    });
    let minus_di = zip_with(&sma_values(&minus_dm, period), &tr_smooth, |dm, tr| {
        checked_div(dm, tr).map(|r| 100.0 * r)
    });
    let dx = zip_with(&plus_di, &minus_di, |p, m| {
        checked_div((p - m).abs(), p + m).map(|r| 100.0 * r)
    });
    let adx = sma_values(&dx, period);

    let indicator_type = IndicatorType::Adx(period);
    AdxSeries {
        adx: IndicatorSeries::from_values(indicator_type.clone(), bars, adx),
        plus_di: IndicatorSeries::from_values(indicator_type.clone(), bars, plus_di),
        minus_di: IndicatorSeries::from_values(indicator_type, bars, minus_di),
    }
}
