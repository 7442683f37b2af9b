//! Volume profile over closing prices.
//!
//! The close range [min, max] is cut into `bins` equal-width buckets and the
//! volume of every bar is added to the bucket holding its close. The point of
//! control is the midpoint of the first bucket with the largest volume.
//!
//! When the profile cannot be built (no bins, zero-width or non-finite price
//! range) the result falls back to the last close as point of control with an
//! empty profile, and records why in `fallback`.
//!
//! The profile also carries the rolling average volume used as the baseline
//! for volume-surge checks.

use tracing::warn;

use crate::domain::error::SigtraderError;
use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::{defined, sma_values};
use crate::domain::ohlcv::BarSeries;

pub const DEFAULT_BINS: usize = 20;
pub const DEFAULT_AVERAGE_WINDOW: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBin {
    pub lower: f64,
    pub upper: f64,
    pub volume: f64,
}

impl PriceBin {
    pub fn midpoint(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VolumeProfile {
    /// Buckets in ascending price order; empty on fallback.
    pub bins: Vec<PriceBin>,
    pub point_of_control: f64,
    /// Why the profile fell back to the last close, if it did.
    pub fallback: Option<String>,
    pub average_volume: IndicatorSeries,
}

impl VolumeProfile {
    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

fn build_bins(bars: &BarSeries, bins: usize) -> Result<Vec<PriceBin>, SigtraderError> {
    if bins == 0 {
        return Err(SigtraderError::DegenerateRange {
            reason: "bin count is zero".into(),
        });
    }
    let closes = bars.closes();
    let low = closes.iter().copied().fold(f64::INFINITY, f64::min);
    let high = closes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = high - low;
    if !range.is_finite() || range <= 0.0 {
        return Err(SigtraderError::DegenerateRange {
            reason: format!("close range [{low}, {high}] has no width"),
        });
    }

    let width = range / bins as f64;
    let mut profile: Vec<PriceBin> = (0..bins)
        .map(|i| PriceBin {
            lower: low + width * i as f64,
            upper: if i + 1 == bins {
                high
            } else {
                low + width * (i + 1) as f64
            },
            volume: 0.0,
        })
        .collect();

    for bar in bars.bars() {
        let index = (((bar.close - low) / width).floor() as usize).min(bins - 1);
        profile[index].volume += bar.volume as f64;
    }
    Ok(profile)
}

fn point_of_control(profile: &[PriceBin]) -> Option<f64> {
    profile
        .iter()
        .fold(None, |best: Option<&PriceBin>, bin| match best {
            Some(b) if b.volume >= bin.volume => Some(b),
            _ => Some(bin),
        })
        .map(PriceBin::midpoint)
}

pub fn calculate_volume_profile(bars: &BarSeries, bins: usize, average_window: usize) -> VolumeProfile {
    let average_volume = IndicatorSeries::from_values(
        IndicatorType::VolumeSma(average_window),
        bars,
        sma_values(&defined(&bars.volumes()), average_window),
    );

    let built = build_bins(bars, bins).and_then(|profile| {
        let poc = point_of_control(&profile).ok_or_else(|| SigtraderError::DegenerateRange {
            reason: "profile has no buckets".into(),
        })?;
        Ok((profile, poc))
    });

    match built {
        Ok((profile, poc)) => VolumeProfile {
            bins: profile,
            point_of_control: poc,
            fallback: None,
            average_volume,
        },
        Err(err) => {
            let last_close = bars.last().close;
            warn!(
                instrument = bars.instrument(),
                error = %err,
                point_of_control = last_close,
                "volume profile fell back to last close"
            );
            VolumeProfile {
                bins: Vec::new(),
                point_of_control: last_close,
                fallback: Some(err.to_string()),
                average_volume,
            }
        }
    }
}
