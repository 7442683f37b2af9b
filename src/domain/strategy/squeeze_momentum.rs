//! Squeeze momentum breakout strategy.
//!
//! Buys when a Bollinger/Keltner squeeze releases (On at the previous bar,
//! Off at the current one) with strong, rising momentum on above-average
//! volume. Sells a held position when momentum turns from positive to
//! non-positive.

use crate::domain::error::SigtraderError;
use crate::domain::indicator::{
    IndicatorEngine, SqueezeParams, SqueezeSeries, SqueezeState, VolumeProfile,
};
use crate::domain::ohlcv::BarSeries;
use crate::domain::position::PositionBook;
use crate::domain::signal::{Action, Signal, SignalMetrics, SignalReason};
use crate::domain::strategy::{Strategy, require_bars};

pub const STRATEGY_ID: &str = "squeeze_momentum";

#[derive(Debug, Clone, PartialEq)]
pub struct SqueezeMomentumParams {
    pub squeeze: SqueezeParams,
    pub min_momentum: f64,
    /// Current volume must exceed the average times this factor.
    pub volume_threshold: f64,
    pub volume_window: usize,
    pub profile_bins: usize,
    /// |momentum| × scale gives the raw confidence.
    pub confidence_scale: f64,
}

impl Default for SqueezeMomentumParams {
    fn default() -> Self {
        Self {
            squeeze: SqueezeParams::default(),
            min_momentum: 0.5,
            volume_threshold: 1.5,
            volume_window: 20,
            profile_bins: 20,
            confidence_scale: 10.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SqueezeBundle {
    pub instrument: String,
    pub squeeze: SqueezeSeries,
    pub profile: VolumeProfile,
    pub current_price: f64,
    pub current_volume: f64,
}

#[derive(Debug, Clone, Default)]
pub struct SqueezeMomentumStrategy {
    engine: IndicatorEngine,
    params: SqueezeMomentumParams,
}

impl SqueezeMomentumStrategy {
    pub fn new(params: SqueezeMomentumParams) -> Self {
        Self {
            engine: IndicatorEngine::new(),
            params,
        }
    }

    pub fn params(&self) -> &SqueezeMomentumParams {
        &self.params
    }

    fn signal(
        &self,
        bundle: &SqueezeBundle,
        action: Action,
        reason: SignalReason,
        momentum: f64,
        previous: f64,
    ) -> Signal {
        Signal::new(
            bundle.instrument.as_str(),
            STRATEGY_ID,
            action,
            reason,
            bundle.current_price,
            momentum.abs() * self.params.confidence_scale,
            SignalMetrics::Squeeze {
                momentum,
                previous_momentum: previous,
            },
        )
    }

    fn is_release(&self, bundle: &SqueezeBundle, momentum: f64, previous: f64) -> bool {
        let released = bundle.squeeze.previous_state() == Some(SqueezeState::On)
            && bundle.squeeze.current_state() == Some(SqueezeState::Off);
        let volume_surge = bundle
            .profile
            .average_volume
            .current()
            .is_some_and(|avg| bundle.current_volume > avg * self.params.volume_threshold);

        released && momentum > self.params.min_momentum && momentum > previous && volume_surge
    }
}

impl Strategy for SqueezeMomentumStrategy {
    type Bundle = SqueezeBundle;

    fn id(&self) -> &str {
        STRATEGY_ID
    }

    fn analyze(&self, bars: &BarSeries) -> Result<SqueezeBundle, SigtraderError> {
        require_bars(bars)?;
        let last = bars.last();
        Ok(SqueezeBundle {
            instrument: bars.instrument().to_string(),
            squeeze: self.engine.squeeze_momentum(bars, &self.params.squeeze),
            profile: self.engine.volume_profile(
                bars,
                self.params.profile_bins,
                self.params.volume_window,
            ),
            current_price: last.close,
            current_volume: last.volume as f64,
        })
    }

    fn generate_signals(&self, bundle: &SqueezeBundle, book: &PositionBook) -> Vec<Signal> {
        let (Some(momentum), Some(previous)) = (
            bundle.squeeze.momentum.current(),
            bundle.squeeze.momentum.previous(),
        ) else {
            return Vec::new();
        };

        if self.is_release(bundle, momentum, previous) {
            vec![self.signal(bundle, Action::Buy, SignalReason::SqueezeRelease, momentum, previous)]
        } else if book.has_position(&bundle.instrument) && previous > 0.0 && momentum <= 0.0 {
            vec![self.signal(bundle, Action::Sell, SignalReason::MomentumReversal, momentum, previous)]
        } else {
            Vec::new()
        }
    }
}
