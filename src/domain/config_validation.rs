//! Configuration reading and validation.
//!
//! Each section reader returns typed parameters, falling back to defaults for
//! missing keys and rejecting present-but-invalid values with `ConfigInvalid`.

use std::time::Duration;

use crate::domain::aggregator::SignalAggregator;
use crate::domain::cycle::CycleConfig;
use crate::domain::error::SigtraderError;
use crate::domain::indicator::SqueezeParams;
use crate::domain::sizing::OrderSizing;
use crate::domain::strategy::{MacdParams, SqueezeMomentumParams};
use crate::logging::{LogConfig, LogFormat, parse_filter};
use crate::ports::config_port::ConfigPort;

fn read_usize(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
) -> Result<usize, SigtraderError> {
    match config.get_string(section, key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
            SigtraderError::invalid_config(
                section,
                key,
                format!("'{raw}' is not a non-negative integer"),
            )
        }),
    }
}

fn read_f64(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, SigtraderError> {
    match config.get_string(section, key) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(SigtraderError::invalid_config(
                section,
                key,
                format!("'{raw}' is not a number"),
            )),
        },
    }
}

fn positive_usize(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
) -> Result<usize, SigtraderError> {
    let value = read_usize(config, section, key, default)?;
    if value == 0 {
        return Err(SigtraderError::invalid_config(
            section,
            key,
            format!("{key} must be at least 1"),
        ));
    }
    Ok(value)
}

fn positive_f64(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, SigtraderError> {
    let value = read_f64(config, section, key, default)?;
    if value <= 0.0 {
        return Err(SigtraderError::invalid_config(
            section,
            key,
            format!("{key} must be positive"),
        ));
    }
    Ok(value)
}

fn percent(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, SigtraderError> {
    let value = read_f64(config, section, key, default)?;
    if !(0.0..=100.0).contains(&value) {
        return Err(SigtraderError::invalid_config(
            section,
            key,
            format!("{key} must be between 0 and 100"),
        ));
    }
    Ok(value)
}

pub fn squeeze_params(config: &dyn ConfigPort) -> Result<SqueezeMomentumParams, SigtraderError> {
    let s = "squeeze";
    let d = SqueezeMomentumParams::default();
    Ok(SqueezeMomentumParams {
        squeeze: SqueezeParams {
            bb_length: positive_usize(config, s, "bb_length", d.squeeze.bb_length)?,
            bb_mult: positive_f64(config, s, "bb_mult", d.squeeze.bb_mult)?,
            kc_length: positive_usize(config, s, "kc_length", d.squeeze.kc_length)?,
            kc_mult: positive_f64(config, s, "kc_mult", d.squeeze.kc_mult)?,
            mom_length: positive_usize(config, s, "mom_length", d.squeeze.mom_length)?,
        },
        min_momentum: read_f64(config, s, "min_momentum", d.min_momentum)?,
        volume_threshold: positive_f64(config, s, "volume_threshold", d.volume_threshold)?,
        volume_window: positive_usize(config, s, "volume_window", d.volume_window)?,
        profile_bins: positive_usize(config, s, "profile_bins", d.profile_bins)?,
        confidence_scale: positive_f64(config, s, "confidence_scale", d.confidence_scale)?,
    })
}

pub fn macd_params(config: &dyn ConfigPort) -> Result<MacdParams, SigtraderError> {
    let s = "macd";
    let d = MacdParams::default();
    let params = MacdParams {
        fast: positive_usize(config, s, "fast", d.fast)?,
        slow: positive_usize(config, s, "slow", d.slow)?,
        signal: positive_usize(config, s, "signal", d.signal)?,
        rsi_period: positive_usize(config, s, "rsi_period", d.rsi_period)?,
        min_histogram: positive_f64(config, s, "min_histogram", d.min_histogram)?,
        rsi_threshold: percent(config, s, "rsi_threshold", d.rsi_threshold)?,
        profile_bins: positive_usize(config, s, "profile_bins", d.profile_bins)?,
        volume_window: positive_usize(config, s, "volume_window", d.volume_window)?,
        confidence_scale: positive_f64(config, s, "confidence_scale", d.confidence_scale)?,
    };
    if params.fast >= params.slow {
        return Err(SigtraderError::invalid_config(
            s,
            "fast",
            "fast period must be shorter than slow period",
        ));
    }
    Ok(params)
}

pub fn aggregator(config: &dyn ConfigPort) -> Result<SignalAggregator, SigtraderError> {
    let default = SignalAggregator::default().min_confidence();
    let min_confidence = percent(config, "aggregator", "min_confidence", default)?;
    Ok(SignalAggregator::new(min_confidence))
}

pub fn cycle_config(config: &dyn ConfigPort) -> Result<CycleConfig, SigtraderError> {
    let s = "cycle";
    let d = CycleConfig::default();
    let spacing_ms = read_usize(config, s, "spacing_ms", d.min_call_spacing.as_millis() as usize)?;
    let bar_count = positive_usize(config, s, "bar_count", d.bar_count)?;
    if bar_count < 2 {
        return Err(SigtraderError::invalid_config(
            s,
            "bar_count",
            "bar_count must be at least 2",
        ));
    }
    Ok(CycleConfig {
        max_instruments: positive_usize(config, s, "max_instruments", d.max_instruments)?,
        concurrency: positive_usize(config, s, "concurrency", d.concurrency)?,
        min_call_spacing: Duration::from_millis(spacing_ms as u64),
        bar_count,
    })
}

pub fn order_sizing(config: &dyn ConfigPort) -> Result<OrderSizing, SigtraderError> {
    let s = "sizing";
    let d = OrderSizing::default();
    let allocation_pct = positive_f64(config, s, "allocation_pct", d.allocation_pct)?;
    if allocation_pct > 1.0 {
        return Err(SigtraderError::invalid_config(
            s,
            "allocation_pct",
            "allocation_pct must be a fraction no greater than 1",
        ));
    }
    Ok(OrderSizing {
        max_position_value: positive_f64(config, s, "max_position_value", d.max_position_value)?,
        allocation_pct,
        full_exit_confidence: percent(config, s, "full_exit_confidence", d.full_exit_confidence)?,
    })
}

pub fn log_config(config: &dyn ConfigPort) -> Result<LogConfig, SigtraderError> {
    let d = LogConfig::default();
    let level = config.get_string("logging", "level").unwrap_or(d.level);
    parse_filter(&level)?;
    let format = match config.get_string("logging", "format") {
        Some(raw) => raw.parse::<LogFormat>()?,
        None => d.format,
    };
    Ok(LogConfig { level, format })
}

/// Check every section, stopping at the first invalid value.
pub fn validate_config(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    squeeze_params(config)?;
    macd_params(config)?;
    aggregator(config)?;
    cycle_config(config)?;
    order_sizing(config)?;
    log_config(config)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    fn assert_invalid(result: Result<impl std::fmt::Debug, SigtraderError>, expected_key: &str) {
        match result {
            Err(SigtraderError::ConfigInvalid { key, .. }) => assert_eq!(key, expected_key),
            other => panic!("expected ConfigInvalid for {expected_key}, got {other:?}"),
        }
    }

    #[test]
    fn empty_config_uses_defaults() {
        let c = config("");
        assert_eq!(squeeze_params(&c).unwrap(), SqueezeMomentumParams::default());
        assert_eq!(macd_params(&c).unwrap(), MacdParams::default());
        assert_eq!(cycle_config(&c).unwrap(), CycleConfig::default());
        assert_eq!(order_sizing(&c).unwrap(), OrderSizing::default());
        assert_eq!(log_config(&c).unwrap(), LogConfig::default());
        assert_eq!(aggregator(&c).unwrap().min_confidence(), 30.0);
        assert!(validate_config(&c).is_ok());
    }

    #[test]
    fn reads_overrides() {
        let c = config(
            "[squeeze]\nmom_length = 8\nconfidence_scale = 25\n\
             [macd]\nmin_histogram = 0.5\n\
             [cycle]\nspacing_ms = 0\nconcurrency = 2\n\
             [aggregator]\nmin_confidence = 45\n\
             [logging]\nformat = json\nlevel = debug\n",
        );
        let squeeze = squeeze_params(&c).unwrap();
        assert_eq!(squeeze.squeeze.mom_length, 8);
        assert_eq!(squeeze.confidence_scale, 25.0);
        assert_eq!(macd_params(&c).unwrap().min_histogram, 0.5);
        let cycle = cycle_config(&c).unwrap();
        assert_eq!(cycle.min_call_spacing, Duration::ZERO);
        assert_eq!(cycle.concurrency, 2);
        assert_eq!(aggregator(&c).unwrap().min_confidence(), 45.0);
        assert_eq!(log_config(&c).unwrap().format, LogFormat::Json);
    }

    #[test]
    fn rejects_zero_length() {
        assert_invalid(squeeze_params(&config("[squeeze]\nbb_length = 0\n")), "bb_length");
    }

    #[test]
    fn rejects_non_numeric() {
        assert_invalid(squeeze_params(&config("[squeeze]\nkc_mult = wide\n")), "kc_mult");
        assert_invalid(cycle_config(&config("[cycle]\nconcurrency = -1\n")), "concurrency");
    }

    #[test]
    fn rejects_fast_not_below_slow() {
        assert_invalid(macd_params(&config("[macd]\nfast = 26\nslow = 26\n")), "fast");
    }

    #[test]
    fn rejects_out_of_range_percentages() {
        assert_invalid(aggregator(&config("[aggregator]\nmin_confidence = 120\n")), "min_confidence");
        assert_invalid(macd_params(&config("[macd]\nrsi_threshold = -5\n")), "rsi_threshold");
    }

    #[test]
    fn rejects_allocation_above_one() {
        assert_invalid(order_sizing(&config("[sizing]\nallocation_pct = 5\n")), "allocation_pct");
    }

    #[test]
    fn rejects_single_bar_fetch() {
        assert_invalid(cycle_config(&config("[cycle]\nbar_count = 1\n")), "bar_count");
    }

    #[test]
    fn rejects_bad_logging() {
        assert_invalid(log_config(&config("[logging]\nformat = xml\n")), "format");
        assert_invalid(log_config(&config("[logging]\nlevel = sigtrader=loud\n")), "level");
    }

    #[test]
    fn validate_reports_first_error() {
        let err = validate_config(&config("[sizing]\nmax_position_value = 0\n")).unwrap_err();
        assert!(err.to_string().contains("max_position_value"));
    }
}
