//! CLI integration tests for command orchestration.
//!
//! Tests cover:
//! - Engine construction from INI files (build_engine)
//! - Exchange and target resolution
//! - Report writing with planned quantities
//! - Validate with real INI files on disk
//! - Analyze, inspect and symbols over CSV directories

mod common;

use clap::Parser;
use common::*;
use sigtrader::adapters::file_config_adapter::FileConfigAdapter;
use sigtrader::cli::{self, Cli, Command};
use sigtrader::domain::cycle::CycleRequest;
use sigtrader::domain::error::SigtraderError;
use sigtrader::domain::sizing::OrderSizing;
use std::io::Write;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const VALID_INI: &str = r#"
[cycle]
exchange = krx
codes = 005930, 000660
spacing_ms = 0
concurrency = 2

[squeeze]
min_momentum = 0.25

[macd]
fast = 12
slow = 26
signal = 9

[aggregator]
min_confidence = 0

[sizing]
max_position_value = 2000000
allocation_pct = 0.1

[logging]
level = warn
"#;

fn config(content: &str) -> FileConfigAdapter {
    FileConfigAdapter::from_string(content).unwrap()
}

mod engine_building {
    use super::*;

    #[test]
    fn builds_both_strategies_in_order() {
        let engine = cli::build_engine(&config(VALID_INI)).unwrap();
        assert_eq!(engine.strategy_ids(), vec!["squeeze_momentum", "macd"]);
        assert!(engine.slots().iter().all(|s| s.is_active()));
        assert_eq!(engine.config().concurrency, 2);
        assert!(engine.config().min_call_spacing.is_zero());
    }

    #[test]
    fn disabled_strategy_is_registered_inactive() {
        let engine = cli::build_engine(&config("[squeeze]\nenabled = false\n")).unwrap();
        let active: Vec<&str> = engine
            .slots()
            .iter()
            .filter(|s| s.is_active())
            .map(|s| s.strategy_id())
            .collect();
        assert_eq!(active, vec!["macd"]);
    }

    #[test]
    fn invalid_parameter_is_config_error() {
        let err = cli::build_engine(&config("[macd]\nfast = 30\nslow = 10\n")).err().unwrap();
        assert!(matches!(err, SigtraderError::ConfigInvalid { ref section, .. } if section == "macd"));
    }
}

mod resolution {
    use super::*;

    #[test]
    fn exchange_override_wins() {
        let c = config(VALID_INI);
        assert_eq!(cli::resolve_exchange(Some("nyse"), Some(&c)), "NYSE");
        assert_eq!(cli::resolve_exchange(None, Some(&c)), "KRX");
        assert_eq!(cli::resolve_exchange(None, None), cli::DEFAULT_EXCHANGE);
    }

    #[test]
    fn codes_override_then_config_then_port() {
        let port = MockBarPort::new()
            .with_bars("035720", flat(5, 1.0))
            .with_bars("051910", flat(5, 1.0));

        let targets = cli::resolve_targets(Some("aapl, msft"), &config(VALID_INI), &port).unwrap();
        assert_eq!(targets, vec!["AAPL", "MSFT"]);

        let targets = cli::resolve_targets(None, &config(VALID_INI), &port).unwrap();
        assert_eq!(targets, vec!["005930", "000660"]);

        let targets = cli::resolve_targets(None, &config(""), &port).unwrap();
        assert_eq!(targets, vec!["035720", "051910"]);
    }

    #[test]
    fn no_targets_anywhere_is_missing_config() {
        let err = cli::resolve_targets(None, &config(""), &MockBarPort::new()).unwrap_err();
        assert!(matches!(err, SigtraderError::ConfigMissing { ref key, .. } if key == "codes"));
    }

    #[test]
    fn empty_code_token_is_rejected() {
        let err = cli::resolve_targets(Some("005930,,000660"), &config(""), &MockBarPort::new());
        assert!(matches!(err, Err(SigtraderError::ConfigInvalid { .. })));
    }
}

mod report_output {
    use super::*;

    #[test]
    fn writes_ranked_signals_with_quantities() {
        let port = MockBarPort::new()
            .with_bars("005930", dip_then_rally(33))
            .with_error("BROKEN", "timeout");
        let c = config(VALID_INI);
        let engine = cli::build_engine(&c).unwrap();
        let request = CycleRequest {
            targets: vec!["005930".into(), "BROKEN".into()],
            trading_open: true,
        };

        let report = cli::run_cycle_blocking(&engine, &request, &port).unwrap();
        let mut out = Vec::new();
        cli::write_report(&engine, &OrderSizing::default(), report, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "instrument,strategy,action,reason,reference_price,confidence,quantity,metrics"
        );
        assert_eq!(lines.len(), 2);
        // 1,000,000 × 0.05 / 74 = 675.6
        assert!(
            lines[1].starts_with("005930,macd,BUY,MACD_GOLDEN_CROSS,74.00,25.0,675,"),
            "{}",
            lines[1]
        );
    }

    #[test]
    fn all_instruments_failing_is_an_error() {
        let port = MockBarPort::new().with_error("BROKEN", "timeout");
        let engine = cli::build_engine(&config(VALID_INI)).unwrap();
        let request = CycleRequest {
            targets: vec!["BROKEN".into()],
            trading_open: true,
        };

        let report = cli::run_cycle_blocking(&engine, &request, &port).unwrap();
        let mut out = Vec::new();
        let err = cli::write_report(&engine, &OrderSizing::default(), report, &mut out).unwrap_err();
        assert!(matches!(err, SigtraderError::UpstreamFailure { .. }));
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
    }

    #[test]
    fn readings_render_blank_for_undefined() {
        use sigtrader::domain::snapshot::IndicatorReading;

        let readings = vec![
            IndicatorReading {
                name: "SMA(20)".into(),
                value: None,
            },
            IndicatorReading {
                name: "RSI(14)".into(),
                value: Some(100.0),
            },
        ];
        let mut out = Vec::new();
        cli::write_readings(&mut out, &readings).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "indicator,value\nSMA(20),\nRSI(14),100.0000\n"
        );
    }
}

mod validate {
    use super::*;

    #[test]
    fn valid_config_succeeds() {
        let file = write_temp_ini(VALID_INI);
        assert!(cli::run_validate(file.path()).is_ok());
    }

    #[test]
    fn missing_file_fails() {
        let err = cli::run_validate(std::path::Path::new("/nonexistent/sigtrader.ini")).unwrap_err();
        assert!(matches!(err, SigtraderError::ConfigParse { .. }));
    }

    #[test]
    fn invalid_value_fails() {
        let file = write_temp_ini("[aggregator]\nmin_confidence = lots\n");
        let err = cli::run_validate(file.path()).unwrap_err();
        assert!(matches!(err, SigtraderError::ConfigInvalid { ref key, .. } if key == "min_confidence"));
    }
}

mod argument_parsing {
    use super::*;

    #[test]
    fn parses_analyze() {
        let parsed = Cli::try_parse_from([
            "sigtrader", "analyze", "--config", "a.ini", "--data", "bars", "--codes", "005930",
        ])
        .unwrap();
        match parsed.command {
            Command::Analyze {
                codes, exchange, ..
            } => {
                assert_eq!(codes.as_deref(), Some("005930"));
                assert_eq!(exchange, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn inspect_requires_code() {
        assert!(Cli::try_parse_from(["sigtrader", "inspect", "--data", "bars"]).is_err());
    }

}

mod end_to_end {
    use super::*;

    #[test]
    fn analyze_reads_csv_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_bar_csv(dir.path(), "005930", "KRX", &dip_then_rally(33));
        write_bar_csv(dir.path(), "000660", "KRX", &flat(40, 50.0));
        let ini = write_temp_ini("[cycle]\nspacing_ms = 0\n[aggregator]\nmin_confidence = 0\n");

        let mut out = Vec::new();
        cli::run_analyze(ini.path(), dir.path().to_path_buf(), None, None, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let rows: Vec<&str> = text.lines().skip(1).collect();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].starts_with("005930,macd,BUY"), "{}", rows[0]);
    }

    #[test]
    fn inspect_prints_every_indicator() {
        let dir = tempfile::tempdir().unwrap();
        write_bar_csv(dir.path(), "005930", "KRX", &dip_then_rally(60));

        let mut out = Vec::new();
        cli::run_inspect(dir.path().to_path_buf(), "005930", None, None, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("indicator,value\n"));
        assert!(text.contains("\nRSI(14),"));
        assert!(text.contains("\nVOLUME_PROFILE.poc,"));
    }

    #[test]
    fn inspect_unknown_code_is_upstream_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        let err = cli::run_inspect(dir.path().to_path_buf(), "nope", None, None, &mut out)
            .unwrap_err();
        assert!(matches!(err, SigtraderError::UpstreamFailure { ref instrument, .. } if instrument == "NOPE"));
    }

    #[test]
    fn symbols_lists_exchange_codes() {
        let dir = tempfile::tempdir().unwrap();
        write_bar_csv(dir.path(), "005930", "KRX", &flat(5, 1.0));
        write_bar_csv(dir.path(), "AAPL", "NYSE", &flat(5, 1.0));

        let mut out = Vec::new();
        cli::run_symbols(dir.path().to_path_buf(), "krx", &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "005930\n");
    }

    #[test]
    fn symbols_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        let err = cli::run_symbols(dir.path().join("missing"), "KRX", &mut out).unwrap_err();
        assert!(matches!(err, SigtraderError::Io(_)));
    }
}
