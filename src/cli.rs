//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{
    aggregator, cycle_config, log_config, macd_params, order_sizing, squeeze_params,
    validate_config,
};
use crate::domain::cycle::{AnalysisEngine, CycleReport, CycleRequest};
use crate::domain::error::SigtraderError;
use crate::domain::signal::{Signal, SignalMetrics};
use crate::domain::sizing::{OrderSizing, PlannedOrder};
use crate::domain::snapshot::{IndicatorReading, latest_readings};
use crate::domain::strategy::{MacdStrategy, SqueezeMomentumStrategy, macd, squeeze_momentum};
use crate::domain::universe::parse_codes;
use crate::logging::{LogConfig, init_logging};
use crate::ports::bar_port::BarPort;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_EXCHANGE: &str = "KRX";

#[derive(Parser, Debug)]
#[command(name = "sigtrader", about = "Technical-analysis trading signal engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one analysis cycle and print ranked signals as CSV
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        data: PathBuf,
        /// Comma-separated instrument codes; overrides [cycle] codes
        #[arg(long)]
        codes: Option<String>,
        #[arg(long)]
        exchange: Option<String>,
    },
    /// Print the latest value of every indicator for one instrument
    Inspect {
        #[arg(short, long)]
        data: PathBuf,
        #[arg(long)]
        code: String,
        #[arg(long)]
        exchange: Option<String>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List instrument codes that have bar data
    Symbols {
        #[arg(short, long)]
        data: PathBuf,
        #[arg(long)]
        exchange: String,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = match cli.command {
        Command::Analyze {
            config,
            data,
            codes,
            exchange,
        } => run_analyze(&config, data, codes.as_deref(), exchange.as_deref(), &mut out),
        Command::Inspect {
            data,
            code,
            exchange,
            config,
        } => run_inspect(data, &code, exchange.as_deref(), config.as_deref(), &mut out),
        Command::Validate { config } => run_validate(&config),
        Command::Symbols { data, exchange } => run_symbols(data, &exchange, &mut out),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, SigtraderError> {
    eprintln!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path)
}

fn init_logging_from(config: Option<&dyn ConfigPort>) -> Result<(), SigtraderError> {
    let log = match config {
        Some(c) => log_config(c)?,
        None => LogConfig::default(),
    };
    init_logging(&log)
}

/// Register both strategies with the configured parameters.
///
/// `[squeeze] enabled` and `[macd] enabled` switch a strategy off without
/// removing its position book.
pub fn build_engine(config: &dyn ConfigPort) -> Result<AnalysisEngine, SigtraderError> {
    let mut engine = AnalysisEngine::new(cycle_config(config)?, aggregator(config)?)
        .with_strategy(SqueezeMomentumStrategy::new(squeeze_params(config)?))
        .with_strategy(MacdStrategy::new(macd_params(config)?));
    engine.set_active(
        squeeze_momentum::STRATEGY_ID,
        config.get_bool("squeeze", "enabled", true),
    )?;
    engine.set_active(macd::STRATEGY_ID, config.get_bool("macd", "enabled", true))?;
    Ok(engine)
}

pub fn resolve_exchange(exchange_override: Option<&str>, config: Option<&dyn ConfigPort>) -> String {
    exchange_override
        .map(str::to_string)
        .or_else(|| config.and_then(|c| c.get_string("cycle", "exchange")))
        .map(|e| e.trim().to_uppercase())
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| DEFAULT_EXCHANGE.to_string())
}

/// Targets from `--codes`, then `[cycle] codes`, then every symbol the bar
/// source knows about.
pub fn resolve_targets(
    codes_override: Option<&str>,
    config: &dyn ConfigPort,
    port: &dyn BarPort,
) -> Result<Vec<String>, SigtraderError> {
    if let Some(codes) = codes_override {
        return parse_codes(codes);
    }
    if let Some(codes) = config.get_string("cycle", "codes") {
        return parse_codes(&codes);
    }

    let symbols = port.list_symbols()?;
    if symbols.is_empty() {
        return Err(SigtraderError::ConfigMissing {
            section: "cycle".to_string(),
            key: "codes".to_string(),
        });
    }
    Ok(symbols)
}

/// Run one cycle on a fresh runtime.
pub fn run_cycle_blocking(
    engine: &AnalysisEngine,
    request: &CycleRequest,
    port: &dyn BarPort,
) -> Result<CycleReport, SigtraderError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(engine.run_cycle(request, port)))
}

pub fn run_analyze<W: Write>(
    config_path: &Path,
    data: PathBuf,
    codes_override: Option<&str>,
    exchange_override: Option<&str>,
    out: &mut W,
) -> Result<(), SigtraderError> {
    let config = load_config(config_path)?;
    let config_ref: &dyn ConfigPort = &config;
    init_logging_from(Some(config_ref))?;
    validate_config(config_ref)?;

    let engine = build_engine(&config)?;
    let sizing = order_sizing(&config)?;
    let exchange = resolve_exchange(exchange_override, Some(config_ref));
    let port = CsvAdapter::new(data, exchange);

    let request = CycleRequest {
        targets: resolve_targets(codes_override, &config, &port)?,
        trading_open: config.get_bool("cycle", "trading_open", true),
    };
    eprintln!(
        "Analyzing {} instruments on {} with {}",
        request.targets.len(),
        port.exchange(),
        engine.strategy_ids().join(", ")
    );

    let report = run_cycle_blocking(&engine, &request, &port)?;
    write_report(&engine, &sizing, report, out)
}

/// Write every ranked signal with its planned quantity, then fail with the
/// first instrument error if no instrument could be analyzed.
pub fn write_report<W: Write>(
    engine: &AnalysisEngine,
    sizing: &OrderSizing,
    report: CycleReport,
    out: &mut W,
) -> Result<(), SigtraderError> {
    let signals: Vec<_> = report.signals().cloned().collect();
    let planned = engine.plan_orders(sizing, &signals);
    write_signals(out, &signals, &planned)?;

    let failures = report.failures().count();
    eprintln!(
        "{} signals from {} instruments ({} failed)",
        signals.len(),
        report.outcomes.len(),
        failures
    );
    if failures > 0 && failures == report.outcomes.len() {
        if let Some(err) = report.outcomes.into_iter().find_map(|o| o.result.err()) {
            return Err(err);
        }
    }
    Ok(())
}

fn csv_error(e: csv::Error) -> SigtraderError {
    SigtraderError::Io(e.into())
}

pub fn write_signals<W: Write>(
    out: &mut W,
    signals: &[Signal],
    planned: &[PlannedOrder],
) -> Result<(), SigtraderError> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record([
        "instrument",
        "strategy",
        "action",
        "reason",
        "reference_price",
        "confidence",
        "quantity",
        "metrics",
    ])
    .map_err(csv_error)?;

    for signal in signals {
        let quantity = planned
            .iter()
            .find(|o| &o.signal == signal)
            .map_or(0, |o| o.quantity);
        let metrics = match signal.metrics() {
            SignalMetrics::Squeeze {
                momentum,
                previous_momentum,
            } => format!("momentum={momentum:.4};previous={previous_momentum:.4}"),
            SignalMetrics::Macd {
                line,
                signal,
                histogram,
                rsi,
            } => format!("line={line:.4};signal={signal:.4};histogram={histogram:.4};rsi={rsi:.2}"),
        };
        wtr.write_record([
            signal.instrument().to_string(),
            signal.strategy_id().to_string(),
            signal.action().to_string(),
            signal.reason().code().to_string(),
            format!("{:.2}", signal.reference_price()),
            format!("{:.1}", signal.confidence()),
            quantity.to_string(),
            metrics,
        ])
        .map_err(csv_error)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn run_inspect<W: Write>(
    data: PathBuf,
    code: &str,
    exchange_override: Option<&str>,
    config_path: Option<&Path>,
    out: &mut W,
) -> Result<(), SigtraderError> {
    let config = config_path.map(load_config).transpose()?;
    let config_ref = config.as_ref().map(|c| c as &dyn ConfigPort);
    init_logging_from(config_ref)?;

    let (squeeze_cfg, macd_cfg, cycle) = match config_ref {
        Some(c) => (squeeze_params(c)?, macd_params(c)?, cycle_config(c)?),
        None => Default::default(),
    };

    let port = CsvAdapter::new(data, resolve_exchange(exchange_override, config_ref));
    let code = code.trim().to_uppercase();
    let bars = port.load_bars(&code, cycle.bar_count)?;
    eprintln!(
        "{}.{}: {} bars ending {}",
        code,
        port.exchange(),
        bars.len(),
        bars.last().date
    );
    write_readings(out, &latest_readings(&bars, &squeeze_cfg, &macd_cfg))
}

pub fn write_readings<W: Write>(
    out: &mut W,
    readings: &[IndicatorReading],
) -> Result<(), SigtraderError> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(["indicator", "value"]).map_err(csv_error)?;
    for reading in readings {
        let value = reading.value.map(|v| format!("{v:.4}")).unwrap_or_default();
        wtr.write_record([reading.name.as_str(), value.as_str()])
            .map_err(csv_error)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn run_validate(config_path: &Path) -> Result<(), SigtraderError> {
    let config = load_config(config_path)?;
    validate_config(&config)?;

    let engine = build_engine(&config)?;
    for slot in engine.slots() {
        let state = if slot.is_active() { "enabled" } else { "disabled" };
        eprintln!("  {}: {}", slot.strategy_id(), state);
    }
    eprintln!("\nConfiguration is valid.");
    Ok(())
}

pub fn run_symbols<W: Write>(data: PathBuf, exchange: &str, out: &mut W) -> Result<(), SigtraderError> {
    init_logging_from(None)?;
    let port = CsvAdapter::new(data, exchange.trim().to_uppercase());
    let symbols = port.list_symbols()?;

    if symbols.is_empty() {
        eprintln!("No symbols found for exchange {}", port.exchange());
    } else {
        for symbol in &symbols {
            writeln!(out, "{}", symbol)?;
        }
        eprintln!("{} symbols found", symbols.len());
    }
    Ok(())
}
