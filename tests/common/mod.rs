#![allow(dead_code)]

use chrono::NaiveDate;
use sigtrader::domain::aggregator::SignalAggregator;
use sigtrader::domain::cycle::{AnalysisEngine, CycleConfig};
use sigtrader::domain::error::SigtraderError;
pub use sigtrader::domain::ohlcv::{BarSeries, OhlcvBar};
use sigtrader::domain::strategy::{MacdStrategy, SqueezeMomentumStrategy};
use sigtrader::ports::bar_port::BarPort;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

pub struct MockBarPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
    pub latency: Duration,
    pub calls: Mutex<Vec<String>>,
}

impl MockBarPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            latency: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_bars(mut self, code: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(code.to_string(), bars);
        self
    }

    pub fn with_error(mut self, code: &str, reason: &str) -> Self {
        self.errors.insert(code.to_string(), reason.to_string());
        self
    }

    /// Every fetch sleeps this long before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl BarPort for MockBarPort {
    async fn fetch_bars(&self, instrument: &str, count: usize) -> Result<BarSeries, SigtraderError> {
        self.calls.lock().unwrap().push(instrument.to_string());
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if let Some(reason) = self.errors.get(instrument) {
            return Err(SigtraderError::UpstreamFailure {
                instrument: instrument.to_string(),
                reason: reason.clone(),
            });
        }
        let bars = self.data.get(instrument).cloned().unwrap_or_default();
        let keep_from = bars.len().saturating_sub(count);
        BarSeries::new(instrument, bars[keep_from..].to_vec())
    }

    fn list_symbols(&self) -> Result<Vec<String>, SigtraderError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Daily bars from 2024-01-01 with high/low at close ± 1.
pub fn make_bars(closes: &[f64], volumes: &[u64]) -> Vec<OhlcvBar> {
    let start = date(2024, 1, 1);
    closes
        .iter()
        .zip(volumes)
        .enumerate()
        .map(|(i, (&close, &volume))| OhlcvBar {
            date: start + chrono::Duration::days(i as i64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume,
        })
        .collect()
}

/// Falls by 1 from 100 for 30 bars, then rises by 1 from 72. The MACD
/// golden cross lands on the 33rd bar (close 74).
pub fn dip_then_rally(len: usize) -> Vec<OhlcvBar> {
    let closes: Vec<f64> = (0..30)
        .map(|i| 100.0 - i as f64)
        .chain((0..30).map(|i| 72.0 + i as f64))
        .take(len)
        .collect();
    make_bars(&closes, &vec![1000; closes.len()])
}

/// Mirror of [`dip_then_rally`]; the dead cross lands on the 33rd bar.
pub fn rally_then_dip(len: usize) -> Vec<OhlcvBar> {
    let closes: Vec<f64> = (0..30)
        .map(|i| 71.0 + i as f64)
        .chain((0..30).map(|i| 99.0 - i as f64))
        .take(len)
        .collect();
    make_bars(&closes, &vec![1000; closes.len()])
}

/// 40 quiet bars around 100, then a breakout to 125 on five times the volume.
pub fn squeeze_breakout() -> Vec<OhlcvBar> {
    let mut closes: Vec<f64> = (0..40)
        .map(|i| if i % 2 == 1 { 100.2 } else { 99.8 })
        .collect();
    closes.push(125.0);
    let mut volumes = vec![1000; 40];
    volumes.push(5000);
    make_bars(&closes, &volumes)
}

pub fn flat(len: usize, close: f64) -> Vec<OhlcvBar> {
    make_bars(&vec![close; len], &vec![1000; len])
}

/// Both strategies, no call spacing, and the given confidence floor.
pub fn engine(min_confidence: f64) -> AnalysisEngine {
    let config = CycleConfig {
        min_call_spacing: Duration::ZERO,
        ..CycleConfig::default()
    };
    AnalysisEngine::new(config, SignalAggregator::new(min_confidence))
        .with_strategy(SqueezeMomentumStrategy::default())
        .with_strategy(MacdStrategy::default())
}

pub fn write_bar_csv(dir: &Path, code: &str, exchange: &str, bars: &[OhlcvBar]) {
    let mut content = String::from("date,open,high,low,close,volume\n");
    for bar in bars {
        content.push_str(&format!(
            "{},{},{},{},{},{}\n",
            bar.date.format("%Y-%m-%d"),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            bar.volume
        ));
    }
    std::fs::write(dir.join(format!("{code}_{exchange}.csv")), content).unwrap();
}
