//! CSV file bar source.
//!
//! Reads `<base>/<CODE>_<EXCHANGE>.csv` with the header
//! `date,open,high,low,close,volume` and dates formatted `YYYY-MM-DD`.

use std::fmt::Display;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::debug;

use crate::domain::error::SigtraderError;
use crate::domain::ohlcv::{BarSeries, OhlcvBar};
use crate::ports::bar_port::BarPort;

struct Row<'a> {
    code: &'a str,
    line: usize,
    record: &'a csv::StringRecord,
}

impl<'a> Row<'a> {
    fn text(&self, index: usize, name: &str) -> Result<&'a str, SigtraderError> {
        self.record.get(index).map(str::trim).ok_or_else(|| {
            SigtraderError::upstream(self.code, format!("row {}: missing {name} column", self.line))
        })
    }

    fn number<T>(&self, index: usize, name: &str) -> Result<T, SigtraderError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.text(index, name)?
            .parse::<T>()
            .map_err(|e| self.invalid(name, e))
    }

    fn invalid(&self, name: &str, err: impl Display) -> SigtraderError {
        SigtraderError::upstream(
            self.code,
            format!("row {}: invalid {name} value: {err}", self.line),
        )
    }
}

#[derive(Debug, Clone)]
pub struct CsvAdapter {
    base_path: PathBuf,
    exchange: String,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf, exchange: impl Into<String>) -> Self {
        Self {
            base_path,
            exchange: exchange.into(),
        }
    }

    pub fn exchange(&self) -> &str {
        &self.exchange
    }

    fn csv_path(&self, code: &str) -> PathBuf {
        self.base_path.join(format!("{}_{}.csv", code, self.exchange))
    }

    fn read_bars(&self, code: &str) -> Result<Vec<OhlcvBar>, SigtraderError> {
        let path = self.csv_path(code);
        let content = fs::read_to_string(&path).map_err(|e| {
            SigtraderError::upstream(code, format!("failed to read {}: {}", path.display(), e))
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();
        for (index, result) in rdr.records().enumerate() {
            let record = result
                .map_err(|e| SigtraderError::upstream(code, format!("CSV parse error: {}", e)))?;
            // header is line 1
            let row = Row {
                code,
                line: index + 2,
                record: &record,
            };
            let date = NaiveDate::parse_from_str(row.text(0, "date")?, "%Y-%m-%d")
                .map_err(|e| row.invalid("date", e))?;

            bars.push(OhlcvBar {
                date,
                open: row.number(1, "open")?,
                high: row.number(2, "high")?,
                low: row.number(3, "low")?,
                close: row.number(4, "close")?,
                volume: row.number(5, "volume")?,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    /// Blocking read of the last `count` bars for `instrument`.
    pub fn load_bars(&self, instrument: &str, count: usize) -> Result<BarSeries, SigtraderError> {
        let mut bars = self.read_bars(instrument)?;
        let keep_from = bars.len().saturating_sub(count);
        let bars = bars.split_off(keep_from);
        debug!(instrument, exchange = %self.exchange, bars = bars.len(), "bars loaded");
        BarSeries::new(instrument, bars)
    }
}

#[async_trait]
impl BarPort for CsvAdapter {
    async fn fetch_bars(&self, instrument: &str, count: usize) -> Result<BarSeries, SigtraderError> {
        let adapter = self.clone();
        let code = instrument.to_string();
        tokio::task::spawn_blocking(move || adapter.load_bars(&code, count))
            .await
            .map_err(|e| SigtraderError::upstream(instrument, format!("bar loading task failed: {e}")))?
    }

    fn list_symbols(&self) -> Result<Vec<String>, SigtraderError> {
        let entries = fs::read_dir(&self.base_path)?;
        let suffix = format!("_{}.csv", self.exchange);

        let mut symbols = Vec::new();
        for entry in entries {
            let name = entry?.file_name();
            let name = name.to_string_lossy();
            if let Some(code) = name.strip_suffix(&suffix) {
                symbols.push(code.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
