//! Bar source port trait.

use async_trait::async_trait;

use crate::domain::error::SigtraderError;
use crate::domain::ohlcv::BarSeries;

#[async_trait]
pub trait BarPort: Send + Sync {
    /// The most recent `count` daily bars for `instrument`, oldest first.
    ///
    /// The cycle keeps several fetches in flight, so implementations must not
    /// block the calling task.
    async fn fetch_bars(&self, instrument: &str, count: usize) -> Result<BarSeries, SigtraderError>;

    /// Instruments this source has data for, sorted.
    fn list_symbols(&self) -> Result<Vec<String>, SigtraderError>;
}
