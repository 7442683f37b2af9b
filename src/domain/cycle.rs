//! Analysis cycle over a list of target instruments.
//!
//! The engine owns one slot per registered strategy. A slot pairs the
//! strategy with its own position book; fills for one strategy never touch
//! another strategy's book.
//!
//! A cycle fetches bars for every target with bounded concurrency, spacing
//! successive fetches by at least `min_call_spacing`, and reports one result
//! per instrument. A failing instrument is logged and reported without
//! affecting the others.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{info, warn};

use crate::domain::aggregator::SignalAggregator;
use crate::domain::error::SigtraderError;
use crate::domain::ohlcv::BarSeries;
use crate::domain::position::{FillConfirmation, Position, PositionBook};
use crate::domain::signal::Signal;
use crate::domain::sizing::{OrderSizing, PlannedOrder};
use crate::domain::strategy::SignalSource;
use crate::domain::universe::{DEFAULT_MAX_INSTRUMENTS, select_targets};
use crate::ports::bar_port::BarPort;

#[derive(Debug, Clone, PartialEq)]
pub struct CycleConfig {
    pub max_instruments: usize,
    pub concurrency: usize,
    pub min_call_spacing: Duration,
    /// Bars requested per instrument.
    pub bar_count: usize,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            max_instruments: DEFAULT_MAX_INSTRUMENTS,
            concurrency: 4,
            min_call_spacing: Duration::from_millis(200),
            bar_count: 50,
        }
    }
}

/// Scheduler state handed to a single cycle.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CycleRequest {
    pub targets: Vec<String>,
    pub trading_open: bool,
}

#[derive(Debug)]
pub struct InstrumentOutcome {
    pub instrument: String,
    /// Ranked signals, or why the instrument was skipped this cycle.
    pub result: Result<Vec<Signal>, SigtraderError>,
}

#[derive(Debug, Default)]
pub struct CycleReport {
    /// One entry per analyzed target, in target order.
    pub outcomes: Vec<InstrumentOutcome>,
}

impl CycleReport {
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn signals(&self) -> impl Iterator<Item = &Signal> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .flatten()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &SigtraderError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.instrument.as_str(), e)))
    }

    pub fn outcome(&self, instrument: &str) -> Option<&InstrumentOutcome> {
        self.outcomes.iter().find(|o| o.instrument == instrument)
    }
}

pub struct StrategySlot {
    source: Box<dyn SignalSource>,
    active: bool,
    book: Mutex<PositionBook>,
}

impl StrategySlot {
    pub fn new(source: Box<dyn SignalSource>) -> Self {
        let book = PositionBook::new(source.strategy_id());
        Self {
            source,
            active: true,
            book: Mutex::new(book),
        }
    }

    pub fn strategy_id(&self) -> &str {
        self.source.strategy_id()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    // A panic while holding the lock cannot leave the book half-updated:
    // apply_fill validates before it mutates.
    fn book(&self) -> MutexGuard<'_, PositionBook> {
        self.book.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Shared gate that lets one bar fetch through per tick.
struct Pacer {
    interval: Option<tokio::sync::Mutex<Interval>>,
}

impl Pacer {
    fn new(spacing: Duration) -> Self {
        let interval = (!spacing.is_zero()).then(|| {
            let mut interval = tokio::time::interval(spacing);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tokio::sync::Mutex::new(interval)
        });
        Self { interval }
    }

    async fn wait(&self) {
        if let Some(interval) = &self.interval {
            interval.lock().await.tick().await;
        }
    }
}

pub struct AnalysisEngine {
    slots: Vec<StrategySlot>,
    aggregator: SignalAggregator,
    config: CycleConfig,
}

impl AnalysisEngine {
    pub fn new(config: CycleConfig, aggregator: SignalAggregator) -> Self {
        Self {
            slots: Vec::new(),
            aggregator,
            config,
        }
    }

    /// Register a strategy. Strategies are evaluated in registration order.
    pub fn with_strategy(mut self, source: impl SignalSource + 'static) -> Self {
        self.slots.push(StrategySlot::new(Box::new(source)));
        self
    }

    pub fn config(&self) -> &CycleConfig {
        &self.config
    }

    pub fn slots(&self) -> &[StrategySlot] {
        &self.slots
    }

    pub fn strategy_ids(&self) -> Vec<&str> {
        self.slots.iter().map(StrategySlot::strategy_id).collect()
    }

    fn slot(&self, strategy_id: &str) -> Result<&StrategySlot, SigtraderError> {
        self.slots
            .iter()
            .find(|s| s.strategy_id() == strategy_id)
            .ok_or_else(|| SigtraderError::UnknownStrategy {
                id: strategy_id.to_string(),
            })
    }

    pub fn set_active(&mut self, strategy_id: &str, active: bool) -> Result<(), SigtraderError> {
        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.strategy_id() == strategy_id)
            .ok_or_else(|| SigtraderError::UnknownStrategy {
                id: strategy_id.to_string(),
            })?;
        slot.active = active;
        Ok(())
    }

    /// Evaluate every active strategy on `bars` and rank the combined signals.
    pub fn analyze_instrument(&self, bars: &BarSeries) -> Result<Vec<Signal>, SigtraderError> {
        let mut signals = Vec::new();
        for slot in self.slots.iter().filter(|s| s.active) {
            let book = slot.book().clone();
            signals.extend(slot.source.evaluate(bars, &book)?);
        }
        Ok(self.aggregator.aggregate(signals))
    }

    pub async fn run_cycle(&self, request: &CycleRequest, port: &dyn BarPort) -> CycleReport {
        if !request.trading_open {
            info!(targets = request.targets.len(), "trading window closed, cycle skipped");
            return CycleReport::default();
        }

        let started = Instant::now();
        let targets = select_targets(&request.targets, self.config.max_instruments);
        let pacer = Pacer::new(self.config.min_call_spacing);
        let pacer = &pacer;

        let outcomes: Vec<InstrumentOutcome> = stream::iter(targets)
            .map(|instrument| async move {
                pacer.wait().await;
                let result = port
                    .fetch_bars(&instrument, self.config.bar_count)
                    .await
                    .and_then(|bars| self.analyze_instrument(&bars));
                if let Err(err) = &result {
                    warn!(instrument = %instrument, error = %err, "instrument skipped this cycle");
                }
                InstrumentOutcome { instrument, result }
            })
            .buffered(self.config.concurrency.max(1))
            .collect()
            .await;

        let report = CycleReport { outcomes };
        info!(
            instruments = report.outcomes.len(),
            signals = report.signals().count(),
            failures = report.failures().count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "analysis cycle complete"
        );
        report
    }

    /// Route a broker confirmation to the book of the strategy that placed it.
    pub fn apply_fill(
        &self,
        strategy_id: &str,
        fill: &FillConfirmation,
    ) -> Result<Option<Position>, SigtraderError> {
        self.slot(strategy_id)?.book().apply_confirmation(fill)
    }

    pub fn positions(&self, strategy_id: &str) -> Result<Vec<Position>, SigtraderError> {
        Ok(self.slot(strategy_id)?.book().snapshot())
    }

    /// Size each signal against the book of the strategy that produced it.
    pub fn plan_orders(&self, sizing: &OrderSizing, signals: &[Signal]) -> Vec<PlannedOrder> {
        signals
            .iter()
            .filter_map(|signal| {
                let slot = self.slot(signal.strategy_id()).ok()?;
                sizing.plan_order(signal, &slot.book())
            })
            .collect()
    }
}
