//! Core domain types and logic.

pub mod aggregator;
pub mod config_validation;
pub mod cycle;
pub mod error;
pub mod indicator;
pub mod indicator_helpers;
pub mod ohlcv;
pub mod position;
pub mod signal;
pub mod sizing;
pub mod snapshot;
pub mod strategy;
pub mod universe;
