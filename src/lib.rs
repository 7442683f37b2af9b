//! sigtrader — technical-analysis signal engine.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`]. The binary front end lives in
//! [`cli`] and installs the [`logging`] subscriber.

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod logging;
pub mod ports;
