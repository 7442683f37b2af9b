//! Target instrument lists for an analysis cycle.

use std::collections::HashSet;

use crate::domain::error::SigtraderError;

pub const DEFAULT_MAX_INSTRUMENTS: usize = 20;

/// Parse a comma-separated code list, trimming and upper-casing each token.
pub fn parse_codes(input: &str) -> Result<Vec<String>, SigtraderError> {
    input
        .split(',')
        .map(|token| {
            let trimmed = token.trim();
            if trimmed.is_empty() {
                Err(SigtraderError::invalid_config(
                    "universe",
                    "codes",
                    "empty token in code list",
                ))
            } else {
                Ok(trimmed.to_uppercase())
            }
        })
        .collect()
}

/// First occurrence of each target, in order, capped at `max_instruments`.
pub fn select_targets(targets: &[String], max_instruments: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    targets
        .iter()
        .filter(|code| seen.insert(code.as_str()))
        .take(max_instruments)
        .cloned()
        .collect()
}
