//! Domain error types.

/// Top-level error type for sigtrader.
#[derive(Debug, thiserror::Error)]
pub enum SigtraderError {
    #[error("insufficient data for {instrument}: have {bars} bars, need {minimum}")]
    InsufficientData {
        instrument: String,
        bars: usize,
        minimum: usize,
    },

    #[error("degenerate range: {reason}")]
    DegenerateRange { reason: String },

    #[error("invalid fill for {instrument}: sell {requested} exceeds held {held}")]
    InvalidFill {
        instrument: String,
        requested: u64,
        held: u64,
    },

    #[error("upstream failure for {instrument}: {reason}")]
    UpstreamFailure { instrument: String, reason: String },

    #[error("unknown strategy: {id}")]
    UnknownStrategy { id: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SigtraderError {
    pub(crate) fn upstream(instrument: &str, reason: impl Into<String>) -> Self {
        SigtraderError::UpstreamFailure {
            instrument: instrument.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_config(section: &str, key: &str, reason: impl Into<String>) -> Self {
        SigtraderError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&SigtraderError> for std::process::ExitCode {
    fn from(err: &SigtraderError) -> Self {
        let code: u8 = match err {
            SigtraderError::Io(_) => 1,
            SigtraderError::ConfigParse { .. }
            | SigtraderError::ConfigMissing { .. }
            | SigtraderError::ConfigInvalid { .. }
            | SigtraderError::UnknownStrategy { .. } => 2,
            SigtraderError::InvalidFill { .. } => 4,
            SigtraderError::InsufficientData { .. }
            | SigtraderError::DegenerateRange { .. }
            | SigtraderError::UpstreamFailure { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
