//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for macross.
#[derive(Debug, thiserror::Error)]
pub enum MacrossError {
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("length mismatch: left has {left} values, right has {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("insufficient data: have {have} records, need {need}")]
    InsufficientData { have: usize, need: usize },

    #[error("no records on or before {date}")]
    NotFound { date: NaiveDate },

    #[error("data error: {reason}")]
    Data { reason: String },

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

impl MacrossError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        MacrossError::InvalidArgument {
            reason: reason.into(),
        }
    }
}

impl From<&MacrossError> for std::process::ExitCode {
    fn from(err: &MacrossError) -> Self {
        let code: u8 = match err {
            MacrossError::Io(_) => 1,
            MacrossError::ConfigParse { .. }
            | MacrossError::ConfigMissing { .. }
            | MacrossError::ConfigInvalid { .. } => 2,
            MacrossError::Data { .. } => 3,
            MacrossError::InvalidArgument { .. } | MacrossError::LengthMismatch { .. } => 4,
            MacrossError::InsufficientData { .. } | MacrossError::NotFound { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
