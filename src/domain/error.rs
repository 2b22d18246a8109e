//! Domain error types.

/// Top-level error type for bandtrader.
///
/// Short history and degenerate statistics are not errors: they surface as
/// undefined indicator values or fixed sentinels inside the numeric contract.
#[derive(Debug, thiserror::Error)]
pub enum BandtraderError {
    #[error("missing required column: {column}")]
    MissingColumn { column: String },

    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BandtraderError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        BandtraderError::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn missing_column(column: impl Into<String>) -> Self {
        BandtraderError::MissingColumn {
            column: column.into(),
        }
    }
}

impl From<&BandtraderError> for std::process::ExitCode {
    fn from(err: &BandtraderError) -> Self {
        let code: u8 = match err {
            BandtraderError::Io(_) => 1,
            BandtraderError::ConfigParse { .. }
            | BandtraderError::ConfigInvalid { .. } => 2,
            BandtraderError::Data { .. } => 3,
            BandtraderError::MissingColumn { .. } | BandtraderError::InvalidInput { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
