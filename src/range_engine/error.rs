use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading ranges or decoding range identifiers.
#[derive(Debug, Error)]
pub enum RangeError {
    #[error("cannot open workbook: {0}")]
    Workbook(String),

    #[error("cannot read sheet {sheet}: {message}")]
    Sheet { sheet: String, message: String },

    #[error("sheet {sheet}: grid header at row {row} has no recognisable title")]
    MissingTitle { sheet: String, row: usize },

    #[error("invalid hand: {0:?}")]
    InvalidHand(String),

    #[error("invalid position: {0:?}")]
    InvalidPosition(String),

    #[error("invalid action: {0:?}")]
    InvalidAction(String),

    #[error("invalid scenario kind: {0:?}")]
    InvalidKind(String),

    #[error("invalid strategy key: {0:?}")]
    InvalidKey(String),

    #[error("cannot read bucket file {0}: {1}")]
    BucketIo(PathBuf, #[source] std::io::Error),

    #[error("invalid bucket matrix: {0}")]
    BucketFormat(String),
}

pub type Result<T> = std::result::Result<T, RangeError>;

/// Errors from loading a [`TrainerConfig`](crate::range_engine::config::TrainerConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("relay_url must not be empty")]
    EmptyRelayUrl,
}

/// Failures of the remote advice relay. The display text is what the user sees.
#[derive(Debug, Error)]
pub enum AdviceError {
    #[error("{0}")]
    Transport(String),

    #[error("{message}")]
    Relay { status: u16, message: String },
}

impl From<reqwest::Error> for AdviceError {
    fn from(e: reqwest::Error) -> Self {
        AdviceError::Transport(e.to_string())
    }
}
