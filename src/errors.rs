use chrono::NaiveDate;

/// Domain-specific error types for the forecasting pipeline.
/// Every core error is terminal for the operation that raised it:
/// - No retries, no partial recovery
/// - The caller decides whether to abort the run or substitute a default
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("insufficient data: need at least 2 observations, got {observations}")]
    InsufficientData { observations: usize },

    #[error("invalid date range: {start} is not before {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("invalid trial count: {0} (must be > 0)")]
    InvalidTrialCount(i64),

    #[error("network error: {0}")]
    Network(String),

    #[error("data format error: {0}")]
    DataFormat(String),

    #[error("config error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for EngineError {
    fn from(e: reqwest::Error) -> Self {
        EngineError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::DataFormat(e.to_string())
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
