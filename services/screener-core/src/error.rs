use serde::{Deserialize, Serialize};

/// Configuration rejected before any evaluator runs
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: String, reason: String },
}

impl ConfigError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// A strategy could not evaluate the snapshot as a whole
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum EvaluatorError {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Market data error: {0}")]
    MarketData(String),
}

impl From<market_data::MarketDataError> for EvaluatorError {
    fn from(err: market_data::MarketDataError) -> Self {
        EvaluatorError::MarketData(err.to_string())
    }
}
