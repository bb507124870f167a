use thiserror::Error;

/// Message shown when an operation is triggered with nothing to analyze.
pub const EMPTY_INPUT_NOTICE: &str = "Please paste or type some text first.";

#[derive(Debug, Clone, Error)]
pub enum AnalysisError {
    /// Input failed validation; no request was sent.
    #[error("{0}")]
    Validation(String),
    /// The backend could not be reached.
    #[error("request to {path} failed: {reason}")]
    Request { path: String, reason: String },
    /// The backend answered with a body that is not the expected JSON.
    #[error("could not decode response from {path}: {reason}")]
    Decode { path: String, reason: String },
}

impl AnalysisError {
    pub fn empty_input() -> Self {
        AnalysisError::Validation(EMPTY_INPUT_NOTICE.to_string())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AnalysisError::Validation(_))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}
