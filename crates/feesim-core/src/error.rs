use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeeSimError {
    #[error("Invalid configuration: {field} — {reason}")]
    InvalidConfiguration { field: String, reason: String },

    #[error("Input mismatch: expected {expected} observations, got {actual}")]
    InputMismatch { expected: usize, actual: usize },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Financial impossibility: {0}")]
    FinancialImpossibility(String),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for FeeSimError {
    fn from(e: serde_json::Error) -> Self {
        FeeSimError::SerializationError(e.to_string())
    }
}
