pub mod analytics;
pub mod error;
pub mod scheme;
pub mod simulation;
pub mod types;

pub use error::FeeSimError;
pub use types::*;

/// Standard result type for all fee-simulation operations
pub type FeeSimResult<T> = Result<T, FeeSimError>;
