use common::TimeError;
use thiserror::Error;
use validator::ValidationErrors;

/// Error types for the compute module
#[derive(Error, Debug)]
pub enum ComputeError {
    /// A form failed client-side validation and must not be submitted
    #[error("Validation error: {}", crate::validation::summarize(.0))]
    Validation(#[from] ValidationErrors),

    /// Error from date operations
    #[error("Date error: {0}")]
    Date(#[from] TimeError),
}

/// Type alias for Result with ComputeError
pub type Result<T> = std::result::Result<T, ComputeError>;
