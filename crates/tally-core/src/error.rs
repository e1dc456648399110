use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Unrecognized receipt format")]
    UnrecognizedFormat,
    #[error("Receipt already recorded")]
    DuplicateInput,
    #[error("Delivery record not found: {0}")]
    RecordNotFound(Uuid),
    #[error("Invalid day: {0}")]
    InvalidDay(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}
