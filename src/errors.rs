use std::result::Result as StdResult;

use thiserror::Error;

/// Unified error type for ledger, archive, storage, and configuration layers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BudgetError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Cannot finalize cycle: {0}")]
    Finalization(String),
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = StdResult<T, BudgetError>;

impl BudgetError {
    pub fn validation(message: impl Into<String>) -> Self {
        BudgetError::Validation(message.into())
    }

    /// True for errors caused by user input rather than the environment.
    pub fn is_user_error(&self) -> bool {
        matches!(self, BudgetError::Validation(_) | BudgetError::Finalization(_))
    }
}

impl From<std::io::Error> for BudgetError {
    fn from(err: std::io::Error) -> Self {
        BudgetError::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for BudgetError {
    fn from(err: serde_json::Error) -> Self {
        BudgetError::Persistence(err.to_string())
    }
}
