//! Result and error types for the core library

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Core library error type
///
/// The first five variants are ledger rule violations raised by the
/// `Account` entity or the use cases. They reach the caller unchanged.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Cannot transfer money to the same account")]
    SelfTransfer,

    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },

    #[error("Pay in limit exceeded: requested {requested}, remaining allowance {remaining}")]
    PayInLimitExceeded {
        requested: Decimal,
        remaining: Decimal,
    },

    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    #[error("Invalid amount: {0}")]
    InvalidAmount(Decimal),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl Error {
    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create a notification delivery error
    pub fn notification(msg: impl Into<String>) -> Self {
        Self::Notification(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<duckdb::Error> for Error {
    fn from(err: duckdb::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;
