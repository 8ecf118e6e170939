//! Account Store Errors

use rust_decimal::Decimal;

use crate::domain::{AmountError, LedgerError};

/// Errors that can occur in an account store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Account not found
    #[error("Account not found: {0}")]
    NotFound(String),

    /// Applying the change would make the balance negative
    #[error("Insufficient balance on {account_id}: required {required}, available {available}")]
    InsufficientFunds {
        account_id: String,
        required: Decimal,
        available: Decimal,
    },

    /// Balance arithmetic failed
    #[error("Balance error: {0}")]
    Amount(#[from] AmountError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => LedgerError::AccountNotFound(id),
            StoreError::InsufficientFunds {
                required,
                available,
                ..
            } => LedgerError::insufficient_funds(required, available),
            StoreError::Amount(AmountError::NotPositive(value)) => {
                LedgerError::NonPositiveAmount(value)
            }
            other => {
                tracing::error!("Account store failure: {}", other);
                LedgerError::Storage(other.to_string())
            }
        }
    }
}
