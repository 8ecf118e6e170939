//! Ledger Error Types
//!
//! Errors returned by every ledger operation. They carry the message shown
//! to callers and classify into a small set of kinds, each with an
//! HTTP-style status code.

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type returned by every ledger operation
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Coarse classification of ledger failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidArgument,
    InsufficientFunds,
    UpstreamFailure,
    Internal,
}

impl ErrorKind {
    /// HTTP-style status code for this kind
    pub fn status_code(self) -> u16 {
        match self {
            ErrorKind::NotFound => 404,
            ErrorKind::InvalidArgument | ErrorKind::InsufficientFunds => 400,
            ErrorKind::UpstreamFailure => 502,
            ErrorKind::Internal => 500,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LedgerError {
    /// Account (or one side of a transfer) does not exist
    #[error("Requested account could not be found")]
    AccountNotFound(String),

    /// Deposit, withdraw or transfer amount is zero or negative
    #[error("Requested amount must be positive")]
    NonPositiveAmount(Decimal),

    #[error("Requested name must follow the pattern of <First> <Middle> <Last>")]
    InvalidHolderName(String),

    #[error("Requested search type must be balance or name")]
    InvalidSortKey(String),

    #[error("Sender and receiver must be different accounts")]
    SameAccountTransfer,

    /// Currency code list is malformed or a code could not be converted
    #[error("Invalid currency request: {0}")]
    InvalidCurrency(String),

    #[error("Requested amount must be less or equal to current balance")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },

    /// Rate lookup failed for reasons other than the caller's input
    #[error("Currency rate lookup failed: {0}")]
    UpstreamFailure(String),

    #[error("Account storage failure: {0}")]
    Storage(String),
}

impl LedgerError {
    pub fn insufficient_funds(requested: Decimal, available: Decimal) -> Self {
        Self::InsufficientFunds {
            requested,
            available,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AccountNotFound(_) => ErrorKind::NotFound,
            Self::NonPositiveAmount(_)
            | Self::InvalidHolderName(_)
            | Self::InvalidSortKey(_)
            | Self::SameAccountTransfer
            | Self::InvalidCurrency(_) => ErrorKind::InvalidArgument,
            Self::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            Self::UpstreamFailure(_) => ErrorKind::UpstreamFailure,
            Self::Storage(_) => ErrorKind::Internal,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    /// Stable machine-readable code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::AccountNotFound(_) => "account_not_found",
            Self::NonPositiveAmount(_) => "invalid_amount",
            Self::InvalidHolderName(_) => "invalid_name",
            Self::InvalidSortKey(_) => "invalid_sort_key",
            Self::SameAccountTransfer => "same_account_transfer",
            Self::InvalidCurrency(_) => "invalid_currency",
            Self::InsufficientFunds { .. } => "insufficient_balance",
            Self::UpstreamFailure(_) => "upstream_failure",
            Self::Storage(_) => "storage_error",
        }
    }
}
