//! account_ledger Library
//!
//! Re-exports modules for integration testing and external use.

pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod rates;
pub mod service;
pub mod store;

pub use config::Config;
pub use domain::{Account, Amount, AmountError, Balance, LedgerError, LedgerResult, OperationContext};
pub use error::AppError;
pub use service::LedgerService;
