//! Ledger Service module
//!
//! The account business-logic layer: validation, monetary invariants,
//! search and conversion orchestration.

mod commands;
mod ledger;


pub use commands::*;
pub use ledger::LedgerService;
