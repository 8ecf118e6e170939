//! Domain module
//!
//! Core domain types and business rules.

pub mod account;
pub mod amount;
pub mod context;
pub mod conversion;
pub mod error;
pub mod query;

pub use account::{Account, HolderName, HolderNameError};
pub use amount::{Amount, AmountError, Balance};
pub use context::OperationContext;
pub use conversion::ConvertedBalances;
pub use error::{ErrorKind, LedgerError, LedgerResult};
pub use query::{AccountQuery, PageRequest, PaginationMetadata, SortKey, UnknownSortKey, DEFAULT_PAGE_SIZE};
