//! Command and query definitions
//!
//! Inputs to the ledger service as received from callers, before
//! validation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{Account, PaginationMetadata, DEFAULT_PAGE_SIZE};

// =========================================================================
// ListAccountsQuery
// =========================================================================

/// Raw listing request: optional name filter, optional sort key,
/// direction and page coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListAccountsQuery {
    pub name: Option<String>,
    pub sort_by: Option<String>,
    pub is_descending: bool,
    pub page_number: i64,
    pub page_size: i64,
}

impl ListAccountsQuery {
    pub fn new() -> Self {
        Self {
            name: None,
            sort_by: None,
            is_descending: false,
            page_number: 1,
            page_size: i64::from(DEFAULT_PAGE_SIZE),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn sorted_by(mut self, sort_by: impl Into<String>) -> Self {
        self.sort_by = Some(sort_by.into());
        self
    }

    pub fn descending(mut self) -> Self {
        self.is_descending = true;
        self
    }

    pub fn page(mut self, page_number: i64, page_size: i64) -> Self {
        self.page_number = page_number;
        self.page_size = page_size;
        self
    }
}

impl Default for ListAccountsQuery {
    fn default() -> Self {
        Self::new()
    }
}

/// One page of accounts plus its pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountListing {
    pub accounts: Vec<Account>,
    pub pagination: PaginationMetadata,
}

// =========================================================================
// TransferCommand
// =========================================================================

/// Command to move money between two accounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferCommand {
    pub amount: Decimal,
    pub sender_id: String,
    pub receiver_id: String,
}

impl TransferCommand {
    pub fn new(amount: Decimal, sender_id: impl Into<String>, receiver_id: impl Into<String>) -> Self {
        Self {
            amount,
            sender_id: sender_id.into(),
            receiver_id: receiver_id.into(),
        }
    }
}
