//! Account Store
//!
//! Persistence contract consumed by the ledger service, with an in-memory
//! and a PostgreSQL implementation.
//!
//! Every implementation must make single-account balance changes
//! linearizable and must apply both sides of a transfer so that no reader
//! ever observes only one side committed.

mod error;
mod memory;
mod postgres;

use async_trait::async_trait;

use crate::domain::{Account, AccountQuery, Amount, AmountError, Balance, HolderName};

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryAccountStore;
pub use postgres::PgAccountStore;

/// A single-account balance change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceChange {
    Credit(Amount),
    Debit(Amount),
}

impl BalanceChange {
    /// Apply the change, refusing to produce a negative balance
    pub fn apply(&self, balance: Balance) -> Result<Balance, AmountError> {
        match self {
            BalanceChange::Credit(amount) => balance.credit(amount),
            BalanceChange::Debit(amount) => balance.debit(amount),
        }
    }

    pub fn amount(&self) -> Amount {
        match self {
            BalanceChange::Credit(amount) | BalanceChange::Debit(amount) => *amount,
        }
    }

    /// Signed delta to add to the stored balance
    pub fn delta(&self) -> rust_decimal::Decimal {
        match self {
            BalanceChange::Credit(amount) => amount.value(),
            BalanceChange::Debit(amount) => -amount.value(),
        }
    }
}

/// Both accounts after a committed transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    pub sender: Account,
    pub receiver: Account,
}

/// One page of a query plus the total number of matches
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccountPage {
    pub accounts: Vec<Account>,
    pub total: u64,
}

/// Account persistence abstraction
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Look up an account by identifier
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Account>>;

    /// Insert a new account with a store-assigned identifier and zero balance
    async fn insert(&self, holder_name: &HolderName) -> StoreResult<Account>;

    /// Atomically apply a balance change to one account
    async fn update_balance(&self, id: &str, change: BalanceChange) -> StoreResult<Account>;

    /// Atomically move `amount` from sender to receiver
    async fn transfer(
        &self,
        sender_id: &str,
        receiver_id: &str,
        amount: Amount,
    ) -> StoreResult<TransferReceipt>;

    /// Filter, sort and paginate accounts
    async fn query(&self, query: &AccountQuery) -> StoreResult<AccountPage>;
}
