//! In-memory Account Store
//!
//! Keeps accounts in insertion order behind a single `RwLock`. Every
//! mutation, including both sides of a transfer, happens under one write
//! guard, which serializes conflicting updates and makes transfers
//! all-or-nothing without any lock ordering concerns.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{Account, AccountQuery, Amount, AmountError, HolderName, SortKey};

use super::{AccountPage, AccountStore, BalanceChange, StoreError, StoreResult, TransferReceipt};

#[derive(Debug, Default)]
struct Accounts {
    rows: Vec<Account>,
    index: HashMap<String, usize>,
}

impl Accounts {
    fn push(&mut self, account: Account) {
        match self.index.get(&account.id) {
            Some(&position) => self.rows[position] = account,
            None => {
                self.index.insert(account.id.clone(), self.rows.len());
                self.rows.push(account);
            }
        }
    }

    fn position(&self, id: &str) -> StoreResult<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

/// Account store backed by process memory
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    inner: RwLock<Accounts>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing accounts, kept in the given order.
    /// An account whose id is already present replaces the earlier one.
    pub fn with_accounts(accounts: impl IntoIterator<Item = Account>) -> Self {
        let mut inner = Accounts::default();
        for account in accounts {
            inner.push(account);
        }
        Self {
            inner: RwLock::new(inner),
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn debit_error(account: &Account, amount: &Amount) -> StoreError {
    StoreError::InsufficientFunds {
        account_id: account.id.clone(),
        required: amount.value(),
        available: account.balance,
    }
}

fn compare(a: &Account, b: &Account, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => a.holder_name.cmp(&b.holder_name),
        SortKey::Balance => a.balance.cmp(&b.balance),
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Account>> {
        let accounts = self.inner.read().await;
        Ok(accounts
            .index
            .get(id)
            .map(|&position| accounts.rows[position].clone()))
    }

    async fn insert(&self, holder_name: &HolderName) -> StoreResult<Account> {
        let account = Account::open(Uuid::new_v4().to_string(), holder_name);
        self.inner.write().await.push(account.clone());
        Ok(account)
    }

    async fn update_balance(&self, id: &str, change: BalanceChange) -> StoreResult<Account> {
        let mut accounts = self.inner.write().await;
        let position = accounts.position(id)?;
        let account = &mut accounts.rows[position];

        let updated = change
            .apply(account.balance()?)
            .map_err(|_| match change {
                BalanceChange::Debit(amount) => debit_error(account, &amount),
                BalanceChange::Credit(_) => StoreError::Amount(AmountError::Overflow),
            })?;
        account.balance = updated.value();

        Ok(account.clone())
    }

    async fn transfer(
        &self,
        sender_id: &str,
        receiver_id: &str,
        amount: Amount,
    ) -> StoreResult<TransferReceipt> {
        let mut accounts = self.inner.write().await;
        let sender_position = accounts.position(sender_id)?;
        let receiver_position = accounts.position(receiver_id)?;

        let sender = &accounts.rows[sender_position];
        let receiver = &accounts.rows[receiver_position];

        // Compute both sides before touching either row
        let sender_balance = sender
            .balance()?
            .debit(&amount)
            .map_err(|_| debit_error(sender, &amount))?;
        let receiver_balance = receiver.balance()?.credit(&amount)?;

        accounts.rows[sender_position].balance = sender_balance.value();
        accounts.rows[receiver_position].balance = receiver_balance.value();

        Ok(TransferReceipt {
            sender: accounts.rows[sender_position].clone(),
            receiver: accounts.rows[receiver_position].clone(),
        })
    }

    async fn query(&self, query: &AccountQuery) -> StoreResult<AccountPage> {
        let accounts = self.inner.read().await;

        let mut matches: Vec<&Account> = accounts
            .rows
            .iter()
            .filter(|account| match &query.name_filter {
                Some(name) => account.holder_name.contains(name.as_str()),
                None => true,
            })
            .collect();

        if let Some(key) = query.sort {
            // sort_by is stable: ties keep insertion order in both directions
            if query.descending {
                matches.sort_by(|a, b| compare(b, a, key));
            } else {
                matches.sort_by(|a, b| compare(a, b, key));
            }
        }

        let total = matches.len() as u64;
        let skip = usize::try_from(query.page.skip()).unwrap_or(usize::MAX);
        let take = usize::try_from(query.page.take()).unwrap_or(usize::MAX);

        let accounts = matches
            .into_iter()
            .skip(skip)
            .take(take)
            .cloned()
            .collect();

        Ok(AccountPage { accounts, total })
    }
}
