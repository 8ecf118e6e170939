//! PostgreSQL Account Store
//!
//! Single-account changes are one conditional `UPDATE`, so concurrent
//! deposits and withdrawals on the same row are serialized by the row lock.
//! Transfers lock both rows with `SELECT ... FOR UPDATE ORDER BY id` inside
//! one transaction; the fixed lock order keeps crossing transfers from
//! deadlocking.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use crate::domain::{Account, AccountQuery, Amount, HolderName, SortKey};

use super::{AccountPage, AccountStore, BalanceChange, StoreError, StoreResult, TransferReceipt};

type AccountRow = (String, String, Decimal);

fn into_account((id, holder_name, balance): AccountRow) -> Account {
    Account {
        id,
        holder_name,
        balance,
    }
}

/// Account store backed by the `accounts` table
#[derive(Debug, Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn current_balance(&self, id: &str) -> StoreResult<Option<Decimal>> {
        let balance = sqlx::query_scalar("SELECT balance FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(balance)
    }

    async fn apply_delta(
        tx: &mut Transaction<'_, Postgres>,
        id: &str,
        delta: Decimal,
    ) -> StoreResult<Account> {
        let row: AccountRow = sqlx::query_as(
            r#"
            UPDATE accounts
            SET balance = balance + $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, holder_name, balance
            "#,
        )
        .bind(id)
        .bind(delta)
        .fetch_one(&mut **tx)
        .await?;

        Ok(into_account(row))
    }
}

/// Append the name filter shared by the count and page queries
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, query: &AccountQuery) {
    if let Some(name) = &query.name_filter {
        // strpos is case-sensitive and needs no LIKE escaping
        builder
            .push(" WHERE strpos(holder_name, ")
            .push_bind(name.clone())
            .push(") > 0");
    }
}

fn order_clause(query: &AccountQuery) -> &'static str {
    match (query.sort, query.descending) {
        (None, _) => " ORDER BY seq",
        (Some(SortKey::Name), false) => r#" ORDER BY holder_name COLLATE "C" ASC, seq"#,
        (Some(SortKey::Name), true) => r#" ORDER BY holder_name COLLATE "C" DESC, seq"#,
        (Some(SortKey::Balance), false) => " ORDER BY balance ASC, seq",
        (Some(SortKey::Balance), true) => " ORDER BY balance DESC, seq",
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Account>> {
        let row: Option<AccountRow> =
            sqlx::query_as("SELECT id, holder_name, balance FROM accounts WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(into_account))
    }

    async fn insert(&self, holder_name: &HolderName) -> StoreResult<Account> {
        let row: AccountRow = sqlx::query_as(
            r#"
            INSERT INTO accounts (id, holder_name, balance)
            VALUES ($1, $2, 0)
            RETURNING id, holder_name, balance
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(holder_name.as_str())
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Inserted account {}", row.0);

        Ok(into_account(row))
    }

    async fn update_balance(&self, id: &str, change: BalanceChange) -> StoreResult<Account> {
        let row: Option<AccountRow> = sqlx::query_as(
            r#"
            UPDATE accounts
            SET balance = balance + $2, updated_at = NOW()
            WHERE id = $1 AND balance + $2 >= 0
            RETURNING id, holder_name, balance
            "#,
        )
        .bind(id)
        .bind(change.delta())
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            return Ok(into_account(row));
        }

        // Nothing updated: either the row is missing or the guard refused it
        match self.current_balance(id).await? {
            None => Err(StoreError::NotFound(id.to_string())),
            Some(available) => Err(StoreError::InsufficientFunds {
                account_id: id.to_string(),
                required: change.amount().value(),
                available,
            }),
        }
    }

    async fn transfer(
        &self,
        sender_id: &str,
        receiver_id: &str,
        amount: Amount,
    ) -> StoreResult<TransferReceipt> {
        let mut tx = self.pool.begin().await?;

        let locked: Vec<AccountRow> = sqlx::query_as(
            r#"
            SELECT id, holder_name, balance
            FROM accounts
            WHERE id = ANY($1)
            ORDER BY id
            FOR UPDATE
            "#,
        )
        .bind(vec![sender_id.to_string(), receiver_id.to_string()])
        .fetch_all(&mut *tx)
        .await?;

        let sender_balance = locked
            .iter()
            .find(|(id, _, _)| id == sender_id)
            .map(|(_, _, balance)| *balance)
            .ok_or_else(|| StoreError::NotFound(sender_id.to_string()))?;
        if !locked.iter().any(|(id, _, _)| id == receiver_id) {
            return Err(StoreError::NotFound(receiver_id.to_string()));
        }

        if sender_balance < amount.value() {
            return Err(StoreError::InsufficientFunds {
                account_id: sender_id.to_string(),
                required: amount.value(),
                available: sender_balance,
            });
        }

        let sender = Self::apply_delta(&mut tx, sender_id, -amount.value()).await?;
        let receiver = Self::apply_delta(&mut tx, receiver_id, amount.value()).await?;

        tx.commit().await?;

        tracing::debug!(
            "Transfer committed: {} -> {} ({})",
            sender_id,
            receiver_id,
            amount
        );

        Ok(TransferReceipt { sender, receiver })
    }

    async fn query(&self, query: &AccountQuery) -> StoreResult<AccountPage> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM accounts");
        push_filter(&mut count, query);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select =
            QueryBuilder::<Postgres>::new("SELECT id, holder_name, balance FROM accounts");
        push_filter(&mut select, query);
        select.push(order_clause(query));
        select
            .push(" LIMIT ")
            .push_bind(i64::try_from(query.page.take()).unwrap_or(i64::MAX))
            .push(" OFFSET ")
            .push_bind(i64::try_from(query.page.skip()).unwrap_or(i64::MAX));

        let rows: Vec<AccountRow> = select.build_query_as().fetch_all(&self.pool).await?;

        Ok(AccountPage {
            accounts: rows.into_iter().map(into_account).collect(),
            total: u64::try_from(total).unwrap_or_default(),
        })
    }
}
