//! Ledger Service
//!
//! Validates caller input, enforces the monetary rules and orchestrates the
//! account store and the rate lookup. Every operation returns a
//! `LedgerResult`; input is rejected before any store mutation.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::{
    Account, AccountQuery, Amount, ConvertedBalances, HolderName, LedgerError, LedgerResult,
    PageRequest, PaginationMetadata, SortKey,
};
use crate::rates::{RateError, RateLookup};
use crate::store::{AccountStore, BalanceChange};

use super::{AccountListing, ListAccountsQuery, TransferCommand};

/// Account ledger operations
#[derive(Clone)]
pub struct LedgerService {
    store: Arc<dyn AccountStore>,
    rates: Arc<dyn RateLookup>,
}

impl std::fmt::Debug for LedgerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerService").finish_non_exhaustive()
    }
}

/// Provider statuses meaning a requested currency code was not accepted
const REJECTED_CURRENCY_STATUSES: [u16; 2] = [400, 422];

fn positive_amount(value: Decimal) -> LedgerResult<Amount> {
    Amount::new(value).map_err(|_| LedgerError::NonPositiveAmount(value))
}

/// Split and trim a comma-separated currency list; codes keep their case
fn parse_currency_codes(raw: &str) -> LedgerResult<Vec<String>> {
    let codes: Vec<String> = raw
        .split(',')
        .map(|code| code.trim().to_string())
        .collect();

    if codes.iter().any(String::is_empty) {
        return Err(LedgerError::InvalidCurrency(format!(
            "empty currency code in '{}'",
            raw
        )));
    }

    Ok(codes)
}

/// Only a rejected currency is the caller's fault; quota, auth and
/// server errors on the provider side are upstream failures.
fn map_rate_error(err: RateError) -> LedgerError {
    match err {
        RateError::Rejected { status, message }
            if REJECTED_CURRENCY_STATUSES.contains(&status) =>
        {
            LedgerError::InvalidCurrency(message)
        }
        RateError::Rejected { status, message } if (400..500).contains(&status) => {
            tracing::warn!(status, "Rate lookup refused the request: {}", message);
            LedgerError::UpstreamFailure(message)
        }
        other => {
            tracing::error!("Rate lookup failed: {}", other);
            LedgerError::UpstreamFailure(other.to_string())
        }
    }
}

impl LedgerService {
    pub fn new(store: Arc<dyn AccountStore>, rates: Arc<dyn RateLookup>) -> Self {
        Self { store, rates }
    }

    async fn require_account(&self, id: &str) -> LedgerResult<Account> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound(id.to_string()))
    }

    // =========================================================================
    // CreateAccount
    // =========================================================================

    /// Open an account for `name`, which must read `<First> <Middle> <Last>`
    pub async fn create_account(&self, name: &str) -> LedgerResult<Account> {
        let holder_name = HolderName::parse(name)
            .map_err(|_| LedgerError::InvalidHolderName(name.to_string()))?;

        let account = self.store.insert(&holder_name).await?;
        tracing::info!(account_id = %account.id, "Account created");

        Ok(account)
    }

    // =========================================================================
    // GetAccount
    // =========================================================================

    pub async fn get_account(&self, id: &str) -> LedgerResult<Account> {
        self.require_account(id).await
    }

    // =========================================================================
    // GetAccounts
    // =========================================================================

    /// Filter, sort and paginate accounts.
    ///
    /// The name filter is a case-sensitive substring match. An empty or
    /// absent sort key keeps store order; any other unknown key is rejected.
    pub async fn get_accounts(&self, request: ListAccountsQuery) -> LedgerResult<AccountListing> {
        let sort = match request.sort_by.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(key) => Some(
                key.parse::<SortKey>()
                    .map_err(|_| LedgerError::InvalidSortKey(key.to_string()))?,
            ),
        };

        let name_filter = request
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        let page = PageRequest::new(request.page_number, request.page_size);
        let query = AccountQuery {
            name_filter,
            sort,
            descending: request.is_descending,
            page,
        };

        let result = self.store.query(&query).await?;

        Ok(AccountListing {
            accounts: result.accounts,
            pagination: PaginationMetadata::new(&page, result.total),
        })
    }

    // =========================================================================
    // Deposit
    // =========================================================================

    pub async fn deposit(&self, account_id: &str, amount: Decimal) -> LedgerResult<Account> {
        let amount = positive_amount(amount)?;
        self.require_account(account_id).await?;

        let account = self
            .store
            .update_balance(account_id, BalanceChange::Credit(amount))
            .await?;
        tracing::debug!(account_id, %amount, balance = %account.balance, "Deposit applied");

        Ok(account)
    }

    // =========================================================================
    // Withdraw
    // =========================================================================

    pub async fn withdraw(&self, account_id: &str, amount: Decimal) -> LedgerResult<Account> {
        let amount = positive_amount(amount)?;
        let account = self.require_account(account_id).await?;

        if amount.value() > account.balance {
            return Err(LedgerError::insufficient_funds(amount.value(), account.balance));
        }

        // The store re-checks under its own lock in case of a racing debit
        let account = self
            .store
            .update_balance(account_id, BalanceChange::Debit(amount))
            .await?;
        tracing::debug!(account_id, %amount, balance = %account.balance, "Withdrawal applied");

        Ok(account)
    }

    // =========================================================================
    // Transfer
    // =========================================================================

    /// Move money from sender to receiver; returns the sender's account
    pub async fn transfer(&self, command: TransferCommand) -> LedgerResult<Account> {
        let amount = positive_amount(command.amount)?;

        if command.sender_id == command.receiver_id {
            return Err(LedgerError::SameAccountTransfer);
        }

        let sender = self.require_account(&command.sender_id).await?;
        self.require_account(&command.receiver_id).await?;

        if amount.value() > sender.balance {
            return Err(LedgerError::insufficient_funds(amount.value(), sender.balance));
        }

        let receipt = self
            .store
            .transfer(&command.sender_id, &command.receiver_id, amount)
            .await?;

        tracing::debug!(
            sender_id = %receipt.sender.id,
            receiver_id = %receipt.receiver.id,
            %amount,
            "Transfer applied"
        );

        Ok(receipt.sender)
    }

    // =========================================================================
    // Convert
    // =========================================================================

    /// Convert the account balance into each requested currency.
    ///
    /// All-or-nothing: a single unknown code fails the whole request.
    pub async fn convert(
        &self,
        account_id: &str,
        currency_codes: &str,
    ) -> LedgerResult<ConvertedBalances> {
        let account = self.require_account(account_id).await?;
        let codes = parse_currency_codes(currency_codes)?;

        let rates = self
            .rates
            .get_rates(&codes.join(","))
            .await
            .map_err(map_rate_error)?;

        if let Some(missing) = codes.iter().find(|code| !rates.contains(code)) {
            return Err(LedgerError::InvalidCurrency(format!(
                "no rate returned for {}",
                missing
            )));
        }

        // Providers may answer with more codes than were asked for
        let mut converted = ConvertedBalances::new();
        let requested = rates
            .iter()
            .filter(|(code, _)| codes.iter().any(|c| c.as_str() == *code));
        for (code, rate) in requested {
            let value = account.balance.checked_mul(rate).ok_or_else(|| {
                LedgerError::InvalidCurrency(format!("conversion to {} overflows", code))
            })?;
            converted.push(code, value);
        }

        Ok(converted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;

    #[test]
    fn test_parse_currency_codes() {
        assert_eq!(
            parse_currency_codes(" USD,EUR ,fakeCurrency").unwrap(),
            vec!["USD", "EUR", "fakeCurrency"]
        );
        assert!(matches!(
            parse_currency_codes("USD,,EUR"),
            Err(LedgerError::InvalidCurrency(_))
        ));
        assert!(parse_currency_codes("").is_err());
    }

    #[test]
    fn test_map_rate_error() {
        let err = map_rate_error(RateError::rejected(422, "invalid currency"));
        assert_eq!(err, LedgerError::InvalidCurrency("invalid currency".to_string()));

        for status in [401, 403, 429, 500, 503] {
            let err = map_rate_error(RateError::rejected(status, "nope"));
            assert_eq!(err.kind(), ErrorKind::UpstreamFailure, "status {}", status);
            assert_eq!(err.status_code(), 502);
        }

        let err = map_rate_error(RateError::Decode("not json".to_string()));
        assert!(matches!(err, LedgerError::UpstreamFailure(_)));
    }

    #[test]
    fn test_positive_amount() {
        assert!(positive_amount(Decimal::ONE).is_ok());
        assert_eq!(
            positive_amount(Decimal::ZERO),
            Err(LedgerError::NonPositiveAmount(Decimal::ZERO))
        );
    }
}
