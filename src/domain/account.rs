//! Account entity
//!
//! An account is identified by an opaque string assigned by the store,
//! carries a holder name of the form `<First> <Middle> <Last>` and a
//! non-negative balance.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{AmountError, Balance};

/// Account as returned by every ledger operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub holder_name: String,
    pub balance: Decimal,
}

impl Account {
    /// A freshly opened account with a zero balance
    pub fn open(id: impl Into<String>, holder_name: &HolderName) -> Self {
        Self {
            id: id.into(),
            holder_name: holder_name.to_string(),
            balance: Decimal::ZERO,
        }
    }

    /// Current balance as a validated domain value
    pub fn balance(&self) -> Result<Balance, AmountError> {
        Balance::new(self.balance)
    }
}

/// Holder name with exactly three whitespace-separated tokens.
///
/// Surrounding whitespace is trimmed and inner runs of whitespace are
/// collapsed to a single space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolderName(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Holder name must have exactly three parts, got {parts}")]
pub struct HolderNameError {
    pub parts: usize,
}

impl HolderName {
    pub const PARTS: usize = 3;

    pub fn parse(raw: &str) -> Result<Self, HolderNameError> {
        let parts: Vec<&str> = raw.split_whitespace().collect();
        if parts.len() != Self::PARTS {
            return Err(HolderNameError { parts: parts.len() });
        }

        Ok(Self(parts.join(" ")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HolderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_holder_name_three_parts() {
        let name = HolderName::parse("Ryan L Yuncza").unwrap();
        assert_eq!(name.as_str(), "Ryan L Yuncza");
    }

    #[test]
    fn test_holder_name_normalizes_whitespace() {
        let name = HolderName::parse("  Foo \t F   Foobert ").unwrap();
        assert_eq!(name.as_str(), "Foo F Foobert");
    }

    #[test]
    fn test_holder_name_wrong_part_count() {
        assert_eq!(HolderName::parse("invalid"), Err(HolderNameError { parts: 1 }));
        assert_eq!(HolderName::parse("Foo Foobert"), Err(HolderNameError { parts: 2 }));
        assert_eq!(
            HolderName::parse("Foo F G Foobert"),
            Err(HolderNameError { parts: 4 })
        );
        assert_eq!(HolderName::parse("   "), Err(HolderNameError { parts: 0 }));
    }

    #[test]
    fn test_open_account_starts_at_zero() {
        let name = HolderName::parse("Qux Q Quxson").unwrap();
        let account = Account::open("0", &name);

        assert_eq!(account.id, "0");
        assert_eq!(account.holder_name, "Qux Q Quxson");
        assert_eq!(account.balance, Decimal::ZERO);
    }

    #[test]
    fn test_account_serializes_snake_case() {
        let name = HolderName::parse("Qux Q Quxson").unwrap();
        let json = serde_json::to_value(Account::open("abc", &name)).unwrap();

        assert_eq!(json["id"], "abc");
        assert_eq!(json["holder_name"], "Qux Q Quxson");
        assert_eq!(json["balance"], "0");
    }
}
