//! Currency Rate Lookup
//!
//! Resolves a comma-separated list of currency codes to conversion rates.

mod fixed;
mod http;

use async_trait::async_trait;
use rust_decimal::Decimal;

pub use fixed::FixedRateLookup;
pub use http::HttpRateLookup;

/// Rates in the order the lookup reported them
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CurrencyRates(Vec<(String, Decimal)>);

impl CurrencyRates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, currency: impl Into<String>, rate: Decimal) {
        self.0.push((currency.into(), rate));
    }

    pub fn contains(&self, currency: &str) -> bool {
        self.0.iter().any(|(code, _)| code == currency)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.0.iter().map(|(code, rate)| (code.as_str(), *rate))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Decimal)> for CurrencyRates {
    fn from_iter<I: IntoIterator<Item = (String, Decimal)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Errors reported by a rate lookup
#[derive(Debug, thiserror::Error)]
pub enum RateError {
    /// The rate provider answered with a non-success status
    #[error("Rate lookup rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The provider could not be reached
    #[error("Rate lookup transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a body we could not read
    #[error("Rate lookup returned an unreadable body: {0}")]
    Decode(String),
}

impl RateError {
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }
}

/// Currency rate lookup abstraction
#[async_trait]
pub trait RateLookup: Send + Sync {
    /// Look up rates for a comma-separated list of currency codes.
    ///
    /// Either every code resolves or the whole call fails.
    async fn get_rates(&self, currency_codes: &str) -> Result<CurrencyRates, RateError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_currency_rates_keep_order() {
        let rates: CurrencyRates = vec![
            ("USD".to_string(), dec!(1)),
            ("EUR".to_string(), dec!(0.9)),
        ]
        .into_iter()
        .collect();

        let codes: Vec<&str> = rates.iter().map(|(code, _)| code).collect();
        assert_eq!(codes, vec!["USD", "EUR"]);
        assert!(rates.contains("EUR"));
        assert!(!rates.contains("eur"));
    }

    #[test]
    fn test_rejected_message() {
        let err = RateError::rejected(422, "invalid currency");
        assert_eq!(
            err.to_string(),
            "Rate lookup rejected the request (422): invalid currency"
        );
    }
}
