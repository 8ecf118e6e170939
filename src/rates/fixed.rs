//! Rate lookup backed by a static table

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::{CurrencyRates, RateError, RateLookup};

/// Resolves codes from a fixed code→rate table.
///
/// Any code missing from the table rejects the whole request with a 400,
/// mirroring how a provider answers an unknown currency.
#[derive(Debug, Clone, Default)]
pub struct FixedRateLookup {
    rates: HashMap<String, Decimal>,
}

impl FixedRateLookup {
    pub fn new(rates: impl IntoIterator<Item = (String, Decimal)>) -> Self {
        Self {
            rates: rates.into_iter().collect(),
        }
    }

    pub fn with_rate(mut self, currency: impl Into<String>, rate: Decimal) -> Self {
        self.rates.insert(currency.into(), rate);
        self
    }
}

#[async_trait]
impl RateLookup for FixedRateLookup {
    async fn get_rates(&self, currency_codes: &str) -> Result<CurrencyRates, RateError> {
        let mut rates = CurrencyRates::new();
        for code in currency_codes.split(',').map(str::trim) {
            let rate = self.rates.get(code).ok_or_else(|| {
                RateError::rejected(400, "Could not find requested conversion rate")
            })?;
            if !rates.contains(code) {
                rates.push(code, *rate);
            }
        }

        Ok(rates)
    }
}
