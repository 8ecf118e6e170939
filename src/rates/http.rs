//! HTTP currency rate client
//!
//! Talks to a freecurrencyapi-compatible endpoint:
//! `GET {base}/v1/latest?apikey=...&currencies=USD,EUR` answering
//! `{ "data": { "USD": 1.0, "EUR": 0.92 } }`.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::{CurrencyRates, RateError, RateLookup};

/// Rate lookup over HTTP
#[derive(Debug, Clone)]
pub struct HttpRateLookup {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

/// Body of a successful `latest` call. `Map` keeps document order.
#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    data: Map<String, Value>,
}

/// Error body some providers send alongside a 4xx
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: String,
}

impl HttpRateLookup {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, RateError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key,
        })
    }

    fn latest_url(&self) -> String {
        format!("{}/v1/latest", self.base_url.trim_end_matches('/'))
    }
}

/// Parse a numeric rate without going through binary floating point
fn parse_rate(code: &str, value: &Value) -> Result<Decimal, RateError> {
    let text = match value {
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.clone(),
        other => {
            return Err(RateError::Decode(format!(
                "rate for {} is not a number: {}",
                code, other
            )))
        }
    };

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|e| RateError::Decode(format!("rate for {}: {}", code, e)))
}

/// Parse the body of a successful `latest` call
pub(crate) fn parse_latest_rates(body: &str) -> Result<CurrencyRates, RateError> {
    let response: LatestRatesResponse =
        serde_json::from_str(body).map_err(|e| RateError::Decode(e.to_string()))?;

    response
        .data
        .iter()
        .map(|(code, value)| Ok((code.clone(), parse_rate(code, value)?)))
        .collect()
}

#[async_trait]
impl RateLookup for HttpRateLookup {
    async fn get_rates(&self, currency_codes: &str) -> Result<CurrencyRates, RateError> {
        let mut request = self
            .client
            .get(self.latest_url())
            .query(&[("currencies", currency_codes)]);
        if let Some(api_key) = &self.api_key {
            request = request.query(&[("apikey", api_key.as_str())]);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.message)
                .unwrap_or_else(|_| {
                    status
                        .canonical_reason()
                        .unwrap_or("rate lookup failed")
                        .to_string()
                });
            tracing::warn!(
                status = status.as_u16(),
                currencies = currency_codes,
                "Rate lookup rejected: {}",
                message
            );
            return Err(RateError::rejected(status.as_u16(), message));
        }

        parse_latest_rates(&body)
    }
}
