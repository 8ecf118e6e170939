//! Currency conversion result

use rust_decimal::Decimal;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Balance converted into several currencies.
///
/// Entries keep the order in which the rate lookup reported them and
/// serialize as a JSON object in that order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConvertedBalances(Vec<(String, Decimal)>);

impl ConvertedBalances {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, currency: impl Into<String>, value: Decimal) {
        self.0.push((currency.into(), value));
    }

    pub fn get(&self, currency: &str) -> Option<Decimal> {
        self.0
            .iter()
            .find(|(code, _)| code == currency)
            .map(|(_, value)| *value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.0.iter().map(|(code, value)| (code.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for ConvertedBalances {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (code, value) in &self.0 {
            map.serialize_entry(code, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_serializes_in_insertion_order() {
        let mut converted = ConvertedBalances::new();
        converted.push("USD", dec!(2));
        converted.push("EUR", dec!(1.5));
        converted.push("CAD", dec!(3));

        let json = serde_json::to_string(&converted).unwrap();
        assert_eq!(json, r#"{"USD":"2","EUR":"1.5","CAD":"3"}"#);
    }

    #[test]
    fn test_lookup_by_code() {
        let mut converted = ConvertedBalances::new();
        converted.push("USD", dec!(2));

        assert_eq!(converted.get("USD"), Some(dec!(2)));
        assert_eq!(converted.get("EUR"), None);
        assert_eq!(converted.len(), 1);
    }
}
