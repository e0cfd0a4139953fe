//! Exchange rate tables
//!
//! A `RateTable` maps currency codes to multipliers relative to a base
//! currency. Tables are plain data: the conversion engine only reads them,
//! fetching and caching belong to the rate provider layer.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Problems building a rate table
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RateTableError {
    #[error("rate table JSON is malformed: {0}")]
    Parse(String),

    #[error("rate table has no base currency")]
    MissingBase,

    #[error("rate table has an empty currency code")]
    EmptyCode,

    #[error("rate for {code} must be finite and positive, got {rate}")]
    InvalidRate { code: String, rate: f64 },
}

/// Currency code -> multiplier relative to `base`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRateTable")]
pub struct RateTable {
    base: String,
    rates: BTreeMap<String, f64>,
}

/// Wire shape, e.g. `{"base": "USD", "rates": {"EUR": 0.92}}`
#[derive(Deserialize)]
struct RawRateTable {
    base: String,
    #[serde(default)]
    rates: BTreeMap<String, f64>,
}

impl TryFrom<RawRateTable> for RateTable {
    type Error = RateTableError;

    fn try_from(raw: RawRateTable) -> Result<Self, Self::Error> {
        RateTable::new(raw.base, raw.rates)
    }
}

/// Normalize a currency code ("usd " -> "USD")
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

impl RateTable {
    /// Build a table, normalizing codes and validating every rate
    pub fn new<I, K>(base: impl AsRef<str>, rates: I) -> Result<Self, RateTableError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let base = normalize_code(base.as_ref());
        if base.is_empty() {
            return Err(RateTableError::MissingBase);
        }

        let mut table = RateTable { base, rates: BTreeMap::new() };
        for (code, rate) in rates {
            table.insert(code.as_ref(), rate)?;
        }
        Ok(table)
    }

    /// Parse the exchange-rate API JSON shape
    pub fn from_json(json: &str) -> Result<Self, RateTableError> {
        serde_json::from_str(json).map_err(|e| RateTableError::Parse(e.to_string()))
    }

    /// Insert or replace a single rate
    pub fn insert(&mut self, code: &str, rate: f64) -> Result<(), RateTableError> {
        let code = normalize_code(code);
        if code.is_empty() {
            return Err(RateTableError::EmptyCode);
        }
        if !rate.is_finite() || rate <= 0.0 {
            return Err(RateTableError::InvalidRate { code, rate });
        }
        self.rates.insert(code, rate);
        Ok(())
    }

    /// Base currency code
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Multiplier from the base to `code`. The base itself is always 1.
    pub fn rate(&self, code: &str) -> Option<f64> {
        let code = normalize_code(code);
        if code == self.base {
            return Some(self.rates.get(&code).copied().unwrap_or(1.0));
        }
        self.rates.get(&code).copied()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.rate(code).is_some()
    }

    /// Every code the table can convert to, base included, sorted
    pub fn codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.rates.keys().cloned().collect();
        if !self.rates.contains_key(&self.base) {
            codes.push(self.base.clone());
            codes.sort();
        }
        codes
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Re-express the table relative to another currency it contains
    pub fn rebase(&self, new_base: &str) -> Option<RateTable> {
        let new_base = normalize_code(new_base);
        if new_base == self.base {
            return Some(self.clone());
        }
        let pivot = *self.rates.get(&new_base)?;

        let mut rates: BTreeMap<String, f64> = self.rates.iter()
            .filter(|(code, _)| **code != new_base)
            .map(|(code, rate)| (code.clone(), rate / pivot))
            .collect();
        rates.insert(self.base.clone(), 1.0 / pivot);

        Some(RateTable { base: new_base, rates })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd_table() -> RateTable {
        RateTable::new("USD", [("EUR", 0.5), ("GBP", 0.25), ("JPY", 150.0)]).unwrap()
    }

    #[test]
    fn test_normalizes_codes() {
        let table = RateTable::new(" usd", [("eur", 0.9)]).unwrap();
        assert_eq!(table.base(), "USD");
        assert_eq!(table.rate("EUR"), Some(0.9));
        assert_eq!(table.rate("eur"), Some(0.9));
    }

    #[test]
    fn test_base_rate_is_one() {
        let table = usd_table();
        assert_eq!(table.rate("USD"), Some(1.0));
        assert!(table.contains("usd"));
        assert_eq!(table.rate("ZZZ"), None);
    }

    #[test]
    fn test_rejects_bad_rates() {
        assert!(matches!(
            RateTable::new("USD", [("EUR", 0.0)]),
            Err(RateTableError::InvalidRate { .. })
        ));
        assert!(matches!(
            RateTable::new("USD", [("EUR", f64::NAN)]),
            Err(RateTableError::InvalidRate { .. })
        ));
        assert!(matches!(
            RateTable::new("  ", [("EUR", 1.0)]),
            Err(RateTableError::MissingBase)
        ));
    }

    #[test]
    fn test_rejects_empty_codes() {
        assert_eq!(RateTable::new("USD", [("  ", 1.0)]), Err(RateTableError::EmptyCode));
        assert!(RateTable::from_json(r#"{"base": "USD", "rates": {"": 0.9, "EUR": 0.92}}"#).is_err());

        let mut table = RateTable::new("USD", [("EUR", 0.9)]).unwrap();
        assert_eq!(table.insert("", 2.0), Err(RateTableError::EmptyCode));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_from_json() {
        let json = r#"{"base": "USD", "date": "2024-01-01", "rates": {"EUR": 0.92, "INR": 83.1}}"#;
        let table = RateTable::from_json(json).unwrap();
        assert_eq!(table.base(), "USD");
        assert_eq!(table.rate("INR"), Some(83.1));
        assert_eq!(table.codes(), vec!["EUR", "INR", "USD"]);
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(matches!(RateTable::from_json("not json"), Err(RateTableError::Parse(_))));
        assert!(RateTable::from_json(r#"{"base": "USD", "rates": {"EUR": -1}}"#).is_err());
    }

    #[test]
    fn test_rebase() {
        let eur = usd_table().rebase("eur").unwrap();
        assert_eq!(eur.base(), "EUR");
        assert_eq!(eur.rate("USD"), Some(2.0));
        assert_eq!(eur.rate("GBP"), Some(0.5));
        assert_eq!(eur.rate("JPY"), Some(300.0));
        assert!(usd_table().rebase("ZZZ").is_none());
    }
}
