//! Rate provider trait and in-memory providers

use async_trait::async_trait;
use metron_core::{normalize_code, RateTable};
use crate::RateError;

/// Source of exchange rate tables.
///
/// Implementations may do I/O; the conversion engine never calls them
/// directly. Callers fetch a table and hand it to the resolver.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Rates relative to `base`
    async fn fetch_rates(&self, base: &str) -> Result<RateTable, RateError>;

    /// Short label for logs
    fn name(&self) -> &str {
        "rates"
    }
}

/// Find a stored table that can be expressed relative to `base`
pub(crate) fn rebase_any<'a, I>(tables: I, base: &str) -> Result<RateTable, RateError>
where
    I: IntoIterator<Item = &'a RateTable>,
{
    let base = normalize_code(base);
    tables.into_iter()
        .find_map(|t| t.rebase(&base))
        .ok_or(RateError::UnknownBase(base))
}

/// Fixed, in-memory rate tables
#[derive(Debug, Clone, Default)]
pub struct StaticRateProvider {
    tables: Vec<RateTable>,
}

impl StaticRateProvider {
    pub fn new(tables: Vec<RateTable>) -> Self {
        Self { tables }
    }

    pub fn from_table(table: RateTable) -> Self {
        Self { tables: vec![table] }
    }

    /// Indicative USD rates, used when no rate source is configured.
    /// Not suitable for anything that needs today's prices.
    pub fn builtin() -> Result<Self, RateError> {
        let table = RateTable::new("USD", [
            ("EUR", 0.92),
            ("GBP", 0.79),
            ("INR", 83.2),
            ("JPY", 149.5),
            ("AUD", 1.52),
            ("CAD", 1.36),
            ("CHF", 0.88),
            ("CNY", 7.24),
        ])?;
        Ok(Self::from_table(table))
    }

    pub fn tables(&self) -> &[RateTable] {
        &self.tables
    }
}

#[async_trait]
impl RateProvider for StaticRateProvider {
    async fn fetch_rates(&self, base: &str) -> Result<RateTable, RateError> {
        rebase_any(&self.tables, base)
    }

    fn name(&self) -> &str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> StaticRateProvider {
        StaticRateProvider::from_table(
            RateTable::new("USD", [("EUR", 0.5), ("JPY", 150.0)]).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_fetch_stored_base() {
        let table = provider().fetch_rates("USD").await.unwrap();
        assert_eq!(table.base(), "USD");
        assert_eq!(table.rate("EUR"), Some(0.5));
    }

    #[tokio::test]
    async fn test_fetch_derived_base() {
        let table = provider().fetch_rates("eur").await.unwrap();
        assert_eq!(table.base(), "EUR");
        assert_eq!(table.rate("USD"), Some(2.0));
        assert_eq!(table.rate("JPY"), Some(300.0));
    }

    #[tokio::test]
    async fn test_fetch_unknown_base() {
        let err = provider().fetch_rates("ZZZ").await.unwrap_err();
        assert_eq!(err, RateError::UnknownBase("ZZZ".to_string()));
    }

    #[tokio::test]
    async fn test_builtin_covers_fallback_currencies() {
        let table = StaticRateProvider::builtin().unwrap().fetch_rates("USD").await.unwrap();
        for code in ["USD", "EUR", "GBP", "INR", "JPY"] {
            assert!(table.contains(code), "{code}");
        }
    }

    #[tokio::test]
    async fn test_empty_provider() {
        let err = StaticRateProvider::default().fetch_rates("USD").await.unwrap_err();
        assert!(matches!(err, RateError::UnknownBase(_)));
    }
}
