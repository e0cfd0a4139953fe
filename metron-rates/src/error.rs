//! Rate provider errors

use metron_core::RateTableError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RateError {
    /// Source could not be read
    #[error("failed to read rates from {source_name}: {message}")]
    Io { source_name: String, message: String },

    /// Source was read but is not a rate table
    #[error("failed to parse rate table: {0}")]
    Parse(String),

    /// No table can be expressed relative to this currency
    #[error("no rates available for base currency {0}")]
    UnknownBase(String),

    #[error("invalid rate table: {0}")]
    InvalidTable(String),
}

impl RateError {
    pub fn io(source_name: impl Into<String>, err: impl std::fmt::Display) -> Self {
        RateError::Io {
            source_name: source_name.into(),
            message: err.to_string(),
        }
    }

    /// Worth retrying: the same request might succeed later
    pub fn is_transient(&self) -> bool {
        matches!(self, RateError::Io { .. })
    }
}

impl From<RateTableError> for RateError {
    fn from(err: RateTableError) -> Self {
        match err {
            RateTableError::Parse(msg) => RateError::Parse(msg),
            other => RateError::InvalidTable(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient() {
        assert!(RateError::io("rates.json", "connection reset").is_transient());
        assert!(!RateError::Parse("eof".into()).is_transient());
        assert!(!RateError::UnknownBase("ZZZ".into()).is_transient());
    }

    #[test]
    fn test_from_table_error() {
        assert!(matches!(RateError::from(RateTableError::Parse("x".into())), RateError::Parse(_)));
        assert!(matches!(RateError::from(RateTableError::MissingBase), RateError::InvalidTable(_)));
        assert_eq!(
            RateError::from(RateTableError::EmptyCode),
            RateError::InvalidTable("rate table has an empty currency code".into())
        );
    }

    #[test]
    fn test_message() {
        let err = RateError::io("rates.json", "not found");
        assert_eq!(err.to_string(), "failed to read rates from rates.json: not found");
    }
}
