//! Metron Core - Fundamental types
//!
//! This crate provides the core types used throughout Metron:
//! - `Category`: the families of commensurable units and their strategy
//! - `RateTable`: exchange rates handed in by a rate provider
//! - `ConversionError`: what the engine returns when a request is invalid
//! - `ErrorReport`: structured errors for client consumption

mod category;
mod error;
mod number;
mod rates;

pub use category::{Category, Strategy};
pub use error::{ConversionError, ErrorReport, codes};
pub use number::{
    approx_eq, ensure_finite, format_value, round_to,
    DISPLAY_PRECISION, ROUND_TRIP_TOLERANCE,
};
pub use rates::{RateTable, RateTableError, normalize_code};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Category, Strategy, RateTable, ConversionError, ErrorReport};
    pub use crate::error::codes;
}

#[cfg(test)]
mod tests {
    use super::*;

    mod number_tests {
        use super::*;

        #[test]
        fn test_ensure_finite() {
            assert_eq!(ensure_finite(-40.0), Ok(-40.0));
            assert!(matches!(
                ensure_finite(f64::NAN),
                Err(ConversionError::NonFiniteValue { stage: "input", .. })
            ));
            assert!(ensure_finite(f64::INFINITY).is_err());
            assert!(ensure_finite(f64::NEG_INFINITY).is_err());
        }

        #[test]
        fn test_round_to() {
            assert_eq!(round_to(1.23456789, 6), 1.234568);
            assert_eq!(round_to(0.1 + 0.2, 6), 0.3);
            assert_eq!(round_to(-0.0000001, 6), 0.0);
            assert_eq!(round_to(1e300, 6), 1e300);
        }

        #[test]
        fn test_approx_eq() {
            assert!(approx_eq(1000.0, 1000.0000000001, ROUND_TRIP_TOLERANCE));
            assert!(!approx_eq(1000.0, 1000.1, ROUND_TRIP_TOLERANCE));
            assert!(approx_eq(0.0, 1e-12, ROUND_TRIP_TOLERANCE));
        }

        #[test]
        fn test_format_value() {
            assert_eq!(format_value(1000.0, 6), "1000");
            assert_eq!(format_value(62.137119223733, 6), "62.137119");
            assert_eq!(format_value(0.5, 6), "0.5");
        }
    }

    mod error_tests {
        use super::*;

        #[test]
        fn test_error_codes() {
            let err = ConversionError::UnknownCategory("Luminosity".into());
            assert_eq!(err.code(), codes::UNKNOWN_CATEGORY);

            let err = ConversionError::rate_unavailable("USD", "ZZZ");
            assert_eq!(err.code(), codes::RATE_UNAVAILABLE);
            assert_eq!(err.to_string(), "no exchange rate from USD to ZZZ");
        }

        #[test]
        fn test_mismatch_message() {
            let err = ConversionError::UnitCategoryMismatch {
                category: Category::Length,
                unit: "Kilogram".into(),
                actual: Category::Weight,
            };
            assert_eq!(err.to_string(), "Kilogram is a Weight unit, not a Length unit");
        }

        #[test]
        fn test_report_from_error() {
            let err = ConversionError::UnknownUnit {
                category: Category::Length,
                unit: "Furlong".into(),
            };
            let report = ErrorReport::from(&err);
            assert_eq!(report.code, codes::UNKNOWN_UNIT);
            assert!(report.message.contains("Furlong"));
            assert!(report.suggestion.unwrap().contains("length"));
        }

        #[test]
        fn test_report_builder() {
            let report = ErrorReport::missing_arg("convert", "value")
                .with_note("got 3 of 4 arguments");
            assert_eq!(report.code, codes::INVALID_ARGUMENT);
            assert_eq!(report.notes.len(), 1);
            assert!(report.to_string().starts_with("[INVALID_ARGUMENT]"));
        }

        #[test]
        fn test_report_serialization() {
            let report = ErrorReport::new(codes::INTERNAL, "boom");
            let json = serde_json::to_value(&report).unwrap();
            assert_eq!(json["code"], "INTERNAL");
            assert!(json.get("suggestion").is_none());
            assert!(json.get("notes").is_none());
        }
    }
}
