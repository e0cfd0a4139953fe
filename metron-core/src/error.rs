//! Conversion errors
//!
//! `ConversionError` is what the engine returns. `ErrorReport` is the
//! structured, serializable form handed to clients: a stable code, a
//! message, and an optional suggestion for fixing the request.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::Category;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const UNKNOWN_CATEGORY: &str = "UNKNOWN_CATEGORY";
    pub const UNKNOWN_UNIT: &str = "UNKNOWN_UNIT";
    pub const UNIT_CATEGORY_MISMATCH: &str = "UNIT_CATEGORY_MISMATCH";
    pub const NON_FINITE_VALUE: &str = "NON_FINITE_VALUE";
    pub const RATE_UNAVAILABLE: &str = "RATE_UNAVAILABLE";
    pub const UNSUPPORTED_OPERATION: &str = "UNSUPPORTED_OPERATION";
    pub const INVALID_EXPRESSION: &str = "INVALID_EXPRESSION";
    pub const INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Errors produced while resolving a conversion
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("unknown {category} unit: {unit}")]
    UnknownUnit { category: Category, unit: String },

    /// `unit` exists, but in `actual` rather than `category`
    #[error("{unit} is a {actual} unit, not a {category} unit")]
    UnitCategoryMismatch {
        category: Category,
        unit: String,
        actual: Category,
    },

    #[error("{stage} value is not finite: {value}")]
    NonFiniteValue { value: f64, stage: &'static str },

    #[error("no exchange rate from {base} to {code}")]
    RateUnavailable { base: String, code: String },

    #[error("{operation} is not supported for {category}")]
    UnsupportedOperation {
        category: Category,
        operation: &'static str,
    },

    #[error("invalid conversion expression: {0}")]
    InvalidExpression(String),
}

impl ConversionError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            ConversionError::UnknownCategory(_) => codes::UNKNOWN_CATEGORY,
            ConversionError::UnknownUnit { .. } => codes::UNKNOWN_UNIT,
            ConversionError::UnitCategoryMismatch { .. } => codes::UNIT_CATEGORY_MISMATCH,
            ConversionError::NonFiniteValue { .. } => codes::NON_FINITE_VALUE,
            ConversionError::RateUnavailable { .. } => codes::RATE_UNAVAILABLE,
            ConversionError::UnsupportedOperation { .. } => codes::UNSUPPORTED_OPERATION,
            ConversionError::InvalidExpression(_) => codes::INVALID_EXPRESSION,
        }
    }

    pub fn non_finite_input(value: f64) -> Self {
        ConversionError::NonFiniteValue { value, stage: "input" }
    }

    pub fn non_finite_result(value: f64) -> Self {
        ConversionError::NonFiniteValue { value, stage: "result" }
    }

    pub fn rate_unavailable(base: impl Into<String>, code: impl Into<String>) -> Self {
        ConversionError::RateUnavailable { base: base.into(), code: code.into() }
    }
}

/// Structured error for client consumption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    /// Extra context (offending argument, similar names, ...)
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub notes: Vec<String>,
}

impl ErrorReport {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
            notes: Vec::new(),
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Builder: add context note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn missing_arg(tool: &str, arg: &str) -> Self {
        Self::new(codes::INVALID_ARGUMENT, format!("{}: missing argument '{}'", tool, arg))
            .with_suggestion("Use tools/list to see the expected arguments")
    }

    pub fn arg_type(tool: &str, arg: &str, expected: &str) -> Self {
        Self::new(codes::INVALID_ARGUMENT, format!("{}: argument '{}' must be {}", tool, arg, expected))
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self::new(codes::INTERNAL, format!("Internal error: {}", details.into()))
    }
}

impl std::fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(s) = &self.suggestion {
            write!(f, " ({})", s)?;
        }
        Ok(())
    }
}

impl From<&ConversionError> for ErrorReport {
    fn from(err: &ConversionError) -> Self {
        let report = ErrorReport::new(err.code(), err.to_string());
        match err {
            ConversionError::UnknownCategory(_) => report.with_suggestion(format!(
                "Valid categories: {}",
                Category::ALL.iter().map(|c| c.name()).collect::<Vec<_>>().join(", ")
            )),
            ConversionError::UnknownUnit { category, .. } => report
                .with_suggestion(format!("Use list_units(\"{}\") for valid units", category.slug())),
            ConversionError::UnitCategoryMismatch { actual, .. } => report
                .with_suggestion(format!("Convert it under the {} category instead", actual)),
            ConversionError::NonFiniteValue { .. } => report
                .with_suggestion("Provide a finite number"),
            ConversionError::RateUnavailable { .. } => report
                .with_suggestion("Check the currency code or refresh the rate table"),
            ConversionError::UnsupportedOperation { .. } => report,
            ConversionError::InvalidExpression(_) => report
                .with_suggestion("Use the form \"<value> <unit> to <unit>\", e.g. \"100 km to mi\""),
        }
    }
}

impl From<ConversionError> for ErrorReport {
    fn from(err: ConversionError) -> Self {
        ErrorReport::from(&err)
    }
}
