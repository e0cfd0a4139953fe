//! Call context

use metron_core::{RateTable, DISPLAY_PRECISION};

/// Per-call context passed to tools
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Decimal places for display values
    pub precision: u32,
    /// Exchange rates fetched for this call, if any
    pub rates: Option<RateTable>,
}

impl ToolContext {
    pub fn new() -> Self {
        Self {
            precision: DISPLAY_PRECISION,
            rates: None,
        }
    }

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_rates(mut self, rates: RateTable) -> Self {
        self.rates = Some(rates);
        self
    }
}

impl Default for ToolContext {
    fn default() -> Self {
        Self::new()
    }
}
