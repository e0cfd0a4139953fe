//! JSON file rate provider

use std::path::{Path, PathBuf};
use async_trait::async_trait;
use metron_core::RateTable;
use tracing::debug;
use crate::provider::rebase_any;
use crate::{RateError, RateProvider};

/// Reads `{"base": "USD", "rates": {...}}` from disk on every fetch.
///
/// Wrap it in a `CachedRateProvider` to avoid re-reading.
#[derive(Debug, Clone)]
pub struct FileRateProvider {
    path: PathBuf,
}

impl FileRateProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RateProvider for FileRateProvider {
    async fn fetch_rates(&self, base: &str) -> Result<RateTable, RateError> {
        let source = self.path.display().to_string();
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| RateError::io(&source, e))?;

        let table = RateTable::from_json(&text)?;
        debug!(path = %source, base = table.base(), codes = table.len(), "loaded rate table");
        rebase_any([&table], base)
    }

    fn name(&self) -> &str {
        "file"
    }
}
