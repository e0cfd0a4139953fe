//! Caching, retrying wrapper around another provider

use std::collections::HashMap;
use std::time::{Duration, Instant};
use async_trait::async_trait;
use metron_core::{normalize_code, RateTable};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use crate::{RateError, RateProvider};

pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);
pub const DEFAULT_RETRIES: u32 = 2;
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(200);

struct CacheEntry {
    fetched_at: Instant,
    table: RateTable,
}

/// Keeps one table per base currency for `ttl`, and retries transient
/// failures of the inner provider with linear backoff.
pub struct CachedRateProvider<P> {
    inner: P,
    ttl: Duration,
    retries: u32,
    backoff: Duration,
    cache: Mutex<HashMap<String, CacheEntry>>,
}

impl<P: RateProvider> CachedRateProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            ttl: DEFAULT_TTL,
            retries: DEFAULT_RETRIES,
            backoff: DEFAULT_BACKOFF,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Extra attempts after the first failure
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Delay before retry `n` is `backoff * n`
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Drop a cached table so the next fetch goes to the source
    pub async fn invalidate(&self, base: &str) {
        self.cache.lock().await.remove(&normalize_code(base));
    }

    pub async fn clear(&self) {
        self.cache.lock().await.clear();
    }

    async fn cached(&self, base: &str) -> Option<RateTable> {
        let cache = self.cache.lock().await;
        cache.get(base)
            .filter(|entry| entry.fetched_at.elapsed() < self.ttl)
            .map(|entry| entry.table.clone())
    }

    async fn fetch_with_retry(&self, base: &str) -> Result<RateTable, RateError> {
        let mut attempt = 0;
        loop {
            match self.inner.fetch_rates(base).await {
                Ok(table) => return Ok(table),
                Err(e) if e.is_transient() && attempt < self.retries => {
                    attempt += 1;
                    let delay = self.backoff * attempt;
                    warn!(
                        provider = self.inner.name(),
                        base,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "rate fetch failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl<P: RateProvider> RateProvider for CachedRateProvider<P> {
    async fn fetch_rates(&self, base: &str) -> Result<RateTable, RateError> {
        let base = normalize_code(base);
        if let Some(table) = self.cached(&base).await {
            debug!(base = %base, "rate table served from cache");
            return Ok(table);
        }

        let table = self.fetch_with_retry(&base).await?;
        self.cache.lock().await.insert(base.clone(), CacheEntry {
            fetched_at: Instant::now(),
            table: table.clone(),
        });
        debug!(provider = self.inner.name(), base = %base, "rate table cached");
        Ok(table)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
