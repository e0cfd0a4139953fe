//! Metron Rates - exchange rate providers
//!
//! The conversion engine never fetches rates itself. Providers here supply
//! a `RateTable` that callers pass to the resolver:
//! - `StaticRateProvider`: fixed in-memory tables
//! - `FileRateProvider`: JSON file in the common exchange-rate API shape
//! - `CachedRateProvider`: per-base TTL cache and retry around either

mod error;
mod provider;
mod file;
mod cached;

pub use error::RateError;
pub use provider::{RateProvider, StaticRateProvider};
pub use file::FileRateProvider;
pub use cached::{CachedRateProvider, DEFAULT_BACKOFF, DEFAULT_RETRIES, DEFAULT_TTL};
