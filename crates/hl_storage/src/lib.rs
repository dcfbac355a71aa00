use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hl_core::{Error, Result, RewrittenItem};
use std::sync::Arc;

pub mod backends;
pub mod cache;
pub mod quota;

pub use backends::*;
pub use cache::{is_fresh, same_content, CacheEntry};
pub use quota::QuotaState;

/// Process-wide cached results plus the daily rewrite budget.
///
/// Implementations must make `try_consume_quota` a single atomic
/// check-and-increment, and must never hold a lock across upstream I/O.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// The current entry, if any. Callers get a shared snapshot.
    async fn current(&self) -> Option<Arc<CacheEntry>>;

    /// Replaces the entry wholesale.
    async fn refresh(&self, items: Vec<RewrittenItem>, now: DateTime<Utc>) -> Result<Arc<CacheEntry>>;

    /// Restamps the current entry without changing its items.
    async fn touch(&self, now: DateTime<Utc>) -> Option<Arc<CacheEntry>>;

    /// Rolls the budget over on a new day, then reports whether it is spent.
    async fn quota_exceeded(&self, now: DateTime<Utc>, limit: u32) -> bool;

    /// Takes one unit of budget if any is left.
    async fn try_consume_quota(&self, now: DateTime<Utc>, limit: u32) -> bool;

    /// Budget snapshot, rolled over to `now`'s day first.
    async fn quota(&self, now: DateTime<Utc>) -> QuotaState;
}

pub fn create_store(kind: &str, now: DateTime<Utc>) -> Result<Arc<dyn CacheStore>> {
    match kind {
        "memory" => Ok(Arc::new(MemoryCacheStore::new(now.date_naive()))),
        other => Err(Error::Config(format!(
            "unknown cache store '{other}'; available: memory"
        ))),
    }
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_store, CacheEntry, CacheStore, QuotaState};
}
