use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use hl_core::{Result, RewrittenItem};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::RwLock;
use tracing::{debug, info};
use crate::{CacheEntry, CacheStore, QuotaState};

/// Keeps everything for the lifetime of the process.
#[derive(Debug)]
pub struct MemoryCacheStore {
    entry: RwLock<Option<Arc<CacheEntry>>>,
    quota: Mutex<QuotaState>,
}

impl MemoryCacheStore {
    pub fn new(today: NaiveDate) -> Self {
        Self::with_quota(QuotaState::new(today))
    }

    pub fn with_quota(quota: QuotaState) -> Self {
        Self {
            entry: RwLock::new(None),
            quota: Mutex::new(quota),
        }
    }

    fn with_quota_state<T>(&self, f: impl FnOnce(&mut QuotaState) -> T) -> T {
        let mut quota = self.quota.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut quota)
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn current(&self) -> Option<Arc<CacheEntry>> {
        self.entry.read().await.clone()
    }

    async fn refresh(&self, items: Vec<RewrittenItem>, now: DateTime<Utc>) -> Result<Arc<CacheEntry>> {
        let entry = Arc::new(CacheEntry::new(items, now)?);
        *self.entry.write().await = Some(entry.clone());
        debug!(items = entry.items().len(), captured_at = %now, "cache refreshed");
        Ok(entry)
    }

    async fn touch(&self, now: DateTime<Utc>) -> Option<Arc<CacheEntry>> {
        let mut slot = self.entry.write().await;
        let touched = Arc::new(slot.as_ref()?.restamped(now));
        *slot = Some(touched.clone());
        Some(touched)
    }

    async fn quota_exceeded(&self, now: DateTime<Utc>, limit: u32) -> bool {
        self.with_quota_state(|quota| {
            let before = quota.reset_on;
            let exceeded = quota.exceeded(now, limit);
            if quota.reset_on != before {
                info!(day = %quota.reset_on, "daily rewrite budget reset");
            }
            exceeded
        })
    }

    async fn try_consume_quota(&self, now: DateTime<Utc>, limit: u32) -> bool {
        self.with_quota_state(|quota| {
            let consumed = quota.try_consume(now, limit);
            debug!(used = quota.used, limit, consumed, "rewrite budget reservation");
            consumed
        })
    }

    async fn quota(&self, now: DateTime<Utc>) -> QuotaState {
        self.with_quota_state(|quota| {
            quota.roll_over(now.date_naive());
            *quota
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use hl_core::DEGRADED_CATEGORY;

    fn item(title: &str) -> RewrittenItem {
        RewrittenItem {
            id: 1,
            title: title.to_string(),
            source: "Wire".to_string(),
            time: "just now".to_string(),
            summary: String::new(),
            commentary: String::new(),
            category: DEGRADED_CATEGORY.to_string(),
            url: String::new(),
            image: None,
            original_title: title.to_string(),
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[tokio::test]
    async fn refresh_replaces_and_touch_restamps() {
        let t0 = Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2026, 10, 18, 10, 0, 0).unwrap();
        let store = MemoryCacheStore::new(day(18));

        assert!(store.current().await.is_none());
        assert!(store.touch(t1).await.is_none());

        store.refresh(vec![item("A")], t0).await.unwrap();
        let first = store.current().await.unwrap();
        assert_eq!(first.captured_at(), t0);

        let touched = store.touch(t1).await.unwrap();
        assert_eq!(touched.captured_at(), t1);
        assert_eq!(touched.items(), first.items());
        // the earlier snapshot is untouched
        assert_eq!(first.captured_at(), t0);

        store.refresh(vec![item("B")], t1).await.unwrap();
        assert_eq!(store.current().await.unwrap().items()[0].original_title, "B");
    }

    #[tokio::test]
    async fn empty_refresh_keeps_previous_entry() {
        let t0 = Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap();
        let store = MemoryCacheStore::new(day(18));
        store.refresh(vec![item("A")], t0).await.unwrap();

        assert!(store.refresh(vec![], t0).await.is_err());
        assert_eq!(store.current().await.unwrap().items().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_reservations_never_exceed_limit() {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap();
        let store = Arc::new(MemoryCacheStore::new(day(18)));

        let handles: Vec<_> = (0..64)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.try_consume_quota(now, 10).await })
            })
            .collect();

        let mut granted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                granted += 1;
            }
        }
        assert_eq!(granted, 10);
        assert_eq!(store.quota(now).await.used, 10);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn day_boundary_resets_exactly_once_under_load() {
        let midnight = Utc.with_ymd_and_hms(2026, 10, 18, 0, 0, 0).unwrap();
        let store = Arc::new(MemoryCacheStore::with_quota(QuotaState {
            used: 10,
            reset_on: day(17),
        }));

        let handles: Vec<_> = (0..64)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    store.quota_exceeded(midnight, 10).await;
                    store.try_consume_quota(midnight, 10).await
                })
            })
            .collect();

        let mut granted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                granted += 1;
            }
        }
        // a second reset would have handed out more than one day's budget
        assert_eq!(granted, 10);
        let quota = store.quota(midnight).await;
        assert_eq!(quota.used, 10);
        assert_eq!(quota.reset_on, day(18));
    }
}
