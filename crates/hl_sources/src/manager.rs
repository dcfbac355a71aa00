//! Per-request decision table in front of the two upstreams.
//!
//! In order: serve a fresh cache; serve cache (or defaults) once the daily
//! rewrite budget is spent; fetch headlines; keep the cache when the titles
//! did not change; otherwise rewrite (or degrade) and replace the cache.

use chrono::{DateTime, NaiveDate, Utc};
use hl_core::time::TimeLocale;
use hl_core::types::placeholder_items;
use hl_core::{Clock, Error, HeadlineSource, Result, RewriteService, RewrittenItem};
use hl_inference::compose::compose_rewritten;
use hl_inference::fallback::compose_fallback;
use hl_storage::{is_fresh, same_content, CacheEntry, CacheStore};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const NOT_CONFIGURED_REASON: &str = "rewrite service not configured";

#[derive(Debug, Clone)]
pub struct Policy {
    pub ttl: chrono::Duration,
    pub daily_limit: u32,
    pub batch_size: usize,
    pub upstream_timeout: Duration,
    pub locale: TimeLocale,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            ttl: chrono::Duration::minutes(30),
            daily_limit: 50,
            batch_size: 3,
            upstream_timeout: Duration::from_secs(20),
            locale: TimeLocale::default(),
        }
    }
}

/// Which branch of the decision table produced a briefing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    Cached,
    QuotaExhausted,
    Unchanged,
    Rewritten,
    Degraded,
}

#[derive(Debug, Clone)]
pub struct Briefing {
    pub items: Vec<RewrittenItem>,
    pub from_cache: bool,
    pub message: Option<String>,
    pub outcome: Outcome,
}

impl Briefing {
    fn from_entry(entry: &CacheEntry, outcome: Outcome) -> Self {
        Self {
            items: entry.items().to_vec(),
            from_cache: true,
            message: None,
            outcome,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub source: String,
    pub rewrite_service: Option<String>,
    pub quota_used: u32,
    pub quota_limit: u32,
    pub quota_reset_on: NaiveDate,
    pub cache_items: usize,
    pub cache_captured_at: Option<DateTime<Utc>>,
    pub cache_fresh: bool,
    pub ttl_seconds: i64,
}

pub struct HeadlineManager {
    source: Arc<dyn HeadlineSource>,
    rewriter: Option<Arc<dyn RewriteService>>,
    store: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
    policy: Policy,
}

impl HeadlineManager {
    pub fn new(
        source: Arc<dyn HeadlineSource>,
        rewriter: Option<Arc<dyn RewriteService>>,
        store: Arc<dyn CacheStore>,
        clock: Arc<dyn Clock>,
        policy: Policy,
    ) -> Self {
        Self {
            source,
            rewriter,
            store,
            clock,
            policy,
        }
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Runs one request cycle. `Err` only when no news list could be built
    /// at all (missing configuration, headline source failure).
    pub async fn headlines(&self) -> Result<Briefing> {
        let now = self.clock.now();
        let cached = self.store.current().await;

        if is_fresh(cached.as_deref(), now, self.policy.ttl) {
            if let Some(entry) = cached.as_deref() {
                debug!(age_seconds = entry.age(now).num_seconds(), "serving fresh cache");
                return Ok(Briefing::from_entry(entry, Outcome::Cached));
            }
        }

        if self.store.quota_exceeded(now, self.policy.daily_limit).await {
            return Ok(self.quota_exhausted(cached.as_deref()));
        }

        let mut articles = self
            .bounded(self.source.fetch_headlines(), |reason| {
                Error::source_unavailable(None, reason)
            })
            .await?;
        if articles.is_empty() {
            return Err(Error::source_unavailable(None, "headline source returned no articles"));
        }
        articles.truncate(self.policy.batch_size);

        if same_content(&articles, cached.as_deref()) {
            if let Some(entry) = self.store.touch(now).await {
                info!(items = entry.items().len(), "headlines unchanged; cache extended without rewriting");
                return Ok(Briefing::from_entry(&entry, Outcome::Unchanged));
            }
        }

        let locale = self.policy.locale;
        let (items, outcome) = match &self.rewriter {
            None => {
                debug!("rewrite service not configured; degrading");
                (compose_fallback(&articles, NOT_CONFIGURED_REASON, now, locale), Outcome::Degraded)
            }
            Some(rewriter) => {
                if !self.store.try_consume_quota(now, self.policy.daily_limit).await {
                    let latest = self.store.current().await;
                    return Ok(self.quota_exhausted(latest.as_deref()));
                }

                let rewritten = self
                    .bounded(rewriter.rewrite(&articles), Error::RewriteUnavailable)
                    .await
                    .and_then(|rewrites| compose_rewritten(&articles, rewrites, now, locale));

                match rewritten {
                    Ok(items) => {
                        info!(items = items.len(), service = rewriter.name(), "headlines rewritten");
                        (items, Outcome::Rewritten)
                    }
                    Err(e) => {
                        let reason = failure_reason(&e);
                        warn!(%reason, "rewrite failed; serving unprocessed headlines");
                        (compose_fallback(&articles, &reason, now, locale), Outcome::Degraded)
                    }
                }
            }
        };

        let entry = self.store.refresh(items, now).await?;
        Ok(Briefing {
            items: entry.items().to_vec(),
            from_cache: false,
            message: None,
            outcome,
        })
    }

    /// The last good cache, or the placeholder list when there is none.
    pub async fn last_good(&self) -> Vec<RewrittenItem> {
        match self.store.current().await {
            Some(entry) => entry.items().to_vec(),
            None => placeholder_items(),
        }
    }

    pub async fn status(&self) -> StatusReport {
        let now = self.clock.now();
        let quota = self.store.quota(now).await;
        let cached = self.store.current().await;

        StatusReport {
            source: self.source.name().to_string(),
            rewrite_service: self.rewriter.as_ref().map(|r| r.name().to_string()),
            quota_used: quota.used,
            quota_limit: self.policy.daily_limit,
            quota_reset_on: quota.reset_on,
            cache_items: cached.as_ref().map_or(0, |entry| entry.items().len()),
            cache_captured_at: cached.as_ref().map(|entry| entry.captured_at()),
            cache_fresh: is_fresh(cached.as_deref(), now, self.policy.ttl),
            ttl_seconds: self.policy.ttl.num_seconds(),
        }
    }

    fn quota_exhausted(&self, cached: Option<&CacheEntry>) -> Briefing {
        let limit = self.policy.daily_limit;
        info!(limit, has_cache = cached.is_some(), "daily rewrite budget spent");
        let (items, served) = match cached {
            Some(entry) => (entry.items().to_vec(), "cached"),
            None => (placeholder_items(), "default"),
        };
        Briefing {
            items,
            from_cache: true,
            message: Some(format!(
                "Daily limit of {limit} AI rewrites reached; showing {served} headlines until the limit resets at midnight UTC."
            )),
            outcome: Outcome::QuotaExhausted,
        }
    }

    /// Upstream calls never outlive the configured timeout, whatever the adapter.
    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T>>,
        on_timeout: impl FnOnce(String) -> Error,
    ) -> Result<T> {
        let limit = self.policy.upstream_timeout;
        match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => Err(on_timeout(format!("timed out after {limit:?}"))),
        }
    }
}

fn failure_reason(error: &Error) -> String {
    match error {
        Error::RewriteUnavailable(reason) => reason.clone(),
        other => other.to_string(),
    }
}
