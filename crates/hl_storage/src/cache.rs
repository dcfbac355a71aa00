use chrono::{DateTime, Duration, Utc};
use hl_core::{Article, Error, Result, RewrittenItem};
use serde::Serialize;

/// A complete result set and the moment it was captured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    items: Vec<RewrittenItem>,
    captured_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(items: Vec<RewrittenItem>, captured_at: DateTime<Utc>) -> Result<Self> {
        if items.is_empty() {
            return Err(Error::Storage("refusing to cache an empty result set".to_string()));
        }
        Ok(Self { items, captured_at })
    }

    pub fn items(&self) -> &[RewrittenItem] {
        &self.items
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.captured_at)
    }

    /// Same items, new capture time.
    pub fn restamped(&self, now: DateTime<Utc>) -> Self {
        Self {
            items: self.items.clone(),
            captured_at: now,
        }
    }
}

pub fn is_fresh(entry: Option<&CacheEntry>, now: DateTime<Utc>, ttl: Duration) -> bool {
    entry.is_some_and(|entry| entry.age(now) < ttl)
}

/// Position-by-position title comparison. A reordering counts as a change.
pub fn same_content(articles: &[Article], entry: Option<&CacheEntry>) -> bool {
    let Some(entry) = entry else {
        return false;
    };

    articles.len() == entry.items.len()
        && articles
            .iter()
            .zip(&entry.items)
            .all(|(article, item)| article.title == item.original_title)
}
