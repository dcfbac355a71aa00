use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category label carried by items that were not rewritten.
pub const DEGRADED_CATEGORY: &str = "Unprocessed";

/// A headline as returned by the headline source, already normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub description: String,
    pub source: String,
    pub published_at: DateTime<Utc>,
    pub url: String,
    pub image_url: Option<String>,
}

/// One element of the rewrite service's structured answer, aligned by
/// position with the article batch it was asked about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rewrite {
    pub title: String,
    pub summary: String,
    pub commentary: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewrittenItem {
    /// 1-based position in the batch.
    pub id: usize,
    pub title: String,
    pub source: String,
    pub time: String,
    pub summary: String,
    pub commentary: String,
    pub category: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Title of the article this item was built from. Change detection key.
    pub original_title: String,
}

impl RewrittenItem {
    pub fn is_degraded(&self) -> bool {
        self.category == DEGRADED_CATEGORY
    }
}

/// Served when there is neither a cache nor a fresh batch to show.
pub fn placeholder_items() -> Vec<RewrittenItem> {
    vec![RewrittenItem {
        id: 1,
        title: "Business headlines are temporarily unavailable".to_string(),
        source: "Headlines".to_string(),
        time: "just now".to_string(),
        summary: "The latest business news could not be loaded. Please try again shortly."
            .to_string(),
        commentary: "No market commentary is available right now.".to_string(),
        category: DEGRADED_CATEGORY.to_string(),
        url: String::new(),
        image: None,
        original_title: String::new(),
    }]
}
