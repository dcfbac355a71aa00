//! Coarse "how long ago" labels for publication timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeLocale {
    #[default]
    English,
    Chinese,
}

impl TimeLocale {
    /// Picks the wording that matches the language items are rewritten into.
    pub fn for_language(target_language: &str) -> Self {
        let lower = target_language.trim().to_lowercase();
        if lower.contains("chinese") || lower.starts_with("zh") || lower.contains('中') {
            Self::Chinese
        } else {
            Self::English
        }
    }
}

/// Buckets: under an hour, under a day, under a week, then the calendar date.
/// Timestamps in the future are treated as "just now".
pub fn relative_time(published: DateTime<Utc>, now: DateTime<Utc>, locale: TimeLocale) -> String {
    let age = now.signed_duration_since(published);
    let hours = age.num_hours();
    let days = age.num_days();

    match locale {
        TimeLocale::English => {
            if hours < 1 {
                "just now".to_string()
            } else if hours < 24 {
                format!("{} {} ago", hours, if hours == 1 { "hour" } else { "hours" })
            } else if days < 7 {
                format!("{} {} ago", days, if days == 1 { "day" } else { "days" })
            } else {
                published.format("%b %-d, %Y").to_string()
            }
        }
        TimeLocale::Chinese => {
            if hours < 1 {
                "刚刚".to_string()
            } else if hours < 24 {
                format!("{hours}小时前")
            } else if days < 7 {
                format!("{days}天前")
            } else {
                published.format("%Y年%-m月%-d日").to_string()
            }
        }
    }
}
