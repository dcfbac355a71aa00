//! Terminal degradation path: items built straight from the articles.

use chrono::{DateTime, Utc};
use hl_core::time::{relative_time, TimeLocale};
use hl_core::{Article, RewrittenItem, DEGRADED_CATEGORY};

pub const COMMENTARY_PREFIX: &str = "AI commentary unavailable";

/// One item per article, untranslated, with `reason` shown in the commentary.
pub fn compose_fallback(
    articles: &[Article],
    reason: &str,
    now: DateTime<Utc>,
    locale: TimeLocale,
) -> Vec<RewrittenItem> {
    articles
        .iter()
        .enumerate()
        .map(|(i, article)| RewrittenItem {
            id: i + 1,
            title: article.title.clone(),
            source: article.source.clone(),
            time: relative_time(article.published_at, now, locale),
            summary: if article.description.trim().is_empty() {
                article.title.clone()
            } else {
                article.description.clone()
            },
            commentary: format!("{COMMENTARY_PREFIX}: {reason}"),
            category: DEGRADED_CATEGORY.to_string(),
            url: article.url.clone(),
            image: article.image_url.clone(),
            original_title: article.title.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn one_item_per_article_with_reason_visible() {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap();
        let articles: Vec<Article> = (1..=4)
            .map(|n| Article {
                title: format!("Headline {n}"),
                description: if n == 2 { String::new() } else { format!("Story {n}") },
                source: "Reuters".to_string(),
                published_at: now,
                url: format!("https://news.example.com/{n}"),
                image_url: None,
            })
            .collect();

        let items = compose_fallback(&articles, "rewrite service not configured", now, TimeLocale::English);

        assert_eq!(items.len(), articles.len());
        for (i, (item, article)) in items.iter().zip(&articles).enumerate() {
            assert_eq!(item.id, i + 1);
            assert_eq!(item.original_title, article.title);
            assert_eq!(item.title, article.title);
            assert_eq!(item.category, DEGRADED_CATEGORY);
            assert!(item.commentary.contains("rewrite service not configured"));
        }
        assert_eq!(items[0].summary, "Story 1");
        assert_eq!(items[1].summary, "Headline 2");
    }

    #[test]
    fn empty_batch_yields_empty_output() {
        assert!(compose_fallback(&[], "n/a", Utc::now(), TimeLocale::English).is_empty());
    }
}
