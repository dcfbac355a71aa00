use chrono::{DateTime, Utc};
use hl_core::time::{relative_time, TimeLocale};
use hl_core::{Article, Error, Result, Rewrite, RewrittenItem};

/// Pairs each article with its rewrite. Refuses to pair batches of different
/// lengths rather than dropping the tail.
pub fn compose_rewritten(
    articles: &[Article],
    rewrites: Vec<Rewrite>,
    now: DateTime<Utc>,
    locale: TimeLocale,
) -> Result<Vec<RewrittenItem>> {
    if rewrites.len() != articles.len() {
        return Err(Error::RewriteUnavailable(format!(
            "rewrite returned {} entries for {} articles",
            rewrites.len(),
            articles.len()
        )));
    }

    Ok(articles
        .iter()
        .zip(rewrites)
        .enumerate()
        .map(|(i, (article, rewrite))| RewrittenItem {
            id: i + 1,
            title: rewrite.title,
            source: article.source.clone(),
            time: relative_time(article.published_at, now, locale),
            summary: rewrite.summary,
            commentary: rewrite.commentary,
            category: rewrite.category,
            url: article.url.clone(),
            image: article.image_url.clone(),
            original_title: article.title.clone(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn article(title: &str, published_at: DateTime<Utc>) -> Article {
        Article {
            title: title.to_string(),
            description: String::new(),
            source: "Bloomberg".to_string(),
            published_at,
            url: format!("https://news.example.com/{title}"),
            image_url: Some("https://img.example.com/1.jpg".to_string()),
        }
    }

    fn rewrite(title: &str) -> Rewrite {
        Rewrite {
            title: title.to_string(),
            summary: "summary".to_string(),
            commentary: "commentary".to_string(),
            category: "Banks".to_string(),
        }
    }

    #[test]
    fn keeps_article_metadata_and_original_titles() {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap();
        let articles = vec![article("A", now - Duration::hours(2)), article("B", now)];
        let items = compose_rewritten(
            &articles,
            vec![rewrite("甲"), rewrite("乙")],
            now,
            TimeLocale::English,
        )
        .unwrap();

        assert_eq!(items[0].id, 1);
        assert_eq!(items[1].id, 2);
        assert_eq!(items[0].title, "甲");
        assert_eq!(items[0].original_title, "A");
        assert_eq!(items[1].original_title, "B");
        assert_eq!(items[0].time, "2 hours ago");
        assert_eq!(items[0].source, "Bloomberg");
        assert_eq!(items[0].image.as_deref(), Some("https://img.example.com/1.jpg"));
        assert!(!items[0].is_degraded());
    }

    #[test]
    fn mismatched_lengths_are_an_error() {
        let now = Utc::now();
        let articles = vec![article("A", now), article("B", now)];
        let err = compose_rewritten(&articles, vec![rewrite("甲")], now, TimeLocale::English)
            .unwrap_err();
        assert!(matches!(err, Error::RewriteUnavailable(_)));
    }
}
