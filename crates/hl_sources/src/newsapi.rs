use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hl_core::{Article, Error, HeadlineSource, Result};
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};
use url::{Host, Url};

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2";

/// Marker the upstream puts on articles that were taken down.
const REMOVED_MARKER: &str = "[Removed]";

#[derive(Clone)]
pub struct SourceConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub category: String,
    pub language: String,
    pub country: Option<String>,
    pub batch_size: usize,
    pub timeout: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            category: "business".to_string(),
            language: "en".to_string(),
            country: None,
            batch_size: 3,
            timeout: Duration::from_secs(20),
        }
    }
}

impl fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceConfig")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("category", &self.category)
            .field("language", &self.language)
            .field("country", &self.country)
            .field("batch_size", &self.batch_size)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TopHeadlines {
    status: String,
    #[serde(default)]
    articles: Vec<RawArticle>,
    code: Option<String>,
    message: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArticle {
    #[serde(default)]
    source: RawSource,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    url_to_image: Option<String>,
    published_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Default)]
struct RawSource {
    name: Option<String>,
}

/// NewsAPI-style `top-headlines` client. One request per call, no retries.
pub struct NewsApiSource {
    client: Client,
    config: SourceConfig,
    endpoint: Url,
}

impl NewsApiSource {
    pub fn new(config: SourceConfig) -> Result<Self> {
        let endpoint = top_headlines_url(&config.base_url)?;
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("headlines/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            config,
            endpoint,
        })
    }

    fn request_url(&self) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("category", &self.config.category)
                .append_pair("language", &self.config.language)
                // headroom for entries dropped during normalization
                .append_pair("pageSize", &(self.config.batch_size * 2).to_string());
            if let Some(country) = &self.config.country {
                query.append_pair("country", country);
            }
        }
        url
    }
}

impl fmt::Debug for NewsApiSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiSource")
            .field("client", &"<reqwest::Client>")
            .field("config", &self.config)
            .finish()
    }
}

/// Secure transport only, loopback excepted.
fn top_headlines_url(base_url: &str) -> Result<Url> {
    let base = base_url.trim().trim_end_matches('/');
    let url = Url::parse(&format!("{base}/top-headlines"))
        .map_err(|e| Error::InvalidUrl(format!("{base}: {e}")))?;

    let loopback = match url.host() {
        Some(Host::Domain(domain)) => domain == "localhost",
        Some(Host::Ipv4(ip)) => ip.is_loopback(),
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    };
    if url.scheme() != "https" && !loopback {
        return Err(Error::Config(format!(
            "headline source must be reached over https, got {}",
            url.scheme()
        )));
    }
    Ok(url)
}

fn normalize(raw: Vec<RawArticle>, limit: usize) -> Vec<Article> {
    raw.into_iter()
        .filter_map(|article| {
            let title = article.title?.trim().to_string();
            if title.is_empty() || title == REMOVED_MARKER {
                return None;
            }
            let url = article.url.filter(|u| !u.trim().is_empty())?;
            let description = article
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty() && d != REMOVED_MARKER)
                .unwrap_or_else(|| title.clone());
            Some(Article {
                title,
                description,
                source: article.source.name.unwrap_or_else(|| "Unknown".to_string()),
                published_at: article.published_at?,
                url,
                image_url: article.url_to_image.filter(|u| !u.trim().is_empty()),
            })
        })
        .take(limit)
        .collect()
}

#[async_trait]
impl HeadlineSource for NewsApiSource {
    fn name(&self) -> &str {
        "newsapi"
    }

    async fn fetch_headlines(&self) -> Result<Vec<Article>> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            Error::Config("missing headline source API key".to_string())
        })?;

        let url = self.request_url();
        debug!(endpoint = %self.endpoint, category = %self.config.category, "fetching headlines");

        let response = self
            .client
            .get(url)
            .header("X-Api-Key", api_key)
            .send()
            .await
            .map_err(|e| Error::source_unavailable(None, format!("request failed: {e}")))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::source_unavailable(Some(status), format!("failed to read body: {e}")))?;

        let parsed: TopHeadlines = serde_json::from_str(&body).map_err(|e| {
            Error::source_unavailable(Some(status), format!("failed to parse response: {e}"))
        })?;

        if !(200..300).contains(&status) || parsed.status != "ok" {
            let message = match (parsed.code, parsed.message) {
                (Some(code), Some(message)) => format!("{code}: {message}"),
                (None, Some(message)) => message,
                (Some(code), None) => code,
                (None, None) => format!("upstream status '{}'", parsed.status),
            };
            warn!(status, %message, "headline source rejected the request");
            return Err(Error::source_unavailable(Some(status), message));
        }

        let articles = normalize(parsed.articles, self.config.batch_size);
        if articles.is_empty() {
            return Err(Error::source_unavailable(Some(status), "no articles returned"));
        }
        debug!(count = articles.len(), "headlines fetched");
        Ok(articles)
    }
}
