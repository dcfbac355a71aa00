use async_trait::async_trait;
use hl_core::{Article, Error, Result, Rewrite, RewriteService};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};
use url::Url;
use crate::parse::parse_rewrites;
use crate::prompt::{batch_prompt, system_prompt};
use crate::Config;

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: Option<String>,
}

/// Any OpenAI-compatible `/chat/completions` endpoint (DeepSeek by default).
pub struct ChatRewriter {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
    target_language: String,
}

impl ChatRewriter {
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| Error::Config("rewrite API key is required".to_string()))?;
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            api_key,
            endpoint: format!("{}/chat/completions", normalize_base_url(&config.base_url)?),
            model: config.model_name.clone(),
            target_language: config.target_language.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl fmt::Debug for ChatRewriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatRewriter")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish()
    }
}

/// Trims trailing slashes and makes sure the path carries a version segment
/// (`/v1`, `/v1beta`, ...), appending `/v1` when it does not.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).map_err(|e| Error::InvalidUrl(format!("{trimmed}: {e}")))?;

    let has_version = url
        .path_segments()
        .map(|mut segments| segments.any(is_version_segment))
        .unwrap_or(false);

    if has_version {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{trimmed}/v1"))
    }
}

fn is_version_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    chars.next() == Some('v') && chars.next().is_some_and(|c| c.is_ascii_digit())
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{head}...")
    }
}

#[async_trait]
impl RewriteService for ChatRewriter {
    fn name(&self) -> &str {
        "chat-completions"
    }

    async fn rewrite(&self, articles: &[Article]) -> Result<Vec<Rewrite>> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt(&self.target_language),
                },
                ChatMessage {
                    role: "user",
                    content: batch_prompt(articles, &self.target_language),
                },
            ],
            temperature: 0.7,
        };

        debug!(endpoint = %self.endpoint, articles = articles.len(), "sending rewrite batch");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::RewriteUnavailable(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "rewrite service returned an error status");
            return Err(Error::RewriteUnavailable(format!(
                "status {}: {}",
                status.as_u16(),
                truncate(body.trim(), 200)
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::RewriteUnavailable(format!("failed to parse response body: {e}")))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| Error::RewriteUnavailable("response carried no message content".to_string()))?;

        parse_rewrites(&content, articles.len()).map_err(|e| Error::RewriteUnavailable(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn articles(n: usize) -> Vec<Article> {
        (1..=n)
            .map(|i| Article {
                title: format!("Headline {i}"),
                description: format!("Description {i}"),
                source: "Wire".to_string(),
                published_at: Utc::now(),
                url: format!("https://news.example.com/{i}"),
                image_url: None,
            })
            .collect()
    }

    fn rewriter(server: &MockServer) -> ChatRewriter {
        ChatRewriter::new(&Config {
            api_key: Some("test-key".to_string()),
            base_url: server.uri(),
            ..Config::default()
        })
        .unwrap()
    }

    fn completion(content: &str) -> serde_json::Value {
        json!({
            "id": "chatcmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
        })
    }

    fn rewrites_json(n: usize) -> String {
        let entries: Vec<_> = (1..=n)
            .map(|i| json!({"title": format!("标题{i}"), "summary": "摘要", "commentary": "点评", "category": "金融"}))
            .collect();
        serde_json::to_string(&entries).unwrap()
    }

    #[test]
    fn base_url_normalization() {
        assert_eq!(
            normalize_base_url("https://api.deepseek.com").unwrap(),
            "https://api.deepseek.com/v1"
        );
        assert_eq!(
            normalize_base_url("https://api.openai.com/v1/").unwrap(),
            "https://api.openai.com/v1"
        );
        assert_eq!(
            normalize_base_url("https://gateway.example.com/v1beta/openai//").unwrap(),
            "https://gateway.example.com/v1beta/openai"
        );
        assert_eq!(
            normalize_base_url("https://proxy.example.com/llm").unwrap(),
            "https://proxy.example.com/llm/v1"
        );
        assert!(normalize_base_url("not a url").is_err());
    }

    #[tokio::test]
    async fn rewrites_a_fenced_batch_in_one_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(&format!(
                "```json\n{}\n```",
                rewrites_json(3)
            ))))
            .expect(1)
            .mount(&server)
            .await;

        let rewrites = rewriter(&server).rewrite(&articles(3)).await.unwrap();
        assert_eq!(rewrites.len(), 3);
        assert_eq!(rewrites[2].title, "标题3");
    }

    #[tokio::test]
    async fn error_status_is_rewrite_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(402).set_body_string("Insufficient Balance"))
            .mount(&server)
            .await;

        let err = rewriter(&server).rewrite(&articles(3)).await.unwrap_err();
        assert!(matches!(err, Error::RewriteUnavailable(_)));
        assert!(err.to_string().contains("402"));
        assert!(err.to_string().contains("Insufficient Balance"));
    }

    #[tokio::test]
    async fn non_json_body_is_a_parse_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let err = rewriter(&server).rewrite(&articles(2)).await.unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }

    #[tokio::test]
    async fn prose_content_is_a_parse_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("Here are your headlines!")))
            .mount(&server)
            .await;

        let err = rewriter(&server).rewrite(&articles(2)).await.unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }

    #[tokio::test]
    async fn short_answers_are_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(&rewrites_json(2))))
            .mount(&server)
            .await;

        let err = rewriter(&server).rewrite(&articles(3)).await.unwrap_err();
        assert!(err.to_string().contains("2 entries for 3 articles"));
    }

    #[test]
    fn debug_output_redacts_the_key() {
        let model = ChatRewriter::new(&Config {
            api_key: Some("sk-very-secret".to_string()),
            ..Config::default()
        })
        .unwrap();
        let debug = format!("{model:?}");
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("https://api.deepseek.com/v1/chat/completions"));
    }
}
