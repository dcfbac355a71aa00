use hl_core::config::Settings;
use std::fmt;
use std::time::Duration;

pub mod compose;
pub mod fallback;
pub mod models;
pub mod parse;
pub mod prompt;

pub const DEFAULT_TARGET_LANGUAGE: &str = "Simplified Chinese";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model_name: String,
    pub target_language: String,
    pub timeout: Duration,
}

impl Config {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            api_key: settings.rewrite_key.as_ref().map(|r| r.value.clone()),
            base_url: settings.rewrite_base_url.value.clone(),
            model_name: settings.rewrite_model.value.clone(),
            ..Self::default()
        }
    }

    pub fn with_target_language(mut self, language: impl Into<String>) -> Self {
        self.target_language = language.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: hl_core::config::DEFAULT_REWRITE_BASE_URL.to_string(),
            model_name: hl_core::config::DEFAULT_REWRITE_MODEL.to_string(),
            target_language: DEFAULT_TARGET_LANGUAGE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model_name", &self.model_name)
            .field("target_language", &self.target_language)
            .field("timeout", &self.timeout)
            .finish()
    }
}

pub mod prelude {
    pub use super::Config;
    pub use super::compose::compose_rewritten;
    pub use super::fallback::compose_fallback;
    pub use super::models::create_model;
    pub use hl_core::{Article, Error, Result, Rewrite, RewriteService, RewrittenItem};
}

pub use models::create_model;
