//! Explicit, ordered resolution of upstream credentials and endpoints.
//!
//! Each setting lists the environment variables it may come from. The first
//! one holding a non-empty value wins and its name is kept as the setting's
//! source, so operators can see which variable is actually in effect.

use serde::Serialize;
use crate::{Error, Result};

pub const HEADLINE_KEY_VARS: &[&str] = &["NEWS_API_KEY", "NEWSAPI_KEY"];
pub const REWRITE_KEY_VARS: &[&str] = &["REWRITE_API_KEY", "DEEPSEEK_API_KEY", "OPENAI_API_KEY"];
pub const REWRITE_BASE_URL_VARS: &[&str] = &["REWRITE_BASE_URL", "DEEPSEEK_BASE_URL", "OPENAI_BASE_URL"];
pub const REWRITE_MODEL_VARS: &[&str] = &["REWRITE_MODEL", "DEEPSEEK_MODEL", "OPENAI_MODEL"];

pub const DEFAULT_REWRITE_BASE_URL: &str = "https://api.deepseek.com";
pub const DEFAULT_REWRITE_MODEL: &str = "deepseek-chat";

/// Marks a value that came from a built-in default rather than the environment.
pub const DEFAULT_SOURCE: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolved {
    pub value: String,
    pub source: &'static str,
}

impl Resolved {
    pub fn default_value(value: &str) -> Self {
        Self {
            value: value.to_string(),
            source: DEFAULT_SOURCE,
        }
    }
}

/// Returns the first candidate with a non-empty (after trimming) value.
pub fn resolve<F>(candidates: &'static [&'static str], lookup: F) -> Option<Resolved>
where
    F: Fn(&str) -> Option<String>,
{
    candidates.iter().copied().find_map(|name| {
        lookup(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(|value| Resolved { value, source: name })
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub headline_key: Option<Resolved>,
    pub rewrite_key: Option<Resolved>,
    pub rewrite_base_url: Resolved,
    pub rewrite_model: Resolved,
}

/// One line of `Settings::report`, safe to print or serve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingReport {
    pub name: &'static str,
    pub source: Option<&'static str>,
    pub value: Option<String>,
    pub candidates: &'static [&'static str],
}

impl Settings {
    pub fn from_env() -> Self {
        Self::resolve_with(|name| std::env::var(name).ok())
    }

    pub fn resolve_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            headline_key: resolve(HEADLINE_KEY_VARS, &lookup),
            rewrite_key: resolve(REWRITE_KEY_VARS, &lookup),
            rewrite_base_url: resolve(REWRITE_BASE_URL_VARS, &lookup)
                .unwrap_or_else(|| Resolved::default_value(DEFAULT_REWRITE_BASE_URL)),
            rewrite_model: resolve(REWRITE_MODEL_VARS, &lookup)
                .unwrap_or_else(|| Resolved::default_value(DEFAULT_REWRITE_MODEL)),
        }
    }

    pub fn require_headline_key(&self) -> Result<&str> {
        self.headline_key
            .as_ref()
            .map(|resolved| resolved.value.as_str())
            .ok_or_else(|| {
                Error::Config(format!(
                    "missing headline source API key; set one of {}",
                    HEADLINE_KEY_VARS.join(", ")
                ))
            })
    }

    pub fn rewrite_configured(&self) -> bool {
        self.rewrite_key.is_some()
    }

    /// Every setting with where it came from. Keys are redacted.
    pub fn report(&self) -> Vec<SettingReport> {
        vec![
            secret_report("headline_key", HEADLINE_KEY_VARS, self.headline_key.as_ref()),
            secret_report("rewrite_key", REWRITE_KEY_VARS, self.rewrite_key.as_ref()),
            plain_report("rewrite_base_url", REWRITE_BASE_URL_VARS, &self.rewrite_base_url),
            plain_report("rewrite_model", REWRITE_MODEL_VARS, &self.rewrite_model),
        ]
    }
}

fn secret_report(
    name: &'static str,
    candidates: &'static [&'static str],
    resolved: Option<&Resolved>,
) -> SettingReport {
    SettingReport {
        name,
        source: resolved.map(|r| r.source),
        value: resolved.map(|r| redact(&r.value)),
        candidates,
    }
}

fn plain_report(name: &'static str, candidates: &'static [&'static str], resolved: &Resolved) -> SettingReport {
    SettingReport {
        name,
        source: Some(resolved.source),
        value: Some(resolved.value.clone()),
        candidates,
    }
}

/// Keeps at most the first four characters of a secret.
pub fn redact(secret: &str) -> String {
    let shown: String = secret.chars().take(4).collect();
    if secret.chars().count() <= 8 {
        "****".to_string()
    } else {
        format!("{shown}****")
    }
}
