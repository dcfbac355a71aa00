use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Headline source unavailable{}: {message}", status_suffix(.status))]
    SourceUnavailable { status: Option<u16>, message: String },

    #[error("Rewrite service unavailable: {0}")]
    RewriteUnavailable(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub fn source_unavailable(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            status,
            message: message.into(),
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|code| format!(" (status {code})")).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_unavailable_mentions_status_when_known() {
        let err = Error::source_unavailable(Some(429), "rateLimited");
        assert_eq!(
            err.to_string(),
            "Headline source unavailable (status 429): rateLimited"
        );

        let err = Error::source_unavailable(None, "connection refused");
        assert_eq!(
            err.to_string(),
            "Headline source unavailable: connection refused"
        );
    }
}
