use std::sync::Arc;
use hl_core::{Result, RewriteService};
use tracing::info;
use crate::Config;

pub mod chat;

pub use chat::ChatRewriter;

/// Builds the configured rewrite service, or `None` when no key is set.
pub fn create_model(config: &Config) -> Result<Option<Arc<dyn RewriteService>>> {
    if config.api_key.is_none() {
        info!("no rewrite API key configured; headlines will be served unprocessed");
        return Ok(None);
    }
    let model = ChatRewriter::new(config)?;
    info!(endpoint = %model.endpoint(), model = %config.model_name, "rewrite service configured");
    Ok(Some(Arc::new(model)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_key_means_no_model() {
        assert!(create_model(&Config::default()).unwrap().is_none());

        let config = Config {
            api_key: Some("sk-test".to_string()),
            ..Config::default()
        };
        let model = create_model(&config).unwrap().unwrap();
        assert_eq!(model.name(), "chat-completions");
    }
}
