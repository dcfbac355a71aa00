use async_trait::async_trait;
use std::fmt;
use crate::types::Article;
use crate::Result;

#[async_trait]
pub trait HeadlineSource: Send + Sync + fmt::Debug {
    /// Returns the name of the upstream
    fn name(&self) -> &str;

    /// Fetches the current batch of headlines, in upstream order.
    ///
    /// An empty batch is an error (`Error::SourceUnavailable`), never `Ok(vec![])`.
    async fn fetch_headlines(&self) -> Result<Vec<Article>>;
}
