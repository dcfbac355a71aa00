use async_trait::async_trait;
use std::fmt;
use crate::types::{Article, Rewrite};
use crate::Result;

#[async_trait]
pub trait RewriteService: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Rewrite a whole batch in a single upstream call. The answer must hold
    /// exactly one `Rewrite` per article, in the same order.
    async fn rewrite(&self, articles: &[Article]) -> Result<Vec<Rewrite>>;
}
