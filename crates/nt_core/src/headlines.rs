use async_trait::async_trait;
use std::fmt;
use crate::Result;

#[async_trait]
pub trait HeadlineProvider: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Fetch the current top headlines. The provider payload is returned
    /// untouched so callers can pass it through verbatim.
    async fn top_headlines(&self) -> Result<serde_json::Value>;
}
