use std::fmt;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use crate::error::Result;

/// Status and decoded JSON body of one call to the news endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: Value,
}

impl Reply {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// String field of the body, ignoring empty strings.
    pub fn text_field(&self, name: &str) -> Option<&str> {
        self.body
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    async fn read(response: reqwest::Response) -> Result<Self> {
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;
        let body = serde_json::from_slice(&bytes)?;
        Ok(Self { status, body })
    }
}

/// Transport used by the controller to reach the two news endpoints.
#[async_trait]
pub trait NewsBackend: Send + Sync {
    async fn fetch_headlines(&self) -> Result<Reply>;

    async fn request_rewrite(&self, text: &str) -> Result<Reply>;
}

/// [`NewsBackend`] talking to a running `nt serve` over HTTP.
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/news", self.base_url)
    }
}

impl fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpBackend")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl NewsBackend for HttpBackend {
    async fn fetch_headlines(&self) -> Result<Reply> {
        let response = self.client.get(self.endpoint()).send().await?;
        Reply::read(response).await
    }

    async fn request_rewrite(&self, text: &str) -> Result<Reply> {
        let response = self.client
            .post(self.endpoint())
            .json(&json!({ "article": text }))
            .send()
            .await?;
        Reply::read(response).await
    }
}
