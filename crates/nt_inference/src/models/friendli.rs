use std::sync::Arc;
use std::fmt;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use nt_core::{Error, InferenceConfig, Result};
use nt_core::models::neutral_prompt;
use super::InferenceModel;

pub const MISSING_TOKEN: &str = "Missing Friendli token";

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    #[serde(default)]
    content: Option<String>,
}

/// Chat-completions client for the Friendli serverless endpoint.
pub struct FriendliModel {
    client: Arc<Client>,
    api_key: Option<String>,
    base_url: String,
    model_name: String,
}

impl FriendliModel {
    pub fn new(config: InferenceConfig) -> Self {
        Self {
            client: Arc::new(Client::new()),
            api_key: config.api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model_name: config.model_name,
        }
    }

    fn token(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| Error::Configuration(MISSING_TOKEN.to_string()))
    }
}

impl fmt::Debug for FriendliModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FriendliModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model_name", &self.model_name)
            .finish()
    }
}

#[async_trait]
impl InferenceModel for FriendliModel {
    fn name(&self) -> &str {
        "Friendli"
    }

    fn ensure_configured(&self) -> Result<()> {
        self.token().map(|_| ())
    }

    async fn neutralize(&self, text: &str) -> Result<String> {
        let token = self.token()?;

        let request = ChatRequest {
            model: self.model_name.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: neutral_prompt(text),
            }],
            stream: false,
        };

        tracing::debug!("Requesting neutral rewrite from {} ({} chars)", self.model_name, text.len());
        let response = self.client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(token)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body = serde_json::from_str(&body).unwrap_or(serde_json::Value::Null);
            let err = Error::from_upstream_body(status.as_u16(), &body);
            tracing::warn!("Friendli returned {}: {}", status, err);
            return Err(err);
        }

        let response = response.json::<ChatResponse>().await?;
        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(Error::Upstream { status: Some(status.as_u16()), message: None })
    }
}
