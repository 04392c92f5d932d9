use std::env;
use std::fmt;

pub const NEWSAPI_BASE_URL: &str = "https://newsapi.org";
pub const FRIENDLI_BASE_URL: &str = "https://api.friendli.ai/serverless/v1";
pub const FRIENDLI_MODEL: &str = "meta-llama-3.3-70b-instruct";

/// Settings for the headline provider. The key stays optional so a missing
/// credential surfaces per request rather than at startup.
#[derive(Clone)]
pub struct NewsApiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub country: String,
    pub page_size: u32,
}

impl Default for NewsApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: NEWSAPI_BASE_URL.to_string(),
            country: "us".to_string(),
            page_size: 10,
        }
    }
}

impl NewsApiConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.api_key = non_empty_var("NEWSAPI_KEY");
        if let Some(url) = non_empty_var("NEWSAPI_BASE_URL") {
            config.base_url = url;
        }
        config
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl fmt::Debug for NewsApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiConfig")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("country", &self.country)
            .field("page_size", &self.page_size)
            .finish()
    }
}

#[derive(Clone)]
pub struct InferenceConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model_name: String,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: FRIENDLI_BASE_URL.to_string(),
            model_name: FRIENDLI_MODEL.to_string(),
        }
    }
}

impl InferenceConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.api_key = non_empty_var("FRIENDLI_TOKEN");
        if let Some(url) = non_empty_var("FRIENDLI_BASE_URL") {
            config.base_url = url;
        }
        if let Some(model) = non_empty_var("FRIENDLI_MODEL") {
            config.model_name = model;
        }
        config
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceConfig")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model_name", &self.model_name)
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub news: NewsApiConfig,
    pub inference: InferenceConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            news: NewsApiConfig::from_env(),
            inference: InferenceConfig::from_env(),
        };
        tracing::debug!("Loaded configuration: {:?}", config);
        config
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
