use std::fmt;
use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use url::Url;
use nt_core::{Error, HeadlineProvider, NewsApiConfig, Result};

pub const MISSING_KEY: &str = "Missing NewsAPI key";

const CLIENT_AGENT: &str = concat!("nt-news/", env!("CARGO_PKG_VERSION"));

/// Top-headlines client for newsapi.org.
pub struct NewsApiClient {
    client: Client,
    config: NewsApiConfig,
}

impl NewsApiClient {
    pub fn new(config: NewsApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn api_key(&self) -> Result<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| Error::Configuration(MISSING_KEY.to_string()))
    }

    fn endpoint(&self, api_key: &str) -> Result<Url> {
        let base = self.config.base_url.trim_end_matches('/');
        let page_size = self.config.page_size.to_string();
        Url::parse_with_params(
            &format!("{}/v2/top-headlines", base),
            &[
                ("country", self.config.country.as_str()),
                ("pageSize", page_size.as_str()),
                ("apiKey", api_key),
            ],
        )
        .map_err(|e| Error::Configuration(format!("Invalid NewsAPI base URL: {}", e)))
    }
}

impl fmt::Debug for NewsApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiClient")
            .field("client", &"<reqwest::Client>")
            .field("config", &self.config)
            .finish()
    }
}

#[async_trait]
impl HeadlineProvider for NewsApiClient {
    fn name(&self) -> &str {
        "NewsAPI"
    }

    async fn top_headlines(&self) -> Result<serde_json::Value> {
        let api_key = self.api_key()?;
        let url = self.endpoint(api_key)?;

        tracing::debug!(
            "Fetching top headlines (country={}, pageSize={})",
            self.config.country,
            self.config.page_size
        );
        let response = self.client
            .get(url)
            .header(USER_AGENT, CLIENT_AGENT)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let body: serde_json::Value = serde_json::from_str(&body)?;

        if !status.is_success() {
            let err = Error::from_upstream_body(status.as_u16(), &body);
            tracing::warn!("NewsAPI returned {}: {}", status, err);
            return Err(err);
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use nt_core::ErrorKind;

    fn client(server: &mockito::Server) -> NewsApiClient {
        NewsApiClient::new(
            NewsApiConfig::default()
                .with_api_key("news-key")
                .with_base_url(server.url()),
        )
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_any_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let client = NewsApiClient::new(NewsApiConfig::default().with_base_url(server.url()));
        let err = client.top_headlines().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.to_string(), MISSING_KEY);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_requests_fixed_country_and_page_size() {
        let mut server = mockito::Server::new_async().await;
        let body = r#"{"status":"ok","totalResults":1,"articles":[{"title":"A","source":{"id":null,"name":"X"}}]}"#;
        let mock = server
            .mock("GET", "/v2/top-headlines")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("country".into(), "us".into()),
                Matcher::UrlEncoded("pageSize".into(), "10".into()),
                Matcher::UrlEncoded("apiKey".into(), "news-key".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;

        let payload = client(&server).top_headlines().await.unwrap();
        let expected: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(payload, expected);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_provider_error_keeps_status_and_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v2/top-headlines")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status":"error","code":"apiKeyInvalid","message":"Your API key is invalid."}"#)
            .create_async()
            .await;

        let err = client(&server).top_headlines().await.unwrap_err();
        assert_eq!(err.upstream_status(), Some(401));
        assert_eq!(err.message_or("Failed to fetch news"), "Your API key is invalid.");
    }

    #[tokio::test]
    async fn test_unparseable_body_is_a_network_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v2/top-headlines")
            .match_query(Matcher::Any)
            .with_status(502)
            .with_body("<html>Bad Gateway</html>")
            .create_async()
            .await;

        let err = client(&server).top_headlines().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Network);
        assert_eq!(err.message_or("Failed to fetch news"), "Failed to fetch news");
    }
}
