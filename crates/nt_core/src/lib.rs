pub mod config;
pub mod error;
pub mod headlines;
pub mod models;
pub mod types;

pub use config::{AppConfig, InferenceConfig, NewsApiConfig};
pub use error::{Error, ErrorKind, Result};
pub use headlines::HeadlineProvider;
pub use models::InferenceModel;
pub use types::{Article, ArticleId, ProviderArticle, ProviderSource, RewriteState};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_prompt_wraps_text() {
        let prompt = models::neutral_prompt("Markets fell sharply.");
        assert!(prompt.starts_with(models::NEUTRAL_PROMPT));
        assert!(prompt.ends_with("\n\nMarkets fell sharply."));
    }
}
