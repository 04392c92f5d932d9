use std::sync::Arc;
use nt_core::{AppConfig, HeadlineProvider, InferenceModel, Result};
use nt_news::NewsApiClient;

pub struct AppState {
    pub headlines: Arc<dyn HeadlineProvider>,
    pub inference_model: Arc<dyn InferenceModel>,
}

impl AppState {
    pub fn new(headlines: Arc<dyn HeadlineProvider>, inference_model: Arc<dyn InferenceModel>) -> Self {
        Self { headlines, inference_model }
    }

    /// Wire the NewsAPI client and the named inference model from `config`.
    pub fn from_config(config: &AppConfig, model_name: &str) -> Result<Self> {
        let headlines = Arc::new(NewsApiClient::new(config.news.clone()));
        let inference_model = nt_inference::create_model(model_name, config.inference.clone())?;
        Ok(Self::new(headlines, inference_model))
    }
}
