use axum::{
    body::Bytes,
    extract::State,
    Json,
};
use std::sync::Arc;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};
use nt_core::{Error, Result};
use crate::error::{ApiError, INVALID_JSON, MISSING_TEXT};
use crate::AppState;

/// Request fields that may carry the text to rewrite, in priority order.
const TEXT_FIELDS: [&str; 2] = ["article", "text"];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NeutralSummary {
    pub neutral_summary: String,
}

pub async fn get_news(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Json<Value>, ApiError> {
    match state.headlines.top_headlines().await {
        Ok(payload) => {
            let count = payload
                .get("articles")
                .and_then(Value::as_array)
                .map(Vec::len)
                .unwrap_or(0);
            info!("📰 Served {} headlines from {}", count, state.headlines.name());
            Ok(Json(payload))
        }
        Err(e) => {
            warn!("Headline fetch failed: {}", e);
            Err(ApiError::headlines(e))
        }
    }
}

pub async fn neutralize_article(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> std::result::Result<Json<NeutralSummary>, ApiError> {
    state.inference_model.ensure_configured().map_err(ApiError::rewrite)?;
    let text = extract_text(&body).map_err(ApiError::rewrite)?;

    info!("🤖 Neutralizing {} chars with {}", text.len(), state.inference_model.name());
    match state.inference_model.neutralize(&text).await {
        Ok(neutral_summary) => Ok(Json(NeutralSummary { neutral_summary })),
        Err(e) => {
            warn!("Neutral rewrite failed: {}", e);
            Err(ApiError::rewrite(e))
        }
    }
}

/// Pull the text to neutralize out of a raw request body. The first
/// non-blank string among [`TEXT_FIELDS`] wins.
pub fn extract_text(body: &[u8]) -> Result<String> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|_| Error::Validation(INVALID_JSON.to_string()))?;

    TEXT_FIELDS
        .iter()
        .filter_map(|field| value.get(*field).and_then(Value::as_str))
        .find(|text| !text.trim().is_empty())
        .map(str::to_string)
        .ok_or_else(|| Error::Validation(MISSING_TEXT.to_string()))
}
