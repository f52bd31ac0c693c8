use serde::Deserialize;
use std::time::Duration;

use crate::config::EmbedConfig;
use crate::error::EmbedError;
use crate::normalize::l2_normalize_in_place;
use crate::types::Embedding;

#[derive(Deserialize)]
struct ApiEmbedResponse {
    embedding: Vec<f32>,
}

/// Delegates embedding to a remote HTTP endpoint (e.g. a hosted inference API).
/// Expects a JSON response shaped `{"embedding": [f32, ...]}`.
pub async fn embed_via_api(text: &str, cfg: &EmbedConfig) -> Result<Embedding, EmbedError> {
    let url = cfg
        .api_url
        .as_ref()
        .ok_or_else(|| EmbedError::InvalidConfig("api_url not configured for mode=api".to_string()))?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(cfg.api_timeout_secs.unwrap_or(30)))
        .build()
        .map_err(|e| EmbedError::Api(e.to_string()))?;

    let mut request = client.post(url).json(&serde_json::json!({
        "input": text,
        "model": cfg.model_name,
    }));
    if let Some(header) = &cfg.api_auth_header {
        request = request.header("Authorization", header);
    }

    let response = request
        .send()
        .await
        .map_err(|e| EmbedError::Api(e.to_string()))?
        .error_for_status()
        .map_err(|e| EmbedError::Api(e.to_string()))?;

    let parsed: ApiEmbedResponse = response
        .json()
        .await
        .map_err(|e| EmbedError::Api(e.to_string()))?;

    let mut values = parsed.embedding;
    if cfg.normalize {
        l2_normalize_in_place(&mut values);
    }

    Ok(Embedding {
        values,
        model_name: cfg.model_name.clone(),
        provider: "api".to_string(),
    })
}
