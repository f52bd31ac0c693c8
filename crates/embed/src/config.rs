use serde::{Deserialize, Serialize};

/// Configuration for the embedding provider.
///
/// Three independent `mode`s, matching the three provider modes in the deployment
/// notes: `"stub"` (deterministic, no model assets, used in dev/CI), `"onnx"` (local
/// ONNX Runtime inference), `"api"` (delegate to a remote HTTP embedding endpoint,
/// e.g. a Hugging Face inference endpoint).
///
/// ```
/// use embed::config::EmbedConfig;
/// let cfg = EmbedConfig { mode: "stub".into(), ..EmbedConfig::default() };
/// assert_eq!(cfg.dim, 384);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedConfig {
    pub mode: String,
    pub model_name: String,
    pub model_path: String,
    pub model_url: Option<String>,
    pub tokenizer_path: Option<String>,
    pub tokenizer_url: Option<String>,
    pub api_url: Option<String>,
    pub api_auth_header: Option<String>,
    pub api_timeout_secs: Option<u64>,
    pub dim: usize,
    pub normalize: bool,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        EmbedConfig {
            mode: "onnx".to_string(),
            model_name: "intfloat/multilingual-e5-small".to_string(),
            model_path: "./models/multilingual-e5-small/onnx/model.onnx".to_string(),
            model_url: None,
            tokenizer_path: Some("./models/multilingual-e5-small/tokenizer.json".to_string()),
            tokenizer_url: None,
            api_url: None,
            api_auth_header: None,
            api_timeout_secs: Some(30),
            dim: 384,
            normalize: true,
        }
    }
}
