use onnxruntime::environment::Environment;
use onnxruntime::ndarray::Array;
use onnxruntime::session::Session;
use onnxruntime::{GraphOptimizationLevel, LoggingLevel};
use once_cell::sync::OnceCell;
use std::sync::Mutex;
use tokenizers::Tokenizer;

use crate::config::EmbedConfig;
use crate::error::EmbedError;
use crate::normalize::l2_normalize_in_place;
use crate::types::Embedding;

/// Sequences longer than this are truncated rather than chunked-and-pooled: occupation
/// titles, descriptions and short queries never approach this length, so the teacher's
/// sliding-window chunking machinery is scope the search service doesn't need.
const MAX_SEQUENCE_LENGTH: usize = 256;

struct LoadedModel {
    session: Session<'static>,
    tokenizer: Tokenizer,
}

// Safety: the session is only ever driven while holding `MODEL`'s mutex, so access is
// already serialized even though `Session` is not `Send` on its own.
unsafe impl Send for LoadedModel {}

static MODEL: OnceCell<Mutex<LoadedModel>> = OnceCell::new();

fn load_model(cfg: &EmbedConfig) -> Result<(), EmbedError> {
    if MODEL.get().is_some() {
        return Ok(());
    }

    let tokenizer_path = cfg
        .tokenizer_path
        .as_ref()
        .ok_or_else(|| EmbedError::TokenizerMissing("tokenizer_path not configured".to_string()))?;
    let tokenizer = Tokenizer::from_file(tokenizer_path)
        .map_err(|e| EmbedError::TokenizerMissing(e.to_string()))?;

    let environment = Environment::builder()
        .with_name("occusearch-embed")
        .with_log_level(LoggingLevel::Warning)
        .build()
        .map_err(|e| EmbedError::Inference(e.to_string()))?;

    // Leaked to satisfy onnxruntime's session lifetime: one environment/session pair is
    // loaded once per process and lives until the process exits.
    let environment: &'static Environment = Box::leak(Box::new(environment));
    let session = environment
        .new_session_builder()
        .map_err(|e| EmbedError::Inference(e.to_string()))?
        .with_optimization_level(GraphOptimizationLevel::Basic)
        .map_err(|e| EmbedError::Inference(e.to_string()))?
        .with_model_from_file(&cfg.model_path)
        .map_err(|e| EmbedError::Inference(e.to_string()))?;

    let _ = MODEL.set(Mutex::new(LoadedModel { session, tokenizer }));
    Ok(())
}

/// Runs local ONNX Runtime inference for a single already-prefixed text.
pub fn embed_via_onnx(text: &str, cfg: &EmbedConfig) -> Result<Embedding, EmbedError> {
    load_model(cfg)?;
    let mut guard = MODEL.get().expect("loaded above").lock().expect("poisoned");
    let model = &mut *guard;

    let encoding = model
        .tokenizer
        .encode(text, true)
        .map_err(|e| EmbedError::Inference(e.to_string()))?;
    let mut ids: Vec<i64> = encoding.get_ids().iter().map(|&v| v as i64).collect();
    ids.truncate(MAX_SEQUENCE_LENGTH);
    if ids.is_empty() {
        ids.push(0);
    }
    let seq_len = ids.len();
    let attention_mask: Vec<i64> = vec![1; seq_len];
    let token_type_ids: Vec<i64> = vec![0; seq_len];

    let input_ids = Array::from_shape_vec((1, seq_len), ids)
        .map_err(|e| EmbedError::Inference(e.to_string()))?;
    let attention = Array::from_shape_vec((1, seq_len), attention_mask)
        .map_err(|e| EmbedError::Inference(e.to_string()))?;
    let token_types = Array::from_shape_vec((1, seq_len), token_type_ids)
        .map_err(|e| EmbedError::Inference(e.to_string()))?;

    let outputs: Vec<onnxruntime::tensor::OrtOwnedTensor<f32, _>> = model
        .session
        .run(vec![
            input_ids.into_dyn(),
            attention.into_dyn(),
            token_types.into_dyn(),
        ])
        .map_err(|e| EmbedError::Inference(e.to_string()))?;

    let first = outputs
        .first()
        .ok_or_else(|| EmbedError::Inference("onnx session returned no outputs".to_string()))?;
    let flat: Vec<f32> = first.iter().copied().collect();
    let mut values = if flat.len() >= cfg.dim {
        flat[..cfg.dim].to_vec()
    } else {
        let mut padded = flat;
        padded.resize(cfg.dim, 0.0);
        padded
    };

    if cfg.normalize {
        l2_normalize_in_place(&mut values);
    }

    Ok(Embedding {
        values,
        model_name: cfg.model_name.clone(),
        provider: "onnx".to_string(),
    })
}
