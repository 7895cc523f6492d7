pub mod config;
#[cfg(any(test, feature = "mock"))]
mod stub;

#[cfg(test)]
mod fixtures;

pub use config::RerankerConfig;
#[cfg(any(test, feature = "mock"))]
pub use stub::lexical_score;

use candle_core::{Device, Tensor};
use tokenizers::{Encoding, Tokenizer};
use tracing::{debug, info, warn};

use super::cross_encoder::CrossEncoder;
use super::device::{device_label, select_device};
use super::error::RerankerError;
use super::tokenizer::{load_pair_tokenizer, model_max_length};
use crate::scoring::{Scorer, ScoringError};

/// Files a model directory must contain.
pub const REQUIRED_MODEL_FILES: [&str; 3] = ["config.json", "model.safetensors", "tokenizer.json"];

struct LoadedModel {
    encoder: CrossEncoder,
    tokenizer: Tokenizer,
    max_seq_len: usize,
}

enum Engine {
    Model(LoadedModel),
    #[cfg(any(test, feature = "mock"))]
    Lexical,
}

/// Cross-encoder scorer: one logit per (query, document) pair.
pub struct Reranker {
    device: Device,
    max_batch_size: usize,
    engine: Engine,
}

impl std::fmt::Debug for Reranker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = f.debug_struct("Reranker");
        out.field("device", &device_label(&self.device))
            .field("max_batch_size", &self.max_batch_size);
        match &self.engine {
            Engine::Model(model) => out
                .field("encoder", &model.encoder)
                .field("max_seq_len", &model.max_seq_len),
            #[cfg(any(test, feature = "mock"))]
            Engine::Lexical => out.field("model_loaded", &false),
        };
        out.finish()
    }
}

/// Truncation length: explicit setting, else the tokenizer's own limit, capped by the positions the encoder can address.
pub(crate) fn effective_max_seq_len(
    requested: Option<usize>,
    tokenizer_limit: Option<usize>,
    max_positions: usize,
) -> usize {
    let wanted = requested.or(tokenizer_limit).unwrap_or(max_positions);
    if wanted > max_positions {
        warn!(
            wanted,
            max_positions, "Sequence limit exceeds position embeddings, capping"
        );
        max_positions
    } else {
        wanted
    }
}

impl Reranker {
    pub fn load(config: RerankerConfig) -> Result<Self, RerankerError> {
        if let Err(msg) = config.validate() {
            return Err(RerankerError::InvalidConfig { reason: msg });
        }

        let model_path = &config.model_path;
        if !model_path.exists() {
            return Err(RerankerError::ModelNotFound {
                path: model_path.clone(),
            });
        }

        for file in REQUIRED_MODEL_FILES {
            if !model_path.join(file).exists() {
                return Err(RerankerError::ModelLoadFailed {
                    reason: format!("Missing {} in {}", file, model_path.display()),
                });
            }
        }

        let device = select_device();
        debug!(device = device_label(&device), "Selected compute device for reranker");

        info!(
            model_path = %model_path.display(),
            max_batch_size = config.max_batch_size,
            "Loading reranker model"
        );

        let encoder = CrossEncoder::load(model_path, &device).map_err(|e| {
            RerankerError::ModelLoadFailed {
                reason: format!("Failed to load cross-encoder: {}", e),
            }
        })?;

        let max_seq_len = effective_max_seq_len(
            config.max_seq_len,
            model_max_length(model_path),
            encoder.max_positions(),
        );

        let tokenizer = load_pair_tokenizer(model_path, max_seq_len).map_err(|e| {
            RerankerError::ModelLoadFailed {
                reason: format!("Failed to load tokenizer: {}", e),
            }
        })?;

        info!(?encoder, max_seq_len, "Reranker model loaded");

        Ok(Self {
            device,
            max_batch_size: config.max_batch_size,
            engine: Engine::Model(LoadedModel {
                encoder,
                tokenizer,
                max_seq_len,
            }),
        })
    }

    /// Scorer backed by [`lexical_score`] instead of model weights.
    #[cfg(any(test, feature = "mock"))]
    pub fn stub() -> Self {
        Self {
            device: Device::Cpu,
            max_batch_size: crate::constants::DEFAULT_MAX_BATCH_SIZE,
            engine: Engine::Lexical,
        }
    }

    /// Scores every document against `query`, preserving input order.
    pub fn score_documents(
        &self,
        query: &str,
        documents: &[String],
    ) -> Result<Vec<f32>, RerankerError> {
        debug!(
            query_len = query.len(),
            num_documents = documents.len(),
            model_loaded = self.is_model_loaded(),
            "Scoring documents"
        );

        match &self.engine {
            Engine::Model(model) => {
                let mut scores = Vec::with_capacity(documents.len());
                for chunk in documents.chunks(self.max_batch_size) {
                    scores.extend(self.forward_batch(model, query, chunk)?);
                }
                Ok(scores)
            }
            #[cfg(any(test, feature = "mock"))]
            Engine::Lexical => Ok(documents
                .iter()
                .map(|doc| lexical_score(query, doc))
                .collect()),
        }
    }

    fn forward_batch(
        &self,
        model: &LoadedModel,
        query: &str,
        documents: &[String],
    ) -> Result<Vec<f32>, RerankerError> {
        let pairs: Vec<(&str, &str)> = documents.iter().map(|d| (query, d.as_str())).collect();

        let encodings = model.tokenizer.encode_batch(pairs, true).map_err(|e| {
            RerankerError::TokenizationFailed {
                reason: e.to_string(),
            }
        })?;

        let input_ids = self.stack_field(&encodings, Encoding::get_ids)?;
        let type_ids = self.stack_field(&encodings, Encoding::get_type_ids)?;
        let attention_mask = self.stack_field(&encodings, Encoding::get_attention_mask)?;

        let logits = model
            .encoder
            .forward(&input_ids, &type_ids, &attention_mask)
            .map_err(|e| RerankerError::InferenceFailed {
                reason: e.to_string(),
            })?;

        // Flatten rather than squeeze: a batch of one must stay a one-element vector.
        let scores = logits.flatten_all()?.to_vec1::<f32>()?;

        if scores.len() != documents.len() {
            return Err(RerankerError::InferenceFailed {
                reason: format!(
                    "model returned {} logits for {} pairs",
                    scores.len(),
                    documents.len()
                ),
            });
        }

        Ok(scores)
    }

    fn stack_field(
        &self,
        encodings: &[Encoding],
        field: fn(&Encoding) -> &[u32],
    ) -> Result<Tensor, RerankerError> {
        let rows = encodings
            .iter()
            .map(|encoding| Tensor::new(field(encoding), &self.device))
            .collect::<candle_core::Result<Vec<_>>>()?;

        Ok(Tensor::stack(&rows, 0)?)
    }

    pub fn is_model_loaded(&self) -> bool {
        matches!(self.engine, Engine::Model(_))
    }

    /// Tokens kept per pair after truncation; `None` without model weights.
    pub fn max_seq_len(&self) -> Option<usize> {
        match &self.engine {
            Engine::Model(model) => Some(model.max_seq_len),
            #[cfg(any(test, feature = "mock"))]
            Engine::Lexical => None,
        }
    }

    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    pub fn encoder(&self) -> Option<&CrossEncoder> {
        match &self.engine {
            Engine::Model(model) => Some(&model.encoder),
            #[cfg(any(test, feature = "mock"))]
            Engine::Lexical => None,
        }
    }

    pub fn device(&self) -> &Device {
        &self.device
    }
}

impl Scorer for Reranker {
    fn score(&self, query: &str, documents: &[String]) -> Result<Vec<f32>, ScoringError> {
        Ok(self.score_documents(query, documents)?)
    }

    fn is_model_loaded(&self) -> bool {
        Reranker::is_model_loaded(self)
    }

    fn device_label(&self) -> &'static str {
        device_label(&self.device)
    }
}
