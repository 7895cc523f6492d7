use std::path::PathBuf;

use crate::constants::DEFAULT_MAX_BATCH_SIZE;

#[derive(Debug, Clone)]
pub struct RerankerConfig {
    /// Directory holding `config.json`, `model.safetensors` and `tokenizer.json`.
    pub model_path: PathBuf,

    /// Token limit per pair. `None` uses the tokenizer's `model_max_length`.
    pub max_seq_len: Option<usize>,

    pub max_batch_size: usize,
}

impl RerankerConfig {
    pub fn new<P: Into<PathBuf>>(model_path: P) -> Self {
        Self {
            model_path: model_path.into(),
            max_seq_len: None,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
        }
    }

    pub fn with_max_seq_len(mut self, max_seq_len: Option<usize>) -> Self {
        self.max_seq_len = max_seq_len;
        self
    }

    pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.max_batch_size = max_batch_size;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_seq_len == Some(0) {
            return Err("max_seq_len must be positive".to_string());
        }

        if self.max_batch_size == 0 {
            return Err("max_batch_size must be positive".to_string());
        }

        if self.model_path.as_os_str().is_empty() {
            return Err("model_path cannot be empty".to_string());
        }

        Ok(())
    }
}
