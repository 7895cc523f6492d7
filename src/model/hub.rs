//! Model directory resolution: a local path, or a Hugging Face Hub download.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::error::RerankerError;
use super::reranker::REQUIRED_MODEL_FILES;
use super::tokenizer::TOKENIZER_CONFIG_FILE;

/// Returns `model_path` when set, otherwise fetches `model_name` from the Hub.
pub async fn resolve_model_dir(
    model_path: Option<&Path>,
    model_name: &str,
) -> Result<PathBuf, RerankerError> {
    match model_path {
        Some(path) => {
            debug!(path = %path.display(), "Using local model directory");
            Ok(path.to_path_buf())
        }
        None => download_model(model_name).await,
    }
}

/// Downloads (or reuses the cached copy of) every file the reranker reads.
///
/// All files land in one snapshot directory of the local Hub cache, which is returned.
pub async fn download_model(repo: &str) -> Result<PathBuf, RerankerError> {
    use hf_hub::api::tokio::Api;

    info!(repo, "Ensuring model is downloaded");

    let download_failed = |reason: String| RerankerError::DownloadFailed {
        repo: repo.to_string(),
        reason,
    };

    let api = Api::new().map_err(|e| download_failed(format!("Failed to create HF Hub API: {e}")))?;
    let model_repo = api.model(repo.to_string());

    let mut model_dir = None;
    for file in REQUIRED_MODEL_FILES {
        let path = model_repo
            .get(file)
            .await
            .map_err(|e| download_failed(format!("{file}: {e}")))?;
        if model_dir.is_none() {
            model_dir = path.parent().map(Path::to_path_buf);
        }
    }

    // Only consulted for the truncation length.
    if let Err(e) = model_repo.get(TOKENIZER_CONFIG_FILE).await {
        debug!(repo, error = %e, "No tokenizer_config.json in repository");
    }

    let model_dir =
        model_dir.ok_or_else(|| download_failed("Hub returned a path without a parent".into()))?;

    info!(path = %model_dir.display(), "Model available at local path");
    Ok(model_dir)
}
