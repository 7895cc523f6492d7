use std::io;
use std::path::Path;
use tokenizers::{PaddingParams, Tokenizer, TruncationParams, TruncationStrategy};

/// Optional tokenizer settings; only `model_max_length` is read.
pub const TOKENIZER_CONFIG_FILE: &str = "tokenizer_config.json";

/// `model_max_length` values at or above this are "unset" sentinels.
const UNSET_MODEL_MAX_LENGTH: f64 = 1e12;

/// Pad tokens tried, in order, when `tokenizer.json` carries no padding config.
const PAD_TOKEN_CANDIDATES: [&str; 2] = ["[PAD]", "<pad>"];

/// Loads `tokenizer.json` from a model directory or an explicit file path.
pub fn load_tokenizer(model_path: &Path) -> io::Result<Tokenizer> {
    let tokenizer_path = if model_path.is_dir() {
        model_path.join("tokenizer.json")
    } else {
        model_path.to_path_buf()
    };

    Tokenizer::from_file(&tokenizer_path).map_err(io::Error::other)
}

/// Loads a tokenizer configured for batched (query, document) pairs.
///
/// Pairs are truncated longest-first to `max_len` tokens and padded to the
/// longest pair in each batch, so one batch always stacks into a single tensor.
pub fn load_pair_tokenizer(model_path: &Path, max_len: usize) -> io::Result<Tokenizer> {
    let mut tokenizer = load_tokenizer(model_path)?;

    let truncation = TruncationParams {
        max_length: max_len,
        strategy: TruncationStrategy::LongestFirst,
        ..Default::default()
    };

    tokenizer
        .with_truncation(Some(truncation))
        .map_err(|e| io::Error::other(format!("Failed to configure truncation: {}", e)))?;

    if tokenizer.get_padding().is_none() {
        let padding = batch_padding(&tokenizer);
        tokenizer.with_padding(Some(padding));
    }

    Ok(tokenizer)
}

fn batch_padding(tokenizer: &Tokenizer) -> PaddingParams {
    let defaults = PaddingParams::default();
    PAD_TOKEN_CANDIDATES
        .into_iter()
        .find_map(|token| {
            tokenizer.token_to_id(token).map(|pad_id| PaddingParams {
                pad_id,
                pad_token: token.to_string(),
                ..PaddingParams::default()
            })
        })
        .unwrap_or(defaults)
}

/// Reads `model_max_length` from `tokenizer_config.json` in `model_dir`.
///
/// Returns `None` when the file is missing or unreadable, or when the value is
/// the very large placeholder some exports carry.
pub fn model_max_length(model_dir: &Path) -> Option<usize> {
    let raw = std::fs::read_to_string(model_dir.join(TOKENIZER_CONFIG_FILE)).ok()?;
    let config: serde_json::Value = serde_json::from_str(&raw).ok()?;
    let value = config.get("model_max_length")?.as_f64()?;

    (value >= 1.0 && value < UNSET_MODEL_MAX_LENGTH).then(|| value as usize)
}
