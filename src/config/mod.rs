//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `RERANK_*` environment variables.
//! Values are read once at startup; there is no reload.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use crate::constants::{DEFAULT_MAX_BATCH_SIZE, DEFAULT_MODEL_NAME, DEFAULT_PORT};
use crate::model::{REQUIRED_MODEL_FILES, RerankerConfig};

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `RERANK_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Model identifier that requests must name. Default: [`DEFAULT_MODEL_NAME`].
    ///
    /// Also the Hugging Face Hub repository fetched when `model_path` is unset.
    pub model_name: String,

    /// Local model directory (`config.json`, `model.safetensors`, `tokenizer.json`).
    ///
    /// When unset the files for `model_name` are downloaded from the Hub.
    pub model_path: Option<PathBuf>,

    /// HTTP server port. Default: `8000`.
    pub port: u16,

    /// IP address to bind to. Default: `0.0.0.0`.
    pub bind_addr: IpAddr,

    /// Runtime worker threads. `None` keeps Tokio's default (one per core).
    pub workers: Option<usize>,

    /// Token limit per (query, document) pair.
    ///
    /// `None` follows `model_max_length` in `tokenizer_config.json`. Always capped
    /// by the model's position embeddings.
    pub max_seq_len: Option<usize>,

    /// Pairs per forward pass. Default: `32`.
    pub max_batch_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_name: DEFAULT_MODEL_NAME.to_string(),
            model_path: None,
            port: DEFAULT_PORT,
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            workers: None,
            max_seq_len: None,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
        }
    }
}

impl Config {
    pub(crate) const ENV_MODEL_NAME: &'static str = "RERANK_MODEL_NAME";
    pub(crate) const ENV_MODEL_PATH: &'static str = "RERANK_MODEL_PATH";
    pub(crate) const ENV_PORT: &'static str = "RERANK_PORT";
    pub(crate) const ENV_BIND_ADDR: &'static str = "RERANK_BIND_ADDR";
    pub(crate) const ENV_WORKERS: &'static str = "RERANK_WORKERS";
    pub(crate) const ENV_MAX_SEQ_LEN: &'static str = "RERANK_MAX_SEQ_LEN";
    pub(crate) const ENV_MAX_BATCH_SIZE: &'static str = "RERANK_MAX_BATCH_SIZE";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let model_name = Self::parse_model_name_from_env(defaults.model_name)?;
        let model_path = Self::parse_optional_path_from_env(Self::ENV_MODEL_PATH);
        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let workers = Self::parse_optional_positive_from_env(Self::ENV_WORKERS)?;
        let max_seq_len = Self::parse_optional_positive_from_env(Self::ENV_MAX_SEQ_LEN)?;
        let max_batch_size = Self::parse_optional_positive_from_env(Self::ENV_MAX_BATCH_SIZE)?
            .unwrap_or(defaults.max_batch_size);

        Ok(Self {
            model_name,
            model_path,
            port,
            bind_addr,
            workers,
            max_seq_len,
            max_batch_size,
        })
    }

    /// Validates the model directory layout (does not load anything).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model_name.trim().is_empty() {
            return Err(ConfigError::EmptyModelName {
                name: Self::ENV_MODEL_NAME,
            });
        }

        if let Some(ref path) = self.model_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
            for file in REQUIRED_MODEL_FILES {
                if !path.join(file).is_file() {
                    return Err(ConfigError::MissingModelFile {
                        dir: path.clone(),
                        file,
                    });
                }
            }
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        match self.bind_addr {
            IpAddr::V4(addr) => format!("{}:{}", addr, self.port),
            IpAddr::V6(addr) => format!("[{}]:{}", addr, self.port),
        }
    }

    /// Builds the scorer configuration for the resolved model directory.
    pub fn reranker_config(&self, model_dir: impl Into<PathBuf>) -> RerankerConfig {
        RerankerConfig::new(model_dir)
            .with_max_seq_len(self.max_seq_len)
            .with_max_batch_size(self.max_batch_size)
    }

    fn parse_model_name_from_env(default: String) -> Result<String, ConfigError> {
        match env::var(Self::ENV_MODEL_NAME) {
            Ok(value) if value.trim().is_empty() => Err(ConfigError::EmptyModelName {
                name: Self::ENV_MODEL_NAME,
            }),
            Ok(value) => Ok(value.trim().to_string()),
            Err(_) => Ok(default),
        }
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_optional_positive_from_env(
        var_name: &'static str,
    ) -> Result<Option<usize>, ConfigError> {
        let Some(value) = env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
        else {
            return Ok(None);
        };

        match value.parse::<usize>() {
            Ok(n) if n > 0 => Ok(Some(n)),
            _ => Err(ConfigError::InvalidInteger {
                name: var_name,
                value,
            }),
        }
    }
}
