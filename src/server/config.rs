//! Configuration loading for mimird.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag, must exist)
//! 2. `~/.mimir/config.toml` (user)
//! 3. `/etc/mimir/config.toml` (system)
//! 4. Built-in defaults

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::{DEFAULT_ONNX_FILE, DEFAULT_REPO_ID, Device, ModelSource, default_cache_dir};
use crate::{MimirError, Result};

/// Server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
}

/// Server network configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:8000).
    #[serde(default = "default_address")]
    pub address: String,
    /// Publicly reachable URL provided by a tunnel or reverse proxy.
    ///
    /// Only logged at startup; mimird does not create tunnels itself.
    #[serde(default)]
    pub public_url: Option<String>,
    #[serde(default)]
    pub limits: LimitsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            public_url: None,
            limits: LimitsConfig::default(),
        }
    }
}

fn default_address() -> String {
    "127.0.0.1:8000".to_string()
}

/// Input limits.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LimitsConfig {
    /// Maximum text length in characters (default: unlimited).
    #[serde(default)]
    pub max_text_chars: Option<usize>,
}

/// Classification model configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// HuggingFace repository to download from.
    #[serde(default = "default_repo_id")]
    pub repo_id: String,
    /// ONNX graph path within the repository.
    #[serde(default = "default_onnx_file")]
    pub onnx_file: String,
    /// Local ONNX model; requires `tokenizer_path` and replaces `repo_id`.
    #[serde(default)]
    pub model_path: Option<PathBuf>,
    /// Local `tokenizer.json`; requires `model_path`.
    #[serde(default)]
    pub tokenizer_path: Option<PathBuf>,
    /// Label names in logit order, overriding the model's `config.json`.
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    /// Device to use: "cpu" or "cuda" (default: "cpu").
    #[serde(default = "default_device")]
    pub device: String,
    /// Directory for model downloads.
    #[serde(default)]
    pub models_dir: Option<PathBuf>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            repo_id: default_repo_id(),
            onnx_file: default_onnx_file(),
            model_path: None,
            tokenizer_path: None,
            labels: None,
            device: default_device(),
            models_dir: None,
        }
    }
}

fn default_repo_id() -> String {
    DEFAULT_REPO_ID.to_string()
}

fn default_onnx_file() -> String {
    DEFAULT_ONNX_FILE.to_string()
}

fn default_device() -> String {
    "cpu".to_string()
}

impl ModelConfig {
    /// Where to load the model from.
    pub fn source(&self) -> Result<ModelSource> {
        match (&self.model_path, &self.tokenizer_path) {
            (Some(model), Some(tokenizer)) => Ok(ModelSource::local(model, tokenizer)),
            (None, None) => Ok(ModelSource::HuggingFace {
                repo_id: self.repo_id.clone(),
                onnx_file: self.onnx_file.clone(),
            }),
            _ => Err(MimirError::Configuration(
                "model_path and tokenizer_path must be set together".to_string(),
            )),
        }
    }

    /// Parsed compute device.
    pub fn device(&self) -> Result<Device> {
        self.device.parse()
    }

    /// Directory downloaded models are cached in.
    pub fn cache_dir(&self) -> PathBuf {
        self.models_dir.clone().unwrap_or_else(default_cache_dir)
    }
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// An explicit path must exist. Without one, the first of
    /// `~/.mimir/config.toml` and `/etc/mimir/config.toml` that exists is
    /// used, and built-in defaults apply when neither does.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            MimirError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            MimirError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(MimirError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".mimir").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/mimir/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }
}
