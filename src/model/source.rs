//! Model source and download logic.

use std::path::{Path, PathBuf};

use crate::error::{MimirError, Result};

/// Default classification model: DistilBERT fine-tuned on SST-2.
pub const DEFAULT_REPO_ID: &str = "distilbert/distilbert-base-uncased-finetuned-sst-2-english";

/// Location of the ONNX export inside a HuggingFace repository.
pub const DEFAULT_ONNX_FILE: &str = "onnx/model.onnx";

/// HuggingFace model config carrying `id2label`.
#[cfg_attr(not(feature = "local-inference"), allow(dead_code))]
const MODEL_CONFIG_FILE: &str = "config.json";

/// Where the classification model comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// Load from HuggingFace Hub repository.
    HuggingFace {
        /// Repository ID (e.g., "distilbert/distilbert-base-uncased-finetuned-sst-2-english").
        repo_id: String,
        /// Path of the ONNX graph within the repo.
        onnx_file: String,
    },

    /// Load from local files.
    ///
    /// A `config.json` next to the model file is picked up for labels.
    Local {
        model_path: PathBuf,
        tokenizer_path: PathBuf,
    },
}

/// Files needed to run a classifier, resolved to local paths.
#[derive(Debug, Clone)]
pub struct ModelFiles {
    pub model: PathBuf,
    pub tokenizer: PathBuf,
    /// HuggingFace `config.json`, when the source ships one.
    pub config: Option<PathBuf>,
}

impl Default for ModelSource {
    fn default() -> Self {
        Self::huggingface(DEFAULT_REPO_ID)
    }
}

impl ModelSource {
    /// Create a HuggingFace source using the conventional ONNX location.
    pub fn huggingface(repo_id: impl Into<String>) -> Self {
        Self::HuggingFace {
            repo_id: repo_id.into(),
            onnx_file: DEFAULT_ONNX_FILE.to_string(),
        }
    }

    /// Create a local source.
    pub fn local(model_path: impl Into<PathBuf>, tokenizer_path: impl Into<PathBuf>) -> Self {
        Self::Local {
            model_path: model_path.into(),
            tokenizer_path: tokenizer_path.into(),
        }
    }

    /// Model name for logs and the health endpoint.
    ///
    /// The last path segment of the repo ID, or the model file stem.
    pub fn name(&self) -> &str {
        match self {
            Self::HuggingFace { repo_id, .. } => {
                repo_id.rsplit('/').next().unwrap_or(repo_id.as_str())
            }
            Self::Local { model_path, .. } => model_path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("custom"),
        }
    }

    /// Download or resolve the model files to local paths.
    ///
    /// HuggingFace downloads are cached under `cache_dir`; files already in
    /// the cache are not fetched again.
    #[cfg(feature = "local-inference")]
    pub fn resolve(&self, cache_dir: &Path) -> Result<ModelFiles> {
        match self {
            Self::HuggingFace { repo_id, onnx_file } => {
                let api = hf_hub::api::sync::ApiBuilder::new()
                    .with_cache_dir(cache_dir.to_path_buf())
                    .build()
                    .map_err(|e| {
                        MimirError::ModelLoad(format!("Failed to initialize HF API: {}", e))
                    })?;

                let repo = api.model(repo_id.clone());
                let fetch = |file: &str| {
                    repo.get(file).map_err(|e| {
                        MimirError::ModelLoad(format!(
                            "Failed to download {} from {}: {}",
                            file, repo_id, e
                        ))
                    })
                };

                let model = fetch(onnx_file)?;
                let tokenizer = fetch("tokenizer.json")?;

                // Only a repository without a config falls back to default labels.
                let config = match repo.get(MODEL_CONFIG_FILE) {
                    Ok(path) => Some(path),
                    Err(e) => {
                        let listed = repo.info().map(|info| {
                            info.siblings
                                .iter()
                                .map(|sibling| sibling.rfilename.clone())
                                .collect::<Vec<_>>()
                        });
                        match listed {
                            Ok(files) if !lists_file(&files, MODEL_CONFIG_FILE) => None,
                            _ => {
                                return Err(MimirError::ModelLoad(format!(
                                    "Failed to download {} from {}: {}",
                                    MODEL_CONFIG_FILE, repo_id, e
                                )));
                            }
                        }
                    }
                };

                Ok(ModelFiles {
                    model,
                    tokenizer,
                    config,
                })
            }
            Self::Local {
                model_path,
                tokenizer_path,
            } => {
                ensure_exists(model_path)?;
                ensure_exists(tokenizer_path)?;
                let config = model_path
                    .parent()
                    .map(|dir| dir.join(MODEL_CONFIG_FILE))
                    .filter(|path| path.exists());

                Ok(ModelFiles {
                    model: model_path.clone(),
                    tokenizer: tokenizer_path.clone(),
                    config,
                })
            }
        }
    }
}

#[cfg_attr(not(feature = "local-inference"), allow(dead_code))]
fn lists_file(files: &[String], name: &str) -> bool {
    files.iter().any(|file| file == name)
}

#[cfg_attr(not(feature = "local-inference"), allow(dead_code))]
fn ensure_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(MimirError::ModelLoad(format!(
            "Local model path does not exist: {}",
            path.display()
        )));
    }
    Ok(())
}

/// Default cache directory for downloaded models.
///
/// `MIMIR_CACHE_DIR` wins over the platform cache directory.
pub fn default_cache_dir() -> PathBuf {
    std::env::var("MIMIR_CACHE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from(".cache"))
                .join("mimir")
                .join("models")
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_source_is_sst2() {
        let source = ModelSource::default();
        assert_eq!(
            source,
            ModelSource::HuggingFace {
                repo_id: DEFAULT_REPO_ID.to_string(),
                onnx_file: "onnx/model.onnx".to_string(),
            }
        );
        assert_eq!(
            source.name(),
            "distilbert-base-uncased-finetuned-sst-2-english"
        );
    }

    #[test]
    fn local_name_is_file_stem() {
        let source = ModelSource::local("/models/sentiment.onnx", "/models/tokenizer.json");
        assert_eq!(source.name(), "sentiment");
    }

    #[test]
    fn repo_without_owner_uses_whole_id() {
        assert_eq!(ModelSource::huggingface("sst2").name(), "sst2");
    }

    #[test]
    fn only_unlisted_config_counts_as_missing() {
        let files = vec!["onnx/model.onnx".to_string(), "tokenizer.json".to_string()];
        assert!(!lists_file(&files, MODEL_CONFIG_FILE));

        let files = vec!["config.json".to_string(), "tokenizer.json".to_string()];
        assert!(lists_file(&files, MODEL_CONFIG_FILE));
    }

    #[cfg(feature = "local-inference")]
    #[test]
    fn local_config_is_picked_up_next_to_model() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("model.onnx");
        let tokenizer = dir.path().join("tokenizer.json");
        std::fs::write(&model, b"").unwrap();
        std::fs::write(&tokenizer, b"{}").unwrap();

        let source = ModelSource::local(&model, &tokenizer);
        assert_eq!(source.resolve(dir.path()).unwrap().config, None);

        std::fs::write(dir.path().join(MODEL_CONFIG_FILE), b"{}").unwrap();
        let files = source.resolve(dir.path()).unwrap();
        assert_eq!(files.config, Some(dir.path().join(MODEL_CONFIG_FILE)));
    }

    #[cfg(feature = "local-inference")]
    #[test]
    fn missing_local_files_fail_to_resolve() {
        let source = ModelSource::local("/nonexistent/model.onnx", "/nonexistent/tokenizer.json");
        let err = source.resolve(Path::new("/tmp")).unwrap_err();
        assert!(matches!(err, MimirError::ModelLoad(_)));
        assert!(err.to_string().contains("/nonexistent/model.onnx"));
    }
}
