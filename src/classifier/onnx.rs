//! Local sequence classification via ONNX Runtime.
//!
//! Runs HuggingFace sequence-classification exports (DistilBERT SST-2 by
//! default) with a `tokenizers` tokenizer in front.

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info, warn};

use super::Classifier;
use crate::error::{MimirError, Result};
use crate::model::{Device, ModelConfig, ModelSource, check_label_count, resolve_labels};
use crate::types::Classification;

/// Longest token sequence fed to the model; longer inputs are truncated.
pub const MAX_SEQUENCE_LENGTH: usize = 512;

/// Text run once at load time to measure the logits width.
const WARMUP_TEXT: &str = "warm up";

/// Token ids for a single text, ready to become `[1, seq_len]` tensors.
struct EncodedText {
    input_ids: Vec<i64>,
    attention_mask: Vec<i64>,
    token_type_ids: Vec<i64>,
}

/// Sequence classifier backed by an ONNX Runtime session.
///
/// Tokenization runs without locking. `Session::run` needs exclusive
/// access, so the session sits behind a mutex held only for the run itself.
pub struct OnnxClassifier {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    labels: Vec<String>,
    name: String,
    token_type_ids: bool,
}

impl OnnxClassifier {
    /// Load a classifier from the given source.
    ///
    /// Downloads the model into `cache_dir` if it is not cached locally.
    /// `labels` overrides the label set read from the model's `config.json`.
    pub fn new(
        source: &ModelSource,
        device: Device,
        cache_dir: &Path,
        labels: Option<Vec<String>>,
    ) -> Result<Self> {
        let files = source.resolve(cache_dir)?;
        let config = files
            .config
            .as_deref()
            .map(ModelConfig::from_file)
            .transpose()?;
        let labels = resolve_labels(labels, config.as_ref())?;
        let token_type_ids = config
            .as_ref()
            .is_some_and(ModelConfig::expects_token_type_ids);

        let session = build_session(&files.model, &device)?;
        let tokenizer = load_tokenizer(&files.tokenizer)?;

        let classifier = Self {
            session: Mutex::new(session),
            tokenizer,
            labels,
            name: source.name().to_string(),
            token_type_ids,
        };

        // The label set must cover exactly the logits the graph produces.
        let logits = classifier
            .encode(WARMUP_TEXT)
            .and_then(|encoded| classifier.run_inference(&encoded))
            .map_err(|e| MimirError::ModelLoad(format!("Warm-up inference failed: {}", e)))?;
        check_label_count(&classifier.labels, logits.len())?;

        info!(
            model = source.name(),
            device = device.name(),
            labels = ?classifier.labels,
            "classifier loaded"
        );

        Ok(classifier)
    }

    fn encode(&self, text: &str) -> Result<EncodedText> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| MimirError::Inference(format!("Tokenization failed: {}", e)))?;

        let widen = |values: &[u32]| values.iter().map(|&v| v as i64).collect::<Vec<i64>>();

        Ok(EncodedText {
            input_ids: widen(encoding.get_ids()),
            attention_mask: widen(encoding.get_attention_mask()),
            token_type_ids: widen(encoding.get_type_ids()),
        })
    }

    /// Run the ONNX session and return the logits of the single batch row.
    fn run_inference(&self, encoded: &EncodedText) -> Result<Vec<f32>> {
        use ort::value::TensorRef;

        let shape = [1_usize, encoded.input_ids.len()];

        let input_ids = TensorRef::from_array_view((shape, encoded.input_ids.as_slice()))
            .map_err(|e| {
                MimirError::Inference(format!("Failed to create input_ids tensor: {}", e))
            })?;
        let attention_mask = TensorRef::from_array_view((shape, encoded.attention_mask.as_slice()))
            .map_err(|e| {
                MimirError::Inference(format!("Failed to create attention_mask tensor: {}", e))
            })?;

        let mut session = lock_session(&self.session);

        let outputs = if self.token_type_ids {
            let token_type_ids =
                TensorRef::from_array_view((shape, encoded.token_type_ids.as_slice())).map_err(
                    |e| {
                        MimirError::Inference(format!(
                            "Failed to create token_type_ids tensor: {}",
                            e
                        ))
                    },
                )?;
            session.run(ort::inputs![
                "input_ids" => input_ids,
                "attention_mask" => attention_mask,
                "token_type_ids" => token_type_ids,
            ])
        } else {
            session.run(ort::inputs![
                "input_ids" => input_ids,
                "attention_mask" => attention_mask,
            ])
        }
        .map_err(|e| MimirError::Inference(format!("ONNX inference failed: {}", e)))?;

        let logits = outputs
            .get("logits")
            .ok_or_else(|| MimirError::Inference("No logits output found".to_string()))?;

        // try_extract_tensor returns (&Shape, &[T])
        let (tensor_shape, logits_data) = logits
            .try_extract_tensor::<f32>()
            .map_err(|e| MimirError::Inference(format!("Failed to extract logits: {}", e)))?;

        if tensor_shape.len() != 2 || tensor_shape[0] != 1 {
            return Err(MimirError::Inference(format!(
                "Unexpected logits shape {:?}",
                &tensor_shape[..]
            )));
        }

        Ok(logits_data.to_vec())
    }
}

impl Classifier for OnnxClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn classify(&self, text: &str) -> Result<Classification> {
        if text.trim().is_empty() {
            return Err(MimirError::InvalidInput("text must not be empty".to_string()));
        }

        let encoded = self.encode(text)?;
        let logits = self.run_inference(&encoded)?;
        let result = Classification::from_logits(&logits, &self.labels)?;

        debug!(
            model = %self.name,
            tokens = encoded.input_ids.len(),
            label = %result.label,
            score = result.score,
            "classified"
        );
        Ok(result)
    }
}

/// Lock the session, recovering it if an earlier run panicked.
///
/// The session keeps no state between runs, so a poisoned lock is safe to
/// reuse.
fn lock_session<T>(session: &Mutex<T>) -> MutexGuard<'_, T> {
    session.lock().unwrap_or_else(|poisoned| {
        warn!("session lock was poisoned by a panicked inference; recovering");
        PoisonError::into_inner(poisoned)
    })
}

fn load_tokenizer(path: &Path) -> Result<Tokenizer> {
    let mut tokenizer = Tokenizer::from_file(path).map_err(|e| {
        MimirError::ModelLoad(format!("Failed to load tokenizer from {:?}: {}", path, e))
    })?;

    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length: MAX_SEQUENCE_LENGTH,
            ..Default::default()
        }))
        .map_err(|e| MimirError::ModelLoad(format!("Failed to configure truncation: {}", e)))?;
    // Single texts are never padded.
    tokenizer.with_padding(None);

    Ok(tokenizer)
}

/// Build an ONNX session with the appropriate execution provider.
fn build_session(model_path: &Path, device: &Device) -> Result<Session> {
    let builder = Session::builder()
        .map_err(|e| MimirError::ModelLoad(format!("Failed to create session builder: {}", e)))?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| MimirError::ModelLoad(format!("Failed to set optimization level: {}", e)))?;

    // Configure execution provider based on device
    let builder = match device {
        Device::Cpu => builder,
        #[cfg(feature = "cuda")]
        Device::Cuda { device_id } => {
            use ort::execution_providers::CUDAExecutionProvider;
            builder
                .with_execution_providers([CUDAExecutionProvider::default()
                    .with_device_id(*device_id as i32)
                    .build()])
                .map_err(|e| MimirError::ModelLoad(format!("Failed to configure CUDA: {}", e)))?
        }
    };

    debug!(path = %model_path.display(), "loading ONNX graph");
    builder
        .commit_from_file(model_path)
        .map_err(|e| MimirError::ModelLoad(format!("Failed to load ONNX model: {}", e)))
}
