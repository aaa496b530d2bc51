//! Text classifiers.
//!
//! A [`Classifier`] owns one loaded model and scores a single text at a
//! time. Implementations are synchronous and may be CPU-bound; async callers
//! go through [`ClassificationService`](crate::ClassificationService), which
//! moves the call onto the blocking pool.
//!
//! Implementations must be safe to call from several threads at once. If the
//! underlying inference primitive is not reentrant, the implementation
//! serialises access to that primitive itself (see [`OnnxClassifier`]).

#[cfg(feature = "local-inference")]
pub mod onnx;

#[cfg(feature = "local-inference")]
pub use onnx::OnnxClassifier;

use crate::Result;
use crate::types::Classification;

/// A single loaded text classification model.
pub trait Classifier: Send + Sync {
    /// Model name for logging/debugging.
    fn name(&self) -> &str;

    /// The fixed label set, in logit order.
    fn labels(&self) -> &[String];

    /// Classify one text.
    ///
    /// Returns `InvalidInput` for text that is empty after trimming and
    /// `Inference` when the model fails to score otherwise valid input.
    fn classify(&self, text: &str) -> Result<Classification>;
}
