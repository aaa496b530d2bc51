//! Async front for a [`Classifier`].
//!
//! [`ClassificationService`] is the object the HTTP layer holds. It is
//! constructed once by the process bootstrap around a loaded classifier and
//! cloned cheaply into every request handler.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, warn};

use crate::classifier::Classifier;
use crate::error::{MimirError, Result};
use crate::telemetry;
use crate::types::Classification;

/// Shared handle to the process's single classifier.
#[derive(Clone)]
pub struct ClassificationService {
    classifier: Arc<dyn Classifier>,
    max_text_chars: Option<usize>,
}

impl ClassificationService {
    /// Wrap a loaded classifier.
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            classifier,
            max_text_chars: None,
        }
    }

    /// Reject texts longer than `limit` characters. `None` disables the check.
    pub fn with_max_text_chars(mut self, limit: Option<usize>) -> Self {
        self.max_text_chars = limit;
        self
    }

    /// Name of the underlying model.
    pub fn model_name(&self) -> &str {
        self.classifier.name()
    }

    /// The model's label set.
    pub fn labels(&self) -> &[String] {
        self.classifier.labels()
    }

    /// Check a text before it reaches the model.
    pub fn validate(&self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(MimirError::InvalidInput(
                "text must not be empty".to_string(),
            ));
        }
        if let Some(limit) = self.max_text_chars {
            let chars = text.chars().count();
            if chars > limit {
                return Err(MimirError::InvalidInput(format!(
                    "text is {chars} characters long, limit is {limit}"
                )));
            }
        }
        Ok(())
    }

    /// Classify one text.
    ///
    /// Invalid input is rejected without touching the model. Scoring runs on
    /// the blocking pool so a slow model never stalls request I/O.
    pub async fn classify(&self, text: String) -> Result<Classification> {
        if let Err(e) = self.validate(&text) {
            warn!(error = %e, "rejected classification request");
            record_request("rejected");
            return Err(e);
        }

        let classifier = Arc::clone(&self.classifier);
        let start = Instant::now();
        let outcome = tokio::task::spawn_blocking(move || classifier.classify(&text))
            .await
            .unwrap_or_else(|e| {
                Err(MimirError::Inference(format!(
                    "classification task failed: {e}"
                )))
            });
        let elapsed = start.elapsed();

        metrics::histogram!(telemetry::INFERENCE_DURATION_SECONDS,
            "model" => self.model_name().to_owned(),
        )
        .record(elapsed.as_secs_f64());

        match outcome {
            Ok(result) => {
                debug!(
                    label = %result.label,
                    score = result.score,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "classification complete"
                );
                record_request("ok");
                Ok(result)
            }
            Err(e) if e.is_client_error() => {
                warn!(error = %e, "model rejected input");
                record_request("rejected");
                Err(e)
            }
            Err(e) => {
                error!(model = self.model_name(), error = %e, "classification failed");
                record_request("error");
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for ClassificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassificationService")
            .field("model", &self.model_name())
            .field("max_text_chars", &self.max_text_chars)
            .finish()
    }
}

fn record_request(status: &'static str) {
    metrics::counter!(telemetry::REQUESTS_TOTAL,
        "operation" => "classify",
        "status" => status,
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed {
        labels: Vec<String>,
    }

    impl Classifier for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn labels(&self) -> &[String] {
            &self.labels
        }

        fn classify(&self, _text: &str) -> Result<Classification> {
            Ok(Classification {
                label: self.labels[1].clone(),
                score: 0.75,
            })
        }
    }

    fn service() -> ClassificationService {
        ClassificationService::new(Arc::new(Fixed {
            labels: vec!["NEGATIVE".into(), "POSITIVE".into()],
        }))
    }

    #[test]
    fn whitespace_only_text_is_invalid() {
        let err = service().validate(" \n\t ").unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn length_limit_counts_characters() {
        let service = service().with_max_text_chars(Some(3));
        assert!(service.validate("äöü").is_ok());
        assert!(service.validate("äöüß").is_err());
    }

    #[test]
    fn no_limit_by_default() {
        assert!(service().validate(&"a".repeat(100_000)).is_ok());
    }

    #[tokio::test]
    async fn classify_delegates_to_model() {
        let result = service().classify("fine".to_string()).await.unwrap();
        assert_eq!(result.label, "POSITIVE");
        assert_eq!(result.score, 0.75);
    }
}
