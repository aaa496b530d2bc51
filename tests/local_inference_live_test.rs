//! Live tests against the real SST-2 model.
//!
//! These download the model from HuggingFace Hub on first run and are
//! ignored by default. Run with:
//!
//! ```sh
//! cargo test --test local_inference_live_test -- --ignored
//! ```

#![cfg(feature = "local-inference")]

use std::sync::Arc;

use mimir::model::default_cache_dir;
use mimir::{ClassificationService, Classifier, Device, MimirError, ModelSource, OnnxClassifier};

fn load_default() -> OnnxClassifier {
    OnnxClassifier::new(&ModelSource::default(), Device::Cpu, &default_cache_dir(), None)
        .expect("failed to load default model")
}

#[test]
#[ignore]
fn default_model_has_sentiment_labels() {
    let classifier = load_default();
    assert_eq!(classifier.labels(), ["NEGATIVE", "POSITIVE"]);
    assert_eq!(
        classifier.name(),
        "distilbert-base-uncased-finetuned-sst-2-english"
    );
}

#[test]
#[ignore]
fn classifies_clear_sentiment() {
    let classifier = load_default();

    let result = classifier.classify("I love this product").unwrap();
    assert_eq!(result.label, "POSITIVE");
    assert!(result.score > 0.5);

    let result = classifier.classify("This is terrible").unwrap();
    assert_eq!(result.label, "NEGATIVE");
    assert!(result.score > 0.5);
}

#[test]
#[ignore]
fn classification_is_deterministic() {
    let classifier = load_default();

    let first = classifier.classify("The service was fine, I guess.").unwrap();
    let second = classifier.classify("The service was fine, I guess.").unwrap();
    assert_eq!(first, second);
}

#[test]
#[ignore]
fn very_long_input_is_truncated_not_rejected() {
    let classifier = load_default();

    let text = "wonderful ".repeat(2_000);
    let result = classifier.classify(&text).unwrap();
    assert!((0.0..=1.0).contains(&result.score));
}

#[test]
#[ignore]
fn empty_input_is_invalid() {
    let classifier = load_default();
    let err = classifier.classify("  ").unwrap_err();
    assert!(matches!(err, MimirError::InvalidInput(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore]
async fn concurrent_classification_through_service() {
    let classifier = tokio::task::spawn_blocking(load_default).await.unwrap();
    let service = ClassificationService::new(Arc::new(classifier));

    let texts = [
        ("I love this product", "POSITIVE"),
        ("This is terrible", "NEGATIVE"),
        ("What a wonderful day", "POSITIVE"),
        ("I hate waiting in line", "NEGATIVE"),
    ];

    let handles: Vec<_> = texts
        .iter()
        .map(|(text, _)| {
            let service = service.clone();
            let text = text.to_string();
            tokio::spawn(async move { service.classify(text).await })
        })
        .collect();

    for ((text, label), handle) in texts.iter().zip(handles) {
        let result = handle.await.unwrap().unwrap();
        assert_eq!(result.label, *label, "wrong label for {text:?}");
    }
}
