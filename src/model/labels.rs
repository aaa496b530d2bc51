//! Label set resolution from HuggingFace `config.json`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{MimirError, Result};

/// Labels of the default SST-2 model, in logit order.
pub const DEFAULT_LABELS: [&str; 2] = ["NEGATIVE", "POSITIVE"];

/// The parts of a HuggingFace model config that matter for classification.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelConfig {
    /// Architecture family, e.g. "distilbert" or "bert".
    #[serde(default)]
    pub model_type: Option<String>,
    /// Logit index → label name. Keys are stringified integers.
    #[serde(default)]
    pub id2label: BTreeMap<String, String>,
}

impl ModelConfig {
    /// Read a `config.json` from disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            MimirError::ModelLoad(format!("Failed to read model config {path:?}: {e}"))
        })?;
        Self::from_json(&content)
    }

    /// Parse a `config.json` document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Labels ordered by logit index.
    ///
    /// Returns `None` when the config carries no `id2label`. Indices must be
    /// contiguous from zero.
    pub fn labels(&self) -> Result<Option<Vec<String>>> {
        if self.id2label.is_empty() {
            return Ok(None);
        }

        let mut indexed = self
            .id2label
            .iter()
            .map(|(id, label)| {
                id.parse::<usize>()
                    .map(|i| (i, label.clone()))
                    .map_err(|_| MimirError::ModelLoad(format!("invalid id2label key '{id}'")))
            })
            .collect::<Result<Vec<_>>>()?;
        indexed.sort_by_key(|(i, _)| *i);

        if indexed.iter().enumerate().any(|(pos, (i, _))| pos != *i) {
            return Err(MimirError::ModelLoad(
                "id2label indices are not contiguous from 0".to_string(),
            ));
        }

        Ok(Some(indexed.into_iter().map(|(_, label)| label).collect()))
    }

    /// Whether the exported graph takes a `token_type_ids` input.
    ///
    /// DistilBERT and RoBERTa style models drop segment embeddings.
    pub fn expects_token_type_ids(&self) -> bool {
        matches!(
            self.model_type.as_deref(),
            Some("bert" | "albert" | "electra" | "deberta" | "deberta-v2")
        )
    }
}

/// Pick the label set: explicit override, then the model config, then the
/// SST-2 defaults.
pub fn resolve_labels(
    overridden: Option<Vec<String>>,
    config: Option<&ModelConfig>,
) -> Result<Vec<String>> {
    if let Some(labels) = overridden {
        if labels.is_empty() {
            return Err(MimirError::Configuration(
                "label override must not be empty".to_string(),
            ));
        }
        return Ok(labels);
    }

    if let Some(labels) = config.map(ModelConfig::labels).transpose()?.flatten() {
        return Ok(labels);
    }

    Ok(DEFAULT_LABELS.iter().map(|l| l.to_string()).collect())
}

/// Check that the label set covers exactly the logits the model produces.
pub fn check_label_count(labels: &[String], logits: usize) -> Result<()> {
    if labels.len() != logits {
        return Err(MimirError::ModelLoad(format!(
            "model produces {} logits but {} labels are configured ({})",
            logits,
            labels.len(),
            labels.join(", ")
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SST2_CONFIG: &str = r#"{
        "architectures": ["DistilBertForSequenceClassification"],
        "model_type": "distilbert",
        "id2label": {"0": "NEGATIVE", "1": "POSITIVE"},
        "label2id": {"NEGATIVE": 0, "POSITIVE": 1}
    }"#;

    #[test]
    fn parses_sst2_config() {
        let config = ModelConfig::from_json(SST2_CONFIG).unwrap();
        assert_eq!(
            config.labels().unwrap(),
            Some(vec!["NEGATIVE".to_string(), "POSITIVE".to_string()])
        );
        assert!(!config.expects_token_type_ids());
    }

    #[test]
    fn orders_labels_numerically() {
        // "10" sorts before "2" as a string
        let mut json = String::from(r#"{"model_type": "bert", "id2label": {"#);
        let entries: Vec<String> = (0..11).map(|i| format!(r#""{i}": "L{i}""#)).collect();
        json.push_str(&entries.join(","));
        json.push_str("}}");

        let config = ModelConfig::from_json(&json).unwrap();
        let labels = config.labels().unwrap().unwrap();
        assert_eq!(labels[2], "L2");
        assert_eq!(labels[10], "L10");
        assert!(config.expects_token_type_ids());
    }

    #[test]
    fn gaps_in_ids_are_rejected() {
        let config = ModelConfig::from_json(r#"{"id2label": {"0": "A", "2": "C"}}"#).unwrap();
        assert!(config.labels().is_err());
    }

    #[test]
    fn override_wins_over_config() {
        let config = ModelConfig::from_json(SST2_CONFIG).unwrap();
        let labels = resolve_labels(Some(vec!["neg".into(), "pos".into()]), Some(&config)).unwrap();
        assert_eq!(labels, vec!["neg", "pos"]);
    }

    #[test]
    fn falls_back_to_sst2_labels() {
        let labels = resolve_labels(None, None).unwrap();
        assert_eq!(labels, vec!["NEGATIVE", "POSITIVE"]);

        let empty = ModelConfig::default();
        let labels = resolve_labels(None, Some(&empty)).unwrap();
        assert_eq!(labels, vec!["NEGATIVE", "POSITIVE"]);
    }

    #[test]
    fn label_count_must_match_logits() {
        let labels = resolve_labels(Some(vec!["a".into(), "b".into(), "c".into()]), None).unwrap();
        let err = check_label_count(&labels, 2).unwrap_err();
        assert!(matches!(err, MimirError::ModelLoad(_)));
        assert!(err.to_string().contains("2 logits but 3 labels"));

        assert!(check_label_count(&labels, 3).is_ok());
    }

    #[test]
    fn empty_override_is_rejected() {
        assert!(resolve_labels(Some(vec![]), None).is_err());
    }
}
