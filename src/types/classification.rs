//! Classification result type.

use serde::{Deserialize, Serialize};

use crate::error::{MimirError, Result};

/// Outcome of classifying a single text.
///
/// `score` is the model's confidence in `label`, as a raw fraction in
/// `[0, 1]`. Formatting it for humans is left to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// The winning label, always one of the model's label set.
    pub label: String,
    /// Probability assigned to `label`.
    pub score: f32,
}

impl Classification {
    /// Build a classification from raw logits.
    ///
    /// `labels[i]` names the class of `logits[i]`. The label with the highest
    /// probability wins; on ties the lowest index wins.
    pub fn from_logits(logits: &[f32], labels: &[String]) -> Result<Self> {
        if logits.is_empty() {
            return Err(MimirError::Inference("model returned no logits".to_string()));
        }
        if logits.len() != labels.len() {
            return Err(MimirError::Inference(format!(
                "expected {} logits, got {}",
                labels.len(),
                logits.len()
            )));
        }

        let probs = softmax(logits);
        let (index, score) = probs
            .iter()
            .copied()
            .enumerate()
            .fold((0, f32::NEG_INFINITY), |best, (i, p)| {
                if p > best.1 { (i, p) } else { best }
            });

        if !score.is_finite() {
            return Err(MimirError::Inference(
                "model produced non-finite scores".to_string(),
            ));
        }

        Ok(Self {
            label: labels[index].clone(),
            score: score.clamp(0.0, 1.0),
        })
    }
}

/// Softmax function.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.iter().map(|x| x / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentiment_labels() -> Vec<String> {
        vec!["NEGATIVE".to_string(), "POSITIVE".to_string()]
    }

    #[test]
    fn softmax_sums_to_one() {
        let probs = softmax(&[1.0, 2.0, 3.0]);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(probs[2] > probs[1]);
        assert!(probs[1] > probs[0]);
    }

    #[test]
    fn softmax_is_stable_for_large_logits() {
        let probs = softmax(&[1000.0, 1001.0]);
        assert!(probs.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn picks_highest_probability() {
        let result = Classification::from_logits(&[-4.2, 4.5], &sentiment_labels()).unwrap();
        assert_eq!(result.label, "POSITIVE");
        assert!(result.score > 0.99);
        assert!(result.score <= 1.0);
    }

    #[test]
    fn tie_favours_first_label() {
        let result = Classification::from_logits(&[0.0, 0.0], &sentiment_labels()).unwrap();
        assert_eq!(result.label, "NEGATIVE");
        assert!((result.score - 0.5).abs() < 1e-6);
    }

    #[test]
    fn label_count_mismatch_is_an_error() {
        let err = Classification::from_logits(&[0.1, 0.2, 0.3], &sentiment_labels()).unwrap_err();
        assert!(matches!(err, MimirError::Inference(_)));
    }

    #[test]
    fn nan_logits_are_an_error() {
        let err = Classification::from_logits(&[f32::NAN, 1.0], &sentiment_labels()).unwrap_err();
        assert!(matches!(err, MimirError::Inference(_)));
    }
}
