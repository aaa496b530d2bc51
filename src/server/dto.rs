//! Wire types for the HTTP API.

use serde::{Deserialize, Serialize};

use crate::BuildInfo;
use crate::types::Classification;

/// Body of `POST /predict`.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictRequest {
    pub text: String,
}

/// Successful `POST /predict` response.
///
/// `score` is the raw fraction in `[0, 1]`; the demo page turns it into a
/// percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub label: String,
    pub score: f32,
}

impl From<Classification> for PredictResponse {
    fn from(c: Classification) -> Self {
        Self {
            label: c.label,
            score: c.score,
        }
    }
}

/// Body of every 4xx/5xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// `GET /health` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
    pub labels: Vec<String>,
    pub build: BuildInfo,
}
