//! HTTP routes.
//!
//! | Method | Path       | Purpose                               |
//! |--------|------------|---------------------------------------|
//! | GET    | `/`        | Interactive demo page                 |
//! | POST   | `/predict` | Classify `{"text": ...}`              |
//! | GET    | `/health`  | Liveness plus model name and labels   |

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::warn;

use super::dto::{HealthResponse, PredictRequest, PredictResponse};
use super::error::ApiError;
use crate::{BuildInfo, ClassificationService};

/// The demo page, served verbatim.
pub const INDEX_HTML: &str = include_str!("index.html");

/// Build the application router around a classification service.
pub fn router(service: ClassificationService) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/predict", post(predict))
        .route("/health", get(health))
        .with_state(service)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn predict(
    State(service): State<ClassificationService>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(request) = payload.inspect_err(|rejection| {
        warn!(
            status = %rejection.status(),
            reason = %rejection.body_text(),
            "malformed predict request"
        );
    })?;
    let classification = service.classify(request.text).await?;
    Ok(Json(classification.into()))
}

async fn health(State(service): State<ClassificationService>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        model: service.model_name().to_string(),
        labels: service.labels().to_vec(),
        build: BuildInfo::current(),
    })
}
