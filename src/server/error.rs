//! Translation of request failures into HTTP responses.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::dto::ErrorBody;
use crate::MimirError;

/// Message returned for every server-side failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "inference failed";

/// Everything a handler can fail with.
#[derive(Debug)]
pub enum ApiError {
    /// The body was not JSON, or did not match the expected shape.
    Rejected(JsonRejection),
    /// The service refused or failed the request.
    Service(MimirError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected(rejection)
    }
}

impl From<MimirError> for ApiError {
    fn from(err: MimirError) -> Self {
        Self::Service(err)
    }
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Rejected(rejection) => rejection.status(),
            Self::Service(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Service(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show the caller. Server-side details stay in the logs.
    pub fn message(&self) -> String {
        match self {
            Self::Rejected(rejection) => rejection.body_text(),
            Self::Service(MimirError::InvalidInput(reason)) => reason.clone(),
            Self::Service(_) => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.message(),
        };
        (status, Json(body)).into_response()
    }
}
