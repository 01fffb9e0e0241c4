use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::error::HorizonError;

/// Failure as the client sees it: a status and the underlying message.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    /// Every failure is a 500 unless `distinct` asks for per-kind codes.
    pub fn from_failure(err: HorizonError, distinct: bool) -> Self {
        let status = if distinct {
            match &err {
                HorizonError::InsufficientData { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                HorizonError::ModelNotFound(_) => StatusCode::NOT_FOUND,
                HorizonError::UpstreamFetch(_) => StatusCode::BAD_GATEWAY,
                HorizonError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
                HorizonError::Storage(_) | HorizonError::ModelFit(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        log::warn!("Request failed ({}): {}", status, err);
        Self {
            status,
            detail: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({ "detail": self.detail });
        (self.status, axum::Json(body)).into_response()
    }
}
