use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use docstore_core::CoreError;

/// Wraps `docstore_core::CoreError` with the HTTP status it maps to. This
/// is the only place in the repo that knows a `CoreError` tag corresponds
/// to a status code — `docstore-core` itself stays HTTP-agnostic.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ApiError(pub CoreError);

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError(err)
    }
}

pub fn status_for(err: &CoreError) -> StatusCode {
    match err {
        CoreError::InvalidDbName => StatusCode::BAD_REQUEST,
        CoreError::DbExists => StatusCode::PRECONDITION_FAILED,
        CoreError::DbNotFound => StatusCode::NOT_FOUND,
        CoreError::InvalidBody => StatusCode::BAD_REQUEST,
        CoreError::InvalidRevId => StatusCode::BAD_REQUEST,
        CoreError::ReservedField => StatusCode::BAD_REQUEST,
        CoreError::DocConflict => StatusCode::CONFLICT,
        CoreError::DocNotFound => StatusCode::NOT_FOUND,
        CoreError::EmptyBulk => StatusCode::BAD_REQUEST,
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        tracing::debug!(tag = self.0.tag(), %status, "request rejected");
        (
            status,
            Json(ErrorBody {
                error: self.0.tag(),
            }),
        )
            .into_response()
    }
}
