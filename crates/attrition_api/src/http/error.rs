use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, warn};

use crate::error::{ErrorKind, WorkflowError};

const INTERNAL_ERROR_DETAIL: &str = "Internal server error";

/// Default and maximum page sizes for list endpoints.
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Error response with a `{"detail": ...}` body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    #[must_use]
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    #[must_use]
    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Missing or invalid API key")
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        match err.kind() {
            ErrorKind::NotFound => Self::new(StatusCode::NOT_FOUND, err.to_string()),
            ErrorKind::BadRequest => Self::new(StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
            ErrorKind::NotReady => {
                warn!(error = %err, "Prediction requested while the scorer is not ready");
                Self::new(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Prediction model is not available, retry later",
                )
            }
            ErrorKind::BadState => {
                error!(error = ?err, "Stored data failed to decode");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_DETAIL)
            }
            ErrorKind::Internal => {
                error!(error = ?err, "Request failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_DETAIL)
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

/// JSON body extractor whose rejections use the `detail` error body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path extractor whose rejections use the `detail` error body.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Query extractor whose rejections use the `detail` error body.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// `?skip=&limit=` query parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

const fn default_limit() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Pagination {
    /// Offset and page size as SQL parameters, with the page size capped.
    #[must_use]
    pub fn bounds(self) -> (i64, i64) {
        (
            i64::from(self.skip),
            i64::from(self.limit.min(MAX_PAGE_SIZE)),
        )
    }
}
