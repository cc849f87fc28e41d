use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

use super::{ApiError, AppState};

/// Header carrying the shared API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Rejects requests whose `X-API-Key` header does not match the configured key.
///
/// Passes every request through when no key is configured.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(expected) = state.api_key.as_deref() {
        let provided = request
            .headers()
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok());

        if provided != Some(expected) {
            warn!(
                path = %request.uri().path(),
                key_present = provided.is_some(),
                "Rejected request with missing or invalid API key"
            );
            return Err(ApiError::unauthorized());
        }
    }

    Ok(next.run(request).await)
}
