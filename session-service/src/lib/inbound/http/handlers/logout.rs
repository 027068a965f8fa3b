use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;

/// Revoke a refresh token. Succeeds whether or not the token exists; the
/// response does not reveal which.
pub async fn logout(
    State(state): State<AppState>,
    Json(body): Json<LogoutRequestBody>,
) -> Result<ApiSuccess<()>, ApiError> {
    state
        .session_service
        .logout(&body.refresh_token)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::NO_CONTENT, ()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogoutRequestBody {
    refresh_token: String,
}
