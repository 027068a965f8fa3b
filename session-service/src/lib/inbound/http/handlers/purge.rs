use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;

/// Run the expiry sweep on demand. Admin-gated by the router.
pub async fn purge(
    State(state): State<AppState>,
) -> Result<ApiSuccess<PurgeResponseData>, ApiError> {
    let deleted = state.session_service.sweep_expired().await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        PurgeResponseData { deleted },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurgeResponseData {
    pub deleted: u64,
}
