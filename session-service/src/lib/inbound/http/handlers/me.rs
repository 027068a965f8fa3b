use auth::Role;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedSubject;

/// Identity echo for the bearer of a valid access token.
pub async fn me(
    Extension(subject): Extension<AuthenticatedSubject>,
) -> Result<ApiSuccess<MeResponseData>, ApiError> {
    Ok(ApiSuccess::new(
        StatusCode::OK,
        MeResponseData {
            id: subject.claims.sub,
            email: subject.claims.email,
            role: subject.claims.role,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeResponseData {
    pub id: String,
    pub email: String,
    pub role: Role,
}
