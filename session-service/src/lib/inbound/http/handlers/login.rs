use auth::Role;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::session::models::EmailAddress;
use crate::domain::session::models::SessionTokens;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequestBody>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    // An unparseable email gets the same response as bad credentials so the
    // endpoint cannot be used to probe address validity.
    let email = EmailAddress::new(body.email)
        .map_err(|_| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    let tokens = state.session_service.login(&email, &body.password).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        LoginResponseData::from(&tokens),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub access_token: String,
    pub refresh_token: String,
    pub subject: SubjectData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectData {
    pub id: String,
    pub email: String,
    pub role: Role,
}

impl From<&SessionTokens> for LoginResponseData {
    fn from(tokens: &SessionTokens) -> Self {
        Self {
            access_token: tokens.access_token.clone(),
            refresh_token: tokens.refresh_token.clone(),
            subject: SubjectData {
                id: tokens.subject.id.to_string(),
                email: tokens.subject.email.to_string(),
                role: tokens.subject.role,
            },
        }
    }
}
