use auth::AccessClaims;
use auth::GuardError;
use auth::Role;
use axum::extract::Request;
use axum::extract::State;
use axum::http;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;
use crate::session::errors::SessionError;

/// Extension type carrying the verified claims of the authenticated subject.
#[derive(Debug, Clone)]
pub struct AuthenticatedSubject {
    pub claims: AccessClaims,
}

/// Middleware that authorizes the bearer token and adds the verified claims
/// to request extensions.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| {
            ApiError::Unauthorized("Missing authorization header".to_string()).into_response()
        })?;

    let header = header.to_str().map_err(|_| {
        ApiError::BadRequest("Invalid authorization header".to_string()).into_response()
    })?;

    let claims = state.guard.authorize(header).map_err(|e| {
        match e {
            // Shape errors are user-fixable; token rejections are not, and
            // stay deliberately unspecific.
            GuardError::MalformedHeader => ApiError::from(SessionError::Validation(
                "Invalid authorization header".to_string(),
            )),
            GuardError::Token(token_err) => {
                tracing::debug!(reason = ?token_err.reason(), "Access token rejected");
                ApiError::Unauthorized("Invalid or expired token".to_string())
            }
        }
        .into_response()
    })?;

    req.extensions_mut().insert(AuthenticatedSubject { claims });

    Ok(next.run(req).await)
}

/// Middleware gating a route on the Admin role. Must run after
/// [`authenticate`].
pub async fn require_admin(req: Request, next: Next) -> Result<Response, Response> {
    let subject = req
        .extensions()
        .get::<AuthenticatedSubject>()
        .ok_or_else(|| {
            ApiError::Unauthorized("Missing authorization header".to_string()).into_response()
        })?;

    if !subject.claims.role.at_least(Role::Admin) {
        let err = SessionError::Authorization {
            required: Role::Admin,
        };
        return Err(ApiError::from(err).into_response());
    }

    Ok(next.run(req).await)
}
