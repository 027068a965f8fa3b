use std::sync::Arc;
use std::time::Duration;

use auth::AuthGuard;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::me::me;
use super::handlers::purge::purge;
use super::handlers::refresh::refresh;
use super::middleware::authenticate as auth_middleware;
use super::middleware::require_admin;
use crate::session::ports::SessionServicePort;

#[derive(Clone)]
pub struct AppState {
    pub session_service: Arc<dyn SessionServicePort>,
    pub guard: Arc<AuthGuard>,
}

pub fn create_router(session_service: Arc<dyn SessionServicePort>, guard: Arc<AuthGuard>) -> Router {
    let state = AppState {
        session_service,
        guard,
    };

    let public_routes = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/refresh", post(refresh))
        .route("/api/auth/logout", post(logout));

    let protected_routes = Router::new().route("/api/auth/me", get(me)).route_layer(
        middleware::from_fn_with_state(state.clone(), auth_middleware),
    );

    // Outermost layer runs first: authenticate, then the role gate.
    let admin_routes = Router::new()
        .route("/api/auth/sessions/purge", post(purge))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
