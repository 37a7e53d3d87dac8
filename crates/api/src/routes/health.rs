//! Health endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::context::AppContext;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub authenticated: bool,
}

/// `GET /api/health`
pub async fn check(State(ctx): State<AppContext>) -> (StatusCode, Json<HealthResponse>) {
    let database_ok = ctx.health_check().is_ok();
    let authenticated = ctx.tokens.is_access_token_valid().await;

    let (status, label) = if database_ok {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    let body = HealthResponse {
        status: label,
        database: if database_ok { "ok" } else { "unreachable" },
        authenticated,
    };
    (status, Json(body))
}
