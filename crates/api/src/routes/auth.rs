//! CRM authorization endpoints, operator-driven.

use axum::extract::State;
use axum::Json;
use leadforge_core::AuthStatus;
use serde::Deserialize;
use serde_json::{json, Value};

use super::ApiError;
use crate::context::AppContext;

#[derive(Debug, Deserialize)]
pub struct CallbackRequest {
    pub code: String,
}

/// `GET /api/auth/status`
///
/// Refreshes a stale token first when a refresh path exists, so the
/// reported state reflects what a delivery attempt would see.
pub async fn status(State(ctx): State<AppContext>) -> Json<AuthStatus> {
    Json(ctx.tokens.status().await)
}

/// `POST /api/auth/callback`
///
/// Completes the authorization-code exchange after the operator consents
/// on the authorization server.
pub async fn callback(
    State(ctx): State<AppContext>,
    Json(request): Json<CallbackRequest>,
) -> Result<Json<Value>, ApiError> {
    ctx.tokens.complete_authorization(&request.code).await?;
    Ok(Json(json!({ "success": true })))
}

/// `DELETE /api/auth/tokens`
///
/// The only path that removes stored credentials.
pub async fn clear(State(ctx): State<AppContext>) -> Result<Json<Value>, ApiError> {
    ctx.tokens.clear().await?;
    Ok(Json(json!({ "success": true })))
}
