//! HTTP routes and error mapping.

pub mod auth;
pub mod health;
pub mod leads;
pub mod sync;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use leadforge_domain::LeadForgeError;
use serde_json::json;

use crate::context::AppContext;

/// Build the application router.
pub fn router(ctx: AppContext) -> Router {
    Router::new()
        .route("/api/leads", post(leads::capture))
        .route("/api/leads/stats", get(leads::stats))
        .route("/api/leads/{id}", get(leads::get))
        .route("/api/auth/status", get(auth::status))
        .route("/api/auth/callback", post(auth::callback))
        .route("/api/auth/tokens", delete(auth::clear))
        .route("/api/sync/tick", post(sync::tick))
        .route("/api/health", get(health::check))
        .with_state(ctx)
}

/// Wrapper that maps domain errors onto HTTP responses.
#[derive(Debug)]
pub struct ApiError(pub LeadForgeError);

impl From<LeadForgeError> for ApiError {
    fn from(err: LeadForgeError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            LeadForgeError::Validation(_) => StatusCode::BAD_REQUEST,
            LeadForgeError::AuthRequired => StatusCode::UNAUTHORIZED,
            LeadForgeError::NotFound(_) => StatusCode::NOT_FOUND,
            LeadForgeError::TokenRefresh(_)
            | LeadForgeError::CrmApi { .. }
            | LeadForgeError::Network(_) => StatusCode::BAD_GATEWAY,
            LeadForgeError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            LeadForgeError::Database(_)
            | LeadForgeError::Config(_)
            | LeadForgeError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        (status, Json(json!({ "success": false, "error": self.0 }))).into_response()
    }
}
