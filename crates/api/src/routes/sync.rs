//! Manual sync trigger.

use axum::extract::State;
use axum::Json;
use leadforge_core::TickReport;

use super::ApiError;
use crate::context::AppContext;

/// `POST /api/sync/tick`
///
/// Same contract as the scheduled trigger: refresh the token if needed,
/// then drain the pending backlog. Safe to call at any time.
pub async fn tick(State(ctx): State<AppContext>) -> Result<Json<TickReport>, ApiError> {
    Ok(Json(ctx.service.tick().await?))
}
