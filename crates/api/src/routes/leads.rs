//! Lead capture and stats endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use leadforge_core::DeliveryStatus;
use leadforge_domain::{Lead, LeadForgeError, LeadInput, LeadStats};
use serde::Serialize;
use uuid::Uuid;

use super::ApiError;
use crate::context::AppContext;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureResponse {
    pub success: bool,
    pub lead_id: Uuid,
    pub delivered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_lead_id: Option<String>,
}

/// `POST /api/leads`
///
/// The lead is durably stored before this returns anything but 400, so a
/// CRM outage or missing authentication still yields a persisted lead.
pub async fn capture(
    State(ctx): State<AppContext>,
    Json(input): Json<LeadInput>,
) -> Result<Response, ApiError> {
    let outcome = ctx.service.capture_lead(input).await?;

    let response = match outcome.delivery {
        DeliveryStatus::Delivered { external_lead_id } => (
            StatusCode::OK,
            Json(CaptureResponse {
                success: true,
                lead_id: outcome.lead.id,
                delivered: true,
                external_lead_id: Some(external_lead_id),
            }),
        )
            .into_response(),
        DeliveryStatus::Failed(_) => (
            // Persisted but not yet in the CRM; the next backlog pass
            // retries it.
            StatusCode::OK,
            Json(CaptureResponse {
                success: true,
                lead_id: outcome.lead.id,
                delivered: false,
                external_lead_id: None,
            }),
        )
            .into_response(),
        DeliveryStatus::AuthRequired => (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({
                "success": false,
                "error": LeadForgeError::AuthRequired,
                "leadId": outcome.lead.id,
            })),
        )
            .into_response(),
    };

    Ok(response)
}

/// `GET /api/leads/stats`
pub async fn stats(State(ctx): State<AppContext>) -> Result<Json<LeadStats>, ApiError> {
    Ok(Json(ctx.service.stats().await?))
}

/// `GET /api/leads/{id}` for diagnostics.
pub async fn get(
    State(ctx): State<AppContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<Lead>, ApiError> {
    let lead = ctx
        .service
        .get_lead(id)
        .await?
        .ok_or_else(|| LeadForgeError::NotFound(format!("lead {id}")))?;
    Ok(Json(lead))
}
