//! Lead CRUD, interaction history and JSONL transfer routes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Json, Response};
use kanban::lead::{Interaction, Lead};
use kanban::store::LeadFilter;
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use crate::services::lead::{self, CreateLeadInput, InteractionInput, LeadError, PatchLeadInput};
use crate::services::transfer::{self, ImportSummary};
use crate::state::AppState;

#[cfg(test)]
#[path = "leads_test.rs"]
mod tests;

#[derive(Debug, Default, Deserialize)]
pub struct LeadQuery {
    pub consultant_id: Option<Uuid>,
}

impl LeadQuery {
    fn filter(&self) -> LeadFilter {
        LeadFilter { consultant_id: self.consultant_id }
    }
}

#[derive(Deserialize)]
pub struct ImportJsonlBody {
    pub jsonl: String,
}

pub(crate) fn lead_error_to_status(err: LeadError) -> StatusCode {
    let status = match &err {
        LeadError::NotFound(_) => StatusCode::NOT_FOUND,
        LeadError::InvalidStatus(_) | LeadError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        LeadError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        warn!(code = err.error_code(), error = %err, "lead request failed");
    }
    status
}

/// `GET /api/leads`: list leads, optionally for one consultant.
pub async fn list_leads(
    State(state): State<AppState>,
    Query(query): Query<LeadQuery>,
) -> Result<Json<Vec<Lead>>, StatusCode> {
    let leads = lead::list_leads(&state, query.filter())
        .await
        .map_err(lead_error_to_status)?;
    Ok(Json(leads))
}

/// `POST /api/leads`: create a lead.
pub async fn create_lead(
    State(state): State<AppState>,
    Json(body): Json<CreateLeadInput>,
) -> Result<(StatusCode, Json<Lead>), StatusCode> {
    let lead = lead::create_lead(&state, body)
        .await
        .map_err(lead_error_to_status)?;
    Ok((StatusCode::CREATED, Json(lead)))
}

/// `GET /api/leads/:id`: fetch one lead.
pub async fn get_lead(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Lead>, StatusCode> {
    let lead = lead::get_lead(&state, id)
        .await
        .map_err(lead_error_to_status)?;
    Ok(Json(lead))
}

/// `PATCH /api/leads/:id`: sparse update.
pub async fn update_lead(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<PatchLeadInput>,
) -> Result<Json<Lead>, StatusCode> {
    let lead = lead::update_lead(&state, id, body)
        .await
        .map_err(lead_error_to_status)?;
    Ok(Json(lead))
}

/// `DELETE /api/leads/:id`: remove a lead and its history.
pub async fn delete_lead(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, StatusCode> {
    lead::delete_lead(&state, id)
        .await
        .map_err(lead_error_to_status)?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/leads/:id/interactions`: history, newest first.
pub async fn list_interactions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Interaction>>, StatusCode> {
    let interactions = lead::list_interactions(&state, id)
        .await
        .map_err(lead_error_to_status)?;
    Ok(Json(interactions))
}

/// `POST /api/leads/:id/interactions`: log a call, email, meeting or note.
pub async fn add_interaction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<InteractionInput>,
) -> Result<(StatusCode, Json<Interaction>), StatusCode> {
    let interaction = lead::add_interaction(&state, id, body)
        .await
        .map_err(lead_error_to_status)?;
    Ok((StatusCode::CREATED, Json(interaction)))
}

/// `GET /api/leads/export.jsonl`: download leads and history as NDJSON/JSONL.
pub async fn export_jsonl(
    State(state): State<AppState>,
    Query(query): Query<LeadQuery>,
) -> Result<Response, StatusCode> {
    let lines = transfer::export_lines(&state, query.filter())
        .await
        .map_err(lead_error_to_status)?;

    let stream = futures::stream::iter(
        lines
            .into_iter()
            .map(|line| Ok::<axum::body::Bytes, std::convert::Infallible>(axum::body::Bytes::from(line))),
    );
    let body = axum::body::Body::from_stream(stream);

    Ok((
        [
            (CONTENT_TYPE, "application/x-ndjson; charset=utf-8"),
            (CONTENT_DISPOSITION, "attachment; filename=\"leads.jsonl\""),
        ],
        body,
    )
        .into_response())
}

/// `POST /api/leads/import.jsonl`: import NDJSON/JSONL lead and interaction lines.
pub async fn import_jsonl(
    State(state): State<AppState>,
    Json(body): Json<ImportJsonlBody>,
) -> Result<Json<ImportSummary>, StatusCode> {
    let summary = transfer::import_jsonl(&state, &body.jsonl)
        .await
        .map_err(lead_error_to_status)?;
    Ok(Json(summary))
}
