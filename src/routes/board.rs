//! Board projection, move and stage catalog routes.
//!
//! `GET /api/board` groups the stored leads into the seven pipeline columns
//! with the same `kanban::columns` code a client board uses, so the server
//! projection and the on-screen columns always agree.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use kanban::columns::{ColumnSet, ColumnView, SortPolicy, group_leads};
use kanban::lead::{Lead, LeadId};
use kanban::stage::{LeadStatus, StageMeta};
use kanban::store::LeadFilter;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::routes::leads::lead_error_to_status;
use crate::services::lead::{self, MoveResult};
use crate::state::AppState;

#[cfg(test)]
#[path = "board_test.rs"]
mod tests;

#[derive(Debug, Default, Deserialize)]
pub struct BoardQuery {
    /// `score` or `input`; defaults to the configured order.
    pub sort: Option<String>,
    pub consultant_id: Option<Uuid>,
}

#[derive(Serialize)]
pub struct ColumnResponse {
    pub status: LeadStatus,
    pub title: String,
    pub meta: StageMeta,
    pub count: usize,
    pub leads: Vec<Lead>,
}

impl From<ColumnView<'_>> for ColumnResponse {
    fn from(view: ColumnView<'_>) -> Self {
        Self {
            status: view.status,
            title: view.title,
            meta: view.meta,
            count: view.leads.len(),
            leads: view.leads.into_iter().cloned().collect(),
        }
    }
}

#[derive(Serialize)]
pub struct BoardResponse {
    pub sort: SortPolicy,
    pub columns: Vec<ColumnResponse>,
}

#[derive(Deserialize)]
pub struct MoveBody {
    pub lead_id: LeadId,
    pub status: String,
}

#[derive(Serialize)]
pub struct StageResponse {
    pub status: LeadStatus,
    #[serde(flatten)]
    pub meta: StageMeta,
    pub closed: bool,
}

/// `GET /api/board`: leads grouped into pipeline columns.
pub async fn get_board(
    State(state): State<AppState>,
    Query(query): Query<BoardQuery>,
) -> Result<Json<BoardResponse>, StatusCode> {
    let sort = match query.sort.as_deref() {
        Some(raw) => SortPolicy::parse(raw).ok_or(StatusCode::BAD_REQUEST)?,
        None => state.board_sort,
    };
    let leads = lead::list_leads(&state, LeadFilter { consultant_id: query.consultant_id })
        .await
        .map_err(lead_error_to_status)?;

    let columns = group_leads(&leads, &ColumnSet::pipeline(), sort)
        .into_iter()
        .map(ColumnResponse::from)
        .collect();
    Ok(Json(BoardResponse { sort, columns }))
}

/// `POST /api/board/move`: a completed drop. `204` when the lead is already
/// in the target column, otherwise `200` with the stored record.
pub async fn move_lead(State(state): State<AppState>, Json(body): Json<MoveBody>) -> Result<Response, StatusCode> {
    let result = lead::move_lead(&state, body.lead_id, &body.status)
        .await
        .map_err(lead_error_to_status)?;
    Ok(match result {
        MoveResult::Moved { lead, .. } => Json(lead).into_response(),
        MoveResult::Unchanged(_) => StatusCode::NO_CONTENT.into_response(),
    })
}

/// `GET /api/stages`: the stage catalog in pipeline order.
pub async fn list_stages() -> Json<Vec<StageResponse>> {
    Json(
        LeadStatus::ALL
            .into_iter()
            .map(|status| StageResponse { status, meta: status.meta(), closed: status.is_closed() })
            .collect(),
    )
}
