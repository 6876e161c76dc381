//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the lead and board REST endpoints under one Axum router.
//! Every request is traced, responses are gzip-compressed when the client
//! accepts it, and CORS is open so a browser board on another origin can call
//! the API directly.

pub mod board;
pub mod leads;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

/// Full API router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/leads", get(leads::list_leads).post(leads::create_lead))
        .route("/api/leads/export.jsonl", get(leads::export_jsonl))
        .route("/api/leads/import.jsonl", post(leads::import_jsonl))
        .route(
            "/api/leads/{id}",
            get(leads::get_lead)
                .patch(leads::update_lead)
                .delete(leads::delete_lead),
        )
        .route(
            "/api/leads/{id}/interactions",
            get(leads::list_interactions).post(leads::add_interaction),
        )
        .route("/api/board", get(board::get_board))
        .route("/api/board/move", post(board::move_lead))
        .route("/api/stages", get(board::list_stages))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
