use super::*;
use crate::state::test_helpers::{seed_lead, test_app_state};
use http_body_util::BodyExt;
use kanban::stage::{LeadStatus, UnknownStatus};

// =============================================================================
// lead_error_to_status
// =============================================================================

#[test]
fn lead_error_to_status_maps_not_found() {
    assert_eq!(lead_error_to_status(LeadError::NotFound(Uuid::nil())), StatusCode::NOT_FOUND);
}

#[test]
fn lead_error_to_status_maps_validation_to_bad_request() {
    let status = LeadError::InvalidStatus(UnknownStatus("won".into()));
    assert_eq!(lead_error_to_status(status), StatusCode::BAD_REQUEST);
    assert_eq!(lead_error_to_status(LeadError::InvalidInput("x".into())), StatusCode::BAD_REQUEST);
}

#[test]
fn lead_error_to_status_maps_store_to_internal_error() {
    assert_eq!(lead_error_to_status(LeadError::Store("down".into())), StatusCode::INTERNAL_SERVER_ERROR);
}

// =============================================================================
// Handlers
// =============================================================================

#[tokio::test]
async fn create_then_get_lead() {
    let state = test_app_state();
    let body = CreateLeadInput { name: "Ada".into(), status: Some("contacted".into()), ..CreateLeadInput::default() };
    let (status, Json(created)) = create_lead(State(state.clone()), Json(body)).await.unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created.status, "contacted");

    let Json(fetched) = get_lead(State(state), Path(created.id)).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn create_with_unknown_status_is_bad_request() {
    let state = test_app_state();
    let body = CreateLeadInput { name: "Ada".into(), status: Some("won".into()), ..CreateLeadInput::default() };
    assert_eq!(create_lead(State(state), Json(body)).await.unwrap_err(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_filters_by_consultant() {
    let state = test_app_state();
    let consultant = Uuid::new_v4();
    let mine = CreateLeadInput { name: "Mine".into(), consultant_id: Some(consultant), ..CreateLeadInput::default() };
    create_lead(State(state.clone()), Json(mine)).await.unwrap();
    seed_lead(&state, "Other", LeadStatus::New, None).await;

    let Json(all) = list_leads(State(state.clone()), Query(LeadQuery::default())).await.unwrap();
    assert_eq!(all.len(), 2);
    let Json(filtered) = list_leads(State(state), Query(LeadQuery { consultant_id: Some(consultant) }))
        .await
        .unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].name, "Mine");
}

#[tokio::test]
async fn patch_and_delete() {
    let state = test_app_state();
    let lead = seed_lead(&state, "Ada", LeadStatus::New, None).await;

    let patch = PatchLeadInput { score: Some(55), ..PatchLeadInput::default() };
    let Json(updated) = update_lead(State(state.clone()), Path(lead.id), Json(patch)).await.unwrap();
    assert_eq!(updated.score, Some(55));

    let empty = PatchLeadInput::default();
    assert_eq!(
        update_lead(State(state.clone()), Path(lead.id), Json(empty)).await.unwrap_err(),
        StatusCode::BAD_REQUEST
    );

    assert_eq!(delete_lead(State(state.clone()), Path(lead.id)).await.unwrap(), StatusCode::NO_CONTENT);
    assert_eq!(get_lead(State(state), Path(lead.id)).await.unwrap_err(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn interactions_round_trip_through_handlers() {
    let state = test_app_state();
    let lead = seed_lead(&state, "Ada", LeadStatus::Meeting, None).await;

    let body = InteractionInput { kind: "meeting".into(), body: "demo booked".into() };
    let (status, Json(added)) = add_interaction(State(state.clone()), Path(lead.id), Json(body)).await.unwrap();
    assert_eq!(status, StatusCode::CREATED);

    let Json(history) = list_interactions(State(state.clone()), Path(lead.id)).await.unwrap();
    assert_eq!(history, vec![added]);
    assert_eq!(
        list_interactions(State(state), Path(Uuid::new_v4())).await.unwrap_err(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn export_is_ndjson_attachment() {
    let state = test_app_state();
    seed_lead(&state, "Ada", LeadStatus::New, None).await;

    let response = export_jsonl(State(state), Query(LeadQuery::default())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "application/x-ndjson; charset=utf-8");
    assert!(
        response.headers()[CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("leads.jsonl")
    );

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("lead_export_meta"));
    assert!(lines[1].contains("\"name\":\"Ada\""));
}

#[tokio::test]
async fn import_reports_summary() {
    let state = test_app_state();
    let body = ImportJsonlBody { jsonl: "{\"name\":\"Ada\"}\n{\"type\":\"lead\"}\n".into() };
    let Json(summary) = import_jsonl(State(state.clone()), Json(body)).await.unwrap();
    assert_eq!(summary.imported, 1);
    assert_eq!(summary.skipped, 1);

    let Json(leads) = list_leads(State(state), Query(LeadQuery::default())).await.unwrap();
    assert_eq!(leads[0].name, "Ada");
}
