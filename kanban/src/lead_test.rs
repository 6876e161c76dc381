use super::*;

fn sample_lead() -> Lead {
    NewLead { name: "Ada".into(), score: Some(50), ..NewLead::default() }.into_lead(1_000)
}

#[test]
fn new_lead_defaults_to_new_stage() {
    let lead = sample_lead();
    assert_eq!(lead.status, "new");
    assert_eq!(lead.stage(), Some(LeadStatus::New));
    assert_eq!(lead.created_at, 1_000);
    assert_eq!(lead.updated_at, 1_000);
}

#[test]
fn new_lead_clamps_score() {
    let high = NewLead { name: "x".into(), score: Some(140), ..NewLead::default() }.into_lead(0);
    let low = NewLead { name: "y".into(), score: Some(-3), ..NewLead::default() }.into_lead(0);
    assert_eq!(high.score, Some(100));
    assert_eq!(low.score, Some(0));
}

#[test]
fn unknown_stored_status_has_no_stage() {
    let mut lead = sample_lead();
    lead.status = "archived".into();
    assert_eq!(lead.stage(), None);
}

#[test]
fn status_patch_changes_only_status_and_timestamp() {
    let mut lead = sample_lead();
    let before = lead.clone();
    lead.apply_patch(&LeadPatch::status(LeadStatus::Meeting), 2_000);

    assert_eq!(lead.status, "meeting");
    assert_eq!(lead.updated_at, 2_000);
    assert_eq!(lead.name, before.name);
    assert_eq!(lead.score, before.score);
    assert_eq!(lead.created_at, before.created_at);
}

#[test]
fn patch_applies_present_fields_and_clamps_score() {
    let mut lead = sample_lead();
    let patch = LeadPatch {
        email: Some("ada@example.com".into()),
        score: Some(250),
        notes: Some("warm".into()),
        ..LeadPatch::default()
    };
    lead.apply_patch(&patch, 5);
    assert_eq!(lead.email.as_deref(), Some("ada@example.com"));
    assert_eq!(lead.score, Some(100));
    assert_eq!(lead.notes.as_deref(), Some("warm"));
    assert_eq!(lead.phone, None);
}

#[test]
fn status_patch_serializes_to_status_only() {
    let json = serde_json::to_value(LeadPatch::status(LeadStatus::Client)).unwrap();
    assert_eq!(json, serde_json::json!({ "status": "client" }));
}

#[test]
fn patch_rejects_unknown_status_on_deserialize() {
    let result = serde_json::from_str::<LeadPatch>(r#"{"status":"archived"}"#);
    assert!(result.is_err());
}

#[test]
fn empty_patch_is_empty() {
    assert!(LeadPatch::default().is_empty());
    assert!(!LeadPatch::status(LeadStatus::New).is_empty());
}

#[test]
fn interaction_kind_round_trips_wire_names() {
    for kind in [
        InteractionKind::Note,
        InteractionKind::Call,
        InteractionKind::Email,
        InteractionKind::Meeting,
        InteractionKind::StatusChange,
    ] {
        assert_eq!(InteractionKind::parse(kind.as_str()), Some(kind));
    }
    assert_eq!(InteractionKind::parse("sms"), None);
}

#[test]
fn now_ms_is_after_2020() {
    assert!(now_ms() > 1_577_836_800_000);
}
