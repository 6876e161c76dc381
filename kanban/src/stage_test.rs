use super::*;

#[test]
fn there_are_exactly_seven_stages() {
    assert_eq!(LeadStatus::ALL.len(), 7);
}

#[test]
fn parse_accepts_every_wire_name() {
    for status in LeadStatus::ALL {
        assert_eq!(LeadStatus::parse(status.as_str()), Some(status));
    }
}

#[test]
fn parse_rejects_unknown_and_differently_cased_names() {
    assert_eq!(LeadStatus::parse("archived"), None);
    assert_eq!(LeadStatus::parse("Qualified"), None);
    assert_eq!(LeadStatus::parse(""), None);
}

#[test]
fn from_str_reports_the_offending_value() {
    let err = "won".parse::<LeadStatus>().unwrap_err();
    assert_eq!(err, UnknownStatus("won".into()));
    assert_eq!(err.to_string(), "unknown lead status: won");
}

#[test]
fn serde_uses_wire_names() {
    let json = serde_json::to_string(&LeadStatus::Meeting).unwrap();
    assert_eq!(json, "\"meeting\"");
    let back: LeadStatus = serde_json::from_str("\"proposal\"").unwrap();
    assert_eq!(back, LeadStatus::Proposal);
}

#[test]
fn display_matches_as_str() {
    assert_eq!(LeadStatus::Client.to_string(), "client");
}

#[test]
fn every_stage_has_distinct_color_and_label() {
    let mut colors: Vec<_> = LeadStatus::ALL.iter().map(|s| s.meta().color).collect();
    let mut labels: Vec<_> = LeadStatus::ALL.iter().map(|s| s.meta().label).collect();
    colors.sort_unstable();
    colors.dedup();
    labels.sort_unstable();
    labels.dedup();
    assert_eq!(colors.len(), 7);
    assert_eq!(labels.len(), 7);
}

#[test]
fn only_client_and_lost_are_closed() {
    let closed: Vec<_> = LeadStatus::ALL.into_iter().filter(|s| s.is_closed()).collect();
    assert_eq!(closed, vec![LeadStatus::Client, LeadStatus::Lost]);
}
