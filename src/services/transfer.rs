//! JSONL export and import of leads with their interaction history.
//!
//! Export format: one `lead_export_meta` line, then one `lead` line per lead
//! followed by that lead's `interaction` lines. Import accepts the same
//! format and is lenient: the meta line and unknown line types are skipped,
//! missing optional fields take defaults, and a lead line with no name or an
//! unknown stage is counted as skipped rather than failing the whole batch.
//! Lead ids are preserved so re-importing an export updates in place.

#[cfg(test)]
#[path = "transfer_test.rs"]
mod tests;

use std::collections::HashSet;

use kanban::lead::{Interaction, InteractionKind, Lead, clamp_score, now_ms};
use kanban::stage::LeadStatus;
use kanban::store::LeadFilter;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::services::lead::LeadError;
use crate::state::AppState;

const META_LINE_TYPE: &str = "lead_export_meta";
const EXPORT_VERSION: u32 = 1;

#[derive(Serialize)]
struct ExportMetaLine {
    #[serde(rename = "type")]
    line_type: &'static str,
    version: u32,
    exported_at_ms: i64,
    lead_count: usize,
    interaction_count: usize,
}

#[derive(Serialize)]
struct ExportLine<'a, T> {
    #[serde(rename = "type")]
    line_type: &'static str,
    #[serde(flatten)]
    record: &'a T,
}

/// One parsed import line.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportRecord {
    /// The export header; carries nothing to write.
    Meta,
    Lead(Lead),
    Interaction(Interaction),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub interactions: usize,
    pub skipped: usize,
}

// =============================================================================
// EXPORT
// =============================================================================

/// Serialize every matching lead and its history as newline-terminated lines.
///
/// # Errors
///
/// Store failures, or a record that fails to serialize.
pub async fn export_lines(state: &AppState, filter: LeadFilter) -> Result<Vec<String>, LeadError> {
    let leads = state.store.list_leads(filter).await?;
    let mut histories = Vec::with_capacity(leads.len());
    for lead in &leads {
        let mut history = state.store.list_interactions(lead.id).await?;
        history.reverse();
        histories.push(history);
    }

    let interaction_count = histories.iter().map(Vec::len).sum();
    let meta = ExportMetaLine {
        line_type: META_LINE_TYPE,
        version: EXPORT_VERSION,
        exported_at_ms: now_ms(),
        lead_count: leads.len(),
        interaction_count,
    };

    let mut lines = Vec::with_capacity(leads.len() + interaction_count + 1);
    lines.push(to_line(&meta)?);
    for (lead, history) in leads.iter().zip(&histories) {
        lines.push(to_line(&ExportLine { line_type: "lead", record: lead })?);
        for interaction in history {
            lines.push(to_line(&ExportLine { line_type: "interaction", record: interaction })?);
        }
    }
    Ok(lines)
}

fn to_line<T: Serialize>(value: &T) -> Result<String, LeadError> {
    let serialized = serde_json::to_string(value).map_err(|e| LeadError::Store(format!("export encode: {e}")))?;
    Ok(format!("{serialized}\n"))
}

// =============================================================================
// IMPORT
// =============================================================================

fn str_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

fn uuid_field(map: &Map<String, Value>, key: &str) -> Option<Uuid> {
    map.get(key)
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
}

#[allow(clippy::cast_possible_truncation)]
fn int_field(map: &Map<String, Value>, key: &str) -> Option<i64> {
    map.get(key)
        .and_then(|value| value.as_i64().or_else(|| value.as_f64().map(|float| float as i64)))
}

/// Parse one import line. `Ok(None)` means "skip this line".
///
/// # Errors
///
/// The line is not valid JSON.
pub(crate) fn parse_import_line(line: &str, now: i64) -> Result<Option<ImportRecord>, serde_json::Error> {
    let value = serde_json::from_str::<Value>(line)?;
    let Some(map) = value.as_object() else {
        return Ok(None);
    };

    match map.get("type").and_then(Value::as_str) {
        Some(META_LINE_TYPE) => Ok(Some(ImportRecord::Meta)),
        Some("lead") => Ok(parse_lead(map, now).map(ImportRecord::Lead)),
        Some("interaction") => Ok(parse_interaction(map, now).map(ImportRecord::Interaction)),
        // Bare objects with a name are read as leads.
        None if map.contains_key("name") => Ok(parse_lead(map, now).map(ImportRecord::Lead)),
        _ => Ok(None),
    }
}

fn parse_lead(map: &Map<String, Value>, now: i64) -> Option<Lead> {
    let name = str_field(map, "name")?;
    let status = match str_field(map, "status") {
        Some(raw) => LeadStatus::parse(&raw)?,
        None => LeadStatus::New,
    };
    let score = int_field(map, "score")
        .map(|score| i32::try_from(score).unwrap_or(if score < 0 { i32::MIN } else { i32::MAX }))
        .map(clamp_score);
    let created_at = int_field(map, "created_at").unwrap_or(now);
    let updated_at = int_field(map, "updated_at").unwrap_or(created_at);

    Some(Lead {
        id: uuid_field(map, "id").unwrap_or_else(Uuid::new_v4),
        name,
        email: str_field(map, "email"),
        phone: str_field(map, "phone"),
        company: str_field(map, "company"),
        status: status.as_str().to_owned(),
        score,
        consultant_id: uuid_field(map, "consultant_id"),
        notes: str_field(map, "notes"),
        created_at,
        updated_at,
    })
}

fn parse_interaction(map: &Map<String, Value>, now: i64) -> Option<Interaction> {
    let lead_id = uuid_field(map, "lead_id")?;
    let kind = str_field(map, "kind").and_then(|kind| InteractionKind::parse(&kind))?;
    Some(Interaction {
        id: uuid_field(map, "id").unwrap_or_else(Uuid::new_v4),
        lead_id,
        kind,
        body: str_field(map, "body").unwrap_or_default(),
        created_at: int_field(map, "created_at").unwrap_or(now),
    })
}

/// Import a JSONL document. Leads are upserted in one batch first, then
/// interactions are attached; an interaction whose lead does not exist is
/// skipped.
///
/// # Errors
///
/// Store failure while writing the lead batch.
pub async fn import_jsonl(state: &AppState, jsonl: &str) -> Result<ImportSummary, LeadError> {
    let now = now_ms();
    let mut leads = Vec::new();
    let mut interactions = Vec::new();
    let mut summary = ImportSummary::default();

    for raw_line in jsonl.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_import_line(line, now) {
            Ok(Some(ImportRecord::Lead(lead))) => leads.push(lead),
            Ok(Some(ImportRecord::Interaction(interaction))) => interactions.push(interaction),
            Ok(Some(ImportRecord::Meta)) => {}
            Ok(None) | Err(_) => summary.skipped = summary.skipped.saturating_add(1),
        }
    }

    if !leads.is_empty() {
        summary.imported = state.store.insert_leads(leads).await?;
    }

    let mut seen = HashSet::new();
    for interaction in interactions {
        if !seen.insert(interaction.id) {
            summary.skipped = summary.skipped.saturating_add(1);
            continue;
        }
        let lead_id = interaction.lead_id;
        match state.store.add_interaction(interaction).await {
            Ok(_) => summary.interactions = summary.interactions.saturating_add(1),
            Err(err) => {
                warn!(%lead_id, error = %err, "import: interaction skipped");
                summary.skipped = summary.skipped.saturating_add(1);
            }
        }
    }

    info!(imported = summary.imported, interactions = summary.interactions, skipped = summary.skipped, "jsonl import");
    Ok(summary)
}
