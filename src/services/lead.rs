//! Lead service: validation, CRUD, stage moves and interaction history.
//!
//! DESIGN
//! ======
//! Route handlers pass raw request bodies here. Stage names and interaction
//! kinds arrive as strings and are checked before any store call, so a bad
//! value surfaces as `E_INVALID_STATUS` / `E_INVALID_INPUT` instead of a body
//! deserialization failure. Every stage change that lands appends a
//! `status_change` interaction to the lead's history.
//!
//! ERROR HANDLING
//! ==============
//! Failing to append the history entry does not fail the write that caused
//! it: the lead has already moved, so the error is logged and the moved
//! record is returned.

#[cfg(test)]
#[path = "lead_test.rs"]
mod tests;

use kanban::lead::{Interaction, InteractionKind, Lead, LeadId, LeadPatch, NewLead, now_ms};
use kanban::notify::Notice;
use kanban::stage::{LeadStatus, UnknownStatus};
use kanban::store::{LeadFilter, StoreError};
use serde::Deserialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::state::AppState;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum LeadError {
    #[error("lead not found: {0}")]
    NotFound(LeadId),
    #[error(transparent)]
    InvalidStatus(#[from] UnknownStatus),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("store error: {0}")]
    Store(String),
}

impl From<StoreError> for LeadError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
            StoreError::Backend(message) => Self::Store(message),
        }
    }
}

impl LeadError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_LEAD_NOT_FOUND",
            Self::InvalidStatus(_) => "E_INVALID_STATUS",
            Self::InvalidInput(_) => "E_INVALID_INPUT",
            Self::Store(_) => "E_STORE",
        }
    }
}

/// `POST /api/leads` body.
#[derive(Debug, Default, Deserialize)]
pub struct CreateLeadInput {
    #[serde(default)]
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub status: Option<String>,
    pub score: Option<i32>,
    pub consultant_id: Option<Uuid>,
    pub notes: Option<String>,
}

/// `PATCH /api/leads/{id}` body. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct PatchLeadInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub status: Option<String>,
    pub score: Option<i32>,
    pub consultant_id: Option<Uuid>,
    pub notes: Option<String>,
}

/// `POST /api/leads/{id}/interactions` body.
#[derive(Debug, Deserialize)]
pub struct InteractionInput {
    pub kind: String,
    #[serde(default)]
    pub body: String,
}

/// Result of a board move.
#[derive(Debug)]
pub enum MoveResult {
    /// The stage changed; `from` is the previous stage if it was a known one.
    Moved { lead: Lead, from: Option<LeadStatus> },
    /// The lead was already in the target stage. Nothing was written.
    Unchanged(Lead),
}

// =============================================================================
// VALIDATION
// =============================================================================

fn parse_status(raw: &str) -> Result<LeadStatus, LeadError> {
    Ok(raw.trim().parse::<LeadStatus>()?)
}

fn clean(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

fn check_email(email: Option<&str>) -> Result<(), LeadError> {
    match email {
        Some(email) if !email.contains('@') => Err(LeadError::InvalidInput(format!("invalid email: {email}"))),
        _ => Ok(()),
    }
}

impl CreateLeadInput {
    /// # Errors
    ///
    /// Blank name, malformed email or unknown status.
    pub fn validate(self) -> Result<NewLead, LeadError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(LeadError::InvalidInput("name is required".into()));
        }
        let email = clean(self.email);
        check_email(email.as_deref())?;
        let status = self.status.as_deref().map(parse_status).transpose()?;

        Ok(NewLead {
            name: name.to_owned(),
            email,
            phone: clean(self.phone),
            company: clean(self.company),
            status,
            score: self.score,
            consultant_id: self.consultant_id,
            notes: clean(self.notes),
        })
    }
}

impl PatchLeadInput {
    /// # Errors
    ///
    /// Blank name, malformed email, unknown status or a patch with no fields.
    pub fn validate(self) -> Result<LeadPatch, LeadError> {
        let name = match self.name {
            Some(name) if name.trim().is_empty() => {
                return Err(LeadError::InvalidInput("name cannot be blank".into()));
            }
            other => other.map(|name| name.trim().to_owned()),
        };
        check_email(self.email.as_deref())?;
        let status = self.status.as_deref().map(parse_status).transpose()?;

        let patch = LeadPatch {
            name,
            email: self.email,
            phone: self.phone,
            company: self.company,
            status,
            score: self.score,
            consultant_id: self.consultant_id,
            notes: self.notes,
        };
        if patch.is_empty() {
            return Err(LeadError::InvalidInput("patch has no fields".into()));
        }
        Ok(patch)
    }
}

// =============================================================================
// LEADS
// =============================================================================

/// # Errors
///
/// Store failures.
pub async fn list_leads(state: &AppState, filter: LeadFilter) -> Result<Vec<Lead>, LeadError> {
    Ok(state.store.list_leads(filter).await?)
}

/// # Errors
///
/// `NotFound` or store failures.
pub async fn get_lead(state: &AppState, id: LeadId) -> Result<Lead, LeadError> {
    Ok(state.store.get_lead(id).await?)
}

/// Validate and create a lead.
///
/// # Errors
///
/// Validation or store failures.
pub async fn create_lead(state: &AppState, input: CreateLeadInput) -> Result<Lead, LeadError> {
    let new = input.validate()?;
    let lead = state.store.create_lead(new).await?;
    info!(lead_id = %lead.id, status = %lead.status, "lead created");
    state.notifier.notify(Notice::success(format!("{} added", lead.name)));
    Ok(lead)
}

/// Apply a sparse update. A stage change is recorded in the history.
///
/// # Errors
///
/// Validation, `NotFound` or store failures.
pub async fn update_lead(state: &AppState, id: LeadId, input: PatchLeadInput) -> Result<Lead, LeadError> {
    let patch = input.validate()?;
    let before = match patch.status {
        Some(_) => Some(state.store.get_lead(id).await?),
        None => None,
    };

    let lead = state.store.update_lead(id, &patch).await?;
    info!(lead_id = %id, "lead updated");

    if let (Some(before), Some(to)) = (before, patch.status) {
        if before.stage() != Some(to) {
            record_status_change(state, &before, to).await;
        }
    }
    Ok(lead)
}

/// Move a lead to another stage: the server side of a board drop.
///
/// Moving to the stage the lead is already in writes nothing.
///
/// # Errors
///
/// Unknown stage, `NotFound` or a rejected update (reported once, not retried).
pub async fn move_lead(state: &AppState, id: LeadId, status: &str) -> Result<MoveResult, LeadError> {
    let to = parse_status(status)?;
    let current = state.store.get_lead(id).await?;
    let from = current.stage();
    if from == Some(to) {
        debug!(lead_id = %id, %to, "move to current stage ignored");
        return Ok(MoveResult::Unchanged(current));
    }

    let lead = state.committer.move_lead(id, &current.status, to).await?;
    record_status_change(state, &current, to).await;
    Ok(MoveResult::Moved { lead, from })
}

/// # Errors
///
/// `NotFound` or store failures.
pub async fn delete_lead(state: &AppState, id: LeadId) -> Result<(), LeadError> {
    state.store.delete_lead(id).await?;
    info!(lead_id = %id, "lead deleted");
    Ok(())
}

// =============================================================================
// INTERACTIONS
// =============================================================================

/// # Errors
///
/// `NotFound` or store failures.
pub async fn list_interactions(state: &AppState, lead_id: LeadId) -> Result<Vec<Interaction>, LeadError> {
    Ok(state.store.list_interactions(lead_id).await?)
}

/// # Errors
///
/// Unknown kind, empty body, `NotFound` or store failures.
pub async fn add_interaction(
    state: &AppState,
    lead_id: LeadId,
    input: InteractionInput,
) -> Result<Interaction, LeadError> {
    let kind = InteractionKind::parse(input.kind.trim())
        .ok_or_else(|| LeadError::InvalidInput(format!("unknown interaction kind: {}", input.kind)))?;
    let body = input.body.trim();
    if body.is_empty() {
        return Err(LeadError::InvalidInput("interaction body is required".into()));
    }

    let interaction = Interaction { id: Uuid::new_v4(), lead_id, kind, body: body.to_owned(), created_at: now_ms() };
    Ok(state.store.add_interaction(interaction).await?)
}

async fn record_status_change(state: &AppState, before: &Lead, to: LeadStatus) {
    let interaction = Interaction {
        id: Uuid::new_v4(),
        lead_id: before.id,
        kind: InteractionKind::StatusChange,
        body: format!("{} -> {to}", before.status),
        created_at: now_ms(),
    };
    if let Err(err) = state.store.add_interaction(interaction).await {
        warn!(lead_id = %before.id, error = %err, "status change not recorded");
    }
}
