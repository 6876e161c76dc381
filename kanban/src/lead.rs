//! Lead records, sparse patches and satellite interactions.
//!
//! `Lead` mirrors the `leads` table. Its `status` is kept as the raw stored
//! string: rows written by other tools may hold values outside the seven
//! stages, and the board must tolerate them (they are simply not shown).
//! Writes go through `LeadPatch` / `NewLead`, which only accept typed stages.

#[cfg(test)]
#[path = "lead_test.rs"]
mod lead_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{SCORE_MAX, SCORE_MIN};
use crate::stage::LeadStatus;

/// Unique identifier for a lead.
pub type LeadId = Uuid;

/// A sales prospect as stored and sent over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    /// Raw stage name as stored.
    pub status: String,
    /// Qualification score, 0..=100.
    pub score: Option<i32>,
    /// Consultant who owns the lead.
    pub consultant_id: Option<Uuid>,
    pub notes: Option<String>,
    /// Milliseconds since Unix epoch.
    pub created_at: i64,
    /// Milliseconds since Unix epoch; bumped on every write.
    pub updated_at: i64,
}

impl Lead {
    /// Typed stage, if the stored status is one of the seven.
    #[must_use]
    pub fn stage(&self) -> Option<LeadStatus> {
        LeadStatus::parse(&self.status)
    }

    /// Apply a sparse patch in place and stamp `updated_at`.
    pub fn apply_patch(&mut self, patch: &LeadPatch, now_ms: i64) {
        if let Some(name) = &patch.name {
            self.name.clone_from(name);
        }
        if let Some(email) = &patch.email {
            self.email = Some(email.clone());
        }
        if let Some(phone) = &patch.phone {
            self.phone = Some(phone.clone());
        }
        if let Some(company) = &patch.company {
            self.company = Some(company.clone());
        }
        if let Some(status) = patch.status {
            self.status = status.as_str().to_owned();
        }
        if let Some(score) = patch.score {
            self.score = Some(clamp_score(score));
        }
        if let Some(consultant_id) = patch.consultant_id {
            self.consultant_id = Some(consultant_id);
        }
        if let Some(notes) = &patch.notes {
            self.notes = Some(notes.clone());
        }
        self.updated_at = now_ms;
    }
}

/// Sparse update for a lead. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<LeadStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consultant_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl LeadPatch {
    /// The payload a drop produces: `{status: to}` and nothing else.
    #[must_use]
    pub fn status(to: LeadStatus) -> Self {
        Self { status: Some(to), ..Self::default() }
    }

    /// True when no field would change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Creation payload. Missing status means `new`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewLead {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub status: Option<LeadStatus>,
    #[serde(default)]
    pub score: Option<i32>,
    #[serde(default)]
    pub consultant_id: Option<Uuid>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewLead {
    /// Build the stored record with a fresh id.
    #[must_use]
    pub fn into_lead(self, now_ms: i64) -> Lead {
        Lead {
            id: Uuid::new_v4(),
            name: self.name,
            email: self.email,
            phone: self.phone,
            company: self.company,
            status: self.status.unwrap_or(LeadStatus::New).as_str().to_owned(),
            score: self.score.map(clamp_score),
            consultant_id: self.consultant_id,
            notes: self.notes,
            created_at: now_ms,
            updated_at: now_ms,
        }
    }
}

/// Kind of a satellite interaction record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Note,
    Call,
    Email,
    Meeting,
    /// Appended by the service when a lead changes stage.
    StatusChange,
}

impl InteractionKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Call => "call",
            Self::Email => "email",
            Self::Meeting => "meeting",
            Self::StatusChange => "status_change",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "note" => Some(Self::Note),
            "call" => Some(Self::Call),
            "email" => Some(Self::Email),
            "meeting" => Some(Self::Meeting),
            "status_change" => Some(Self::StatusChange),
            _ => None,
        }
    }
}

/// A contact attempt, call log or note attached to a lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: Uuid,
    pub lead_id: LeadId,
    pub kind: InteractionKind,
    pub body: String,
    pub created_at: i64,
}

/// Clamp a score into the valid 0..=100 range.
#[must_use]
pub fn clamp_score(score: i32) -> i32 {
    score.clamp(SCORE_MIN, SCORE_MAX)
}

/// Current time as milliseconds since Unix epoch.
#[must_use]
pub fn now_ms() -> i64 {
    let Ok(duration) = std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}
