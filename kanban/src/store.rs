//! Data access for leads and their interactions.
//!
//! DESIGN
//! ======
//! Board and service code only see `LeadStore`. The HTTP service plugs in a
//! Postgres implementation; tests and database-less runs use
//! `MemoryLeadStore`. The store is the source of truth: callers never patch
//! their own copies and assume the write landed.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use uuid::Uuid;

use crate::lead::{Interaction, Lead, LeadId, LeadPatch, NewLead, now_ms};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("lead not found: {0}")]
    NotFound(LeadId),
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Narrows `list_leads`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LeadFilter {
    pub consultant_id: Option<Uuid>,
}

impl LeadFilter {
    #[must_use]
    pub fn matches(&self, lead: &Lead) -> bool {
        self.consultant_id.is_none_or(|id| lead.consultant_id == Some(id))
    }
}

#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Leads in fetch order (oldest first).
    async fn list_leads(&self, filter: LeadFilter) -> Result<Vec<Lead>, StoreError>;

    async fn get_lead(&self, id: LeadId) -> Result<Lead, StoreError>;

    async fn create_lead(&self, new: NewLead) -> Result<Lead, StoreError>;

    /// Apply a partial update and return the stored record.
    async fn update_lead(&self, id: LeadId, patch: &LeadPatch) -> Result<Lead, StoreError>;

    async fn delete_lead(&self, id: LeadId) -> Result<(), StoreError>;

    /// Bulk insert fully-formed records (import). Returns how many were written.
    async fn insert_leads(&self, leads: Vec<Lead>) -> Result<usize, StoreError>;

    /// Interactions for a lead, newest first.
    async fn list_interactions(&self, lead_id: LeadId) -> Result<Vec<Interaction>, StoreError>;

    /// Append a history entry. Idempotent on `interaction.id`: adding an id
    /// that is already stored returns the stored entry and writes nothing.
    async fn add_interaction(&self, interaction: Interaction) -> Result<Interaction, StoreError>;
}

// =============================================================================
// IN-MEMORY STORE
// =============================================================================

#[derive(Default)]
struct MemoryInner {
    leads: Vec<Lead>,
    interactions: Vec<Interaction>,
}

/// Process-local store. Fetch order is insertion order.
#[derive(Default)]
pub struct MemoryLeadStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryLeadStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `leads`.
    #[must_use]
    pub fn with_leads(leads: Vec<Lead>) -> Self {
        Self { inner: Mutex::new(MemoryInner { leads, interactions: Vec::new() }) }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl LeadStore for MemoryLeadStore {
    async fn list_leads(&self, filter: LeadFilter) -> Result<Vec<Lead>, StoreError> {
        let inner = self.lock();
        Ok(inner.leads.iter().filter(|lead| filter.matches(lead)).cloned().collect())
    }

    async fn get_lead(&self, id: LeadId) -> Result<Lead, StoreError> {
        let inner = self.lock();
        inner
            .leads
            .iter()
            .find(|lead| lead.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn create_lead(&self, new: NewLead) -> Result<Lead, StoreError> {
        let lead = new.into_lead(now_ms());
        self.lock().leads.push(lead.clone());
        Ok(lead)
    }

    async fn update_lead(&self, id: LeadId, patch: &LeadPatch) -> Result<Lead, StoreError> {
        let mut inner = self.lock();
        let lead = inner
            .leads
            .iter_mut()
            .find(|lead| lead.id == id)
            .ok_or(StoreError::NotFound(id))?;
        lead.apply_patch(patch, now_ms());
        Ok(lead.clone())
    }

    async fn delete_lead(&self, id: LeadId) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let before = inner.leads.len();
        inner.leads.retain(|lead| lead.id != id);
        if inner.leads.len() == before {
            return Err(StoreError::NotFound(id));
        }
        inner.interactions.retain(|interaction| interaction.lead_id != id);
        Ok(())
    }

    async fn insert_leads(&self, leads: Vec<Lead>) -> Result<usize, StoreError> {
        let mut inner = self.lock();
        let count = leads.len();
        for lead in leads {
            match inner.leads.iter_mut().find(|existing| existing.id == lead.id) {
                Some(existing) => *existing = lead,
                None => inner.leads.push(lead),
            }
        }
        Ok(count)
    }

    async fn list_interactions(&self, lead_id: LeadId) -> Result<Vec<Interaction>, StoreError> {
        let inner = self.lock();
        if !inner.leads.iter().any(|lead| lead.id == lead_id) {
            return Err(StoreError::NotFound(lead_id));
        }
        let mut out: Vec<Interaction> = inner
            .interactions
            .iter()
            .filter(|interaction| interaction.lead_id == lead_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn add_interaction(&self, interaction: Interaction) -> Result<Interaction, StoreError> {
        let mut inner = self.lock();
        if !inner.leads.iter().any(|lead| lead.id == interaction.lead_id) {
            return Err(StoreError::NotFound(interaction.lead_id));
        }
        if let Some(existing) = inner.interactions.iter().find(|stored| stored.id == interaction.id) {
            return Ok(existing.clone());
        }
        inner.interactions.push(interaction.clone());
        Ok(interaction)
    }
}
