//! Shared fixtures for unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::lead::{Interaction, Lead, LeadId, LeadPatch, NewLead};
use crate::store::{LeadFilter, LeadStore, MemoryLeadStore, StoreError};

/// Memory store that counts updates, can be told to fail, and can hold
/// updates open until released.
#[derive(Default)]
pub struct ScriptedStore {
    pub inner: MemoryLeadStore,
    pub updates: AtomicUsize,
    pub patches: Mutex<Vec<(LeadId, LeadPatch)>>,
    pub fail: AtomicBool,
    pub gated: AtomicBool,
    pub gate: Notify,
}

impl ScriptedStore {
    pub fn with_leads(leads: Vec<Lead>) -> Self {
        Self { inner: MemoryLeadStore::with_leads(leads), ..Self::default() }
    }

    pub fn update_calls(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub async fn wait_for_updates(&self, n: usize) {
        tokio::time::timeout(Duration::from_secs(1), async {
            while self.update_calls() < n {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("update never reached the store");
    }
}

#[async_trait]
impl LeadStore for ScriptedStore {
    async fn list_leads(&self, filter: LeadFilter) -> Result<Vec<Lead>, StoreError> {
        self.inner.list_leads(filter).await
    }

    async fn get_lead(&self, id: LeadId) -> Result<Lead, StoreError> {
        self.inner.get_lead(id).await
    }

    async fn create_lead(&self, new: NewLead) -> Result<Lead, StoreError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("insert refused".into()));
        }
        self.inner.create_lead(new).await
    }

    async fn update_lead(&self, id: LeadId, patch: &LeadPatch) -> Result<Lead, StoreError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.patches.lock().unwrap().push((id, patch.clone()));
        if self.gated.load(Ordering::SeqCst) {
            self.gate.notified().await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("connection reset".into()));
        }
        self.inner.update_lead(id, patch).await
    }

    async fn delete_lead(&self, id: LeadId) -> Result<(), StoreError> {
        self.inner.delete_lead(id).await
    }

    async fn insert_leads(&self, leads: Vec<Lead>) -> Result<usize, StoreError> {
        self.inner.insert_leads(leads).await
    }

    async fn list_interactions(&self, lead_id: LeadId) -> Result<Vec<Interaction>, StoreError> {
        self.inner.list_interactions(lead_id).await
    }

    async fn add_interaction(&self, interaction: Interaction) -> Result<Interaction, StoreError> {
        self.inner.add_interaction(interaction).await
    }
}

pub fn qualified_lead(score: i32) -> Lead {
    let mut lead = NewLead { name: format!("lead-{score}"), score: Some(score), ..NewLead::default() }.into_lead(1);
    lead.status = "qualified".into();
    lead
}

