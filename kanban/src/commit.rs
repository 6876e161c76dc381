//! Move commit: the one place a drop reaches the backend.
//!
//! DESIGN
//! ======
//! A completed drop becomes a `MoveRequest` only after acquiring the board's
//! `InFlight` guard. The request owns the permit, so the guard stays held for
//! exactly as long as the update is outstanding and is released when the
//! request is dropped, including when the commit future is cancelled.
//! `Committer::commit` issues one partial update, reports the result as a
//! notice, and hands back a `MoveOutcome` for the board to reconcile.
//!
//! ERROR HANDLING
//! ==============
//! A rejected update is reported once and returned as a value. There is no
//! retry; the board drops its optimistic overlay and the card snaps back.

#[cfg(test)]
#[path = "commit_test.rs"]
mod commit_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use crate::lead::{Lead, LeadId, LeadPatch, NewLead};
use crate::notify::{Notice, Notifier};
use crate::stage::LeadStatus;
use crate::store::{LeadFilter, LeadStore, StoreError};

// =============================================================================
// IN-FLIGHT GUARD
// =============================================================================

/// Per-board flag: is a move update outstanding?
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    flag: Arc<AtomicBool>,
}

impl InFlight {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the guard if it is free.
    #[must_use]
    pub fn try_acquire(&self) -> Option<InFlightPermit> {
        match self.flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire) {
            Ok(_) => Some(InFlightPermit { flag: Arc::clone(&self.flag) }),
            Err(_) => None,
        }
    }

    #[must_use]
    pub fn is_held(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Proof that the guard is held. Releases it on drop.
#[derive(Debug)]
pub struct InFlightPermit {
    flag: Arc<AtomicBool>,
}

impl Drop for InFlightPermit {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

// =============================================================================
// REQUEST / OUTCOME
// =============================================================================

/// A drop that passed every check and is cleared to hit the backend.
#[derive(Debug)]
pub struct MoveRequest {
    pub lead_id: LeadId,
    pub from: LeadStatus,
    pub to: LeadStatus,
    permit: InFlightPermit,
}

impl MoveRequest {
    #[must_use]
    pub fn new(lead_id: LeadId, from: LeadStatus, to: LeadStatus, permit: InFlightPermit) -> Self {
        Self { lead_id, from, to, permit }
    }

    /// The partial update this move sends: `{status: to}`.
    #[must_use]
    pub fn patch(&self) -> LeadPatch {
        LeadPatch::status(self.to)
    }
}

/// How a committed move ended.
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    /// The store accepted the update and returned the authoritative record.
    Moved { lead: Lead, from: LeadStatus },
    /// The store rejected the update; nothing changed remotely.
    Rejected { lead_id: LeadId, from: LeadStatus, to: LeadStatus, error: StoreError },
}

impl MoveOutcome {
    #[must_use]
    pub fn lead_id(&self) -> LeadId {
        match self {
            Self::Moved { lead, .. } => lead.id,
            Self::Rejected { lead_id, .. } => *lead_id,
        }
    }

    #[must_use]
    pub fn is_moved(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}

// =============================================================================
// COMMITTER
// =============================================================================

/// Bridges board actions to the store and the notification sink.
#[derive(Clone)]
pub struct Committer {
    store: Arc<dyn LeadStore>,
    notifier: Arc<dyn Notifier>,
}

impl Committer {
    #[must_use]
    pub fn new(store: Arc<dyn LeadStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Perform exactly one partial update for `request`.
    pub async fn commit(&self, request: MoveRequest) -> MoveOutcome {
        let MoveRequest { lead_id, from, to, permit } = request;
        let result = self.move_lead(lead_id, from.as_str(), to).await;
        drop(permit);

        match result {
            Ok(lead) => MoveOutcome::Moved { lead, from },
            Err(error) => MoveOutcome::Rejected { lead_id, from, to, error },
        }
    }

    /// Send `{status: to}` for one lead and report the result as a notice.
    /// `from` is the stored status before the move, used for logging only.
    ///
    /// # Errors
    ///
    /// Returns the store error after reporting it.
    pub async fn move_lead(&self, lead_id: LeadId, from: &str, to: LeadStatus) -> Result<Lead, StoreError> {
        match self.store.update_lead(lead_id, &LeadPatch::status(to)).await {
            Ok(lead) => {
                info!(%lead_id, %from, %to, "lead moved");
                self.notifier
                    .notify(Notice::success(format!("{} moved to {}", lead.name, to.meta().label)));
                Ok(lead)
            }
            Err(error) => {
                warn!(%lead_id, %from, %to, error = %error, "lead move rejected");
                self.notifier
                    .notify(Notice::error(format!("Could not move lead to {}: {error}", to.meta().label)));
                Err(error)
            }
        }
    }

    /// Create a lead directly in `status` (a column's "add" button).
    ///
    /// # Errors
    ///
    /// Returns the store error after reporting it as a notice.
    pub async fn create_in_column(&self, status: LeadStatus, mut new: NewLead) -> Result<Lead, StoreError> {
        new.status = Some(status);
        match self.store.create_lead(new).await {
            Ok(lead) => {
                info!(lead_id = %lead.id, %status, "lead created from column");
                self.notifier.notify(Notice::success(format!("{} added", lead.name)));
                Ok(lead)
            }
            Err(error) => {
                warn!(%status, error = %error, "lead create failed");
                self.notifier.notify(Notice::error(format!("Could not add lead: {error}")));
                Err(error)
            }
        }
    }

    /// Re-fetch the authoritative lead list.
    ///
    /// # Errors
    ///
    /// Returns the store error; no notice is raised for background refreshes.
    pub async fn refresh(&self, filter: LeadFilter) -> Result<Vec<Lead>, StoreError> {
        self.store.list_leads(filter).await
    }
}
