//! One Kanban board instance.
//!
//! `KanbanBoard` is the single parameterised replacement for every board
//! variant: columns, sensor and sort policy come from `BoardConfig`. It owns
//! a snapshot of the lead list handed to it by the host, the drag session,
//! the in-flight guard and an optimistic overlay.
//!
//! DESIGN
//! ======
//! The lead list is never edited to reflect an unconfirmed move. A committed
//! drop records `lead -> target` in the overlay, and column projection reads
//! the overlay first. When the outcome comes back the overlay entry is
//! removed: on success the authoritative record replaces the old one, on
//! failure the card simply falls back to its stored column.

#[cfg(test)]
#[path = "board_test.rs"]
mod board_test;

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::columns::{ColumnSet, ColumnView, SortPolicy, group_leads_by};
use crate::commit::{InFlight, MoveOutcome, MoveRequest};
use crate::drag::{DragEvent, DragMachine, DragState, DropIgnored};
use crate::lead::{Lead, LeadId};
use crate::sensor::{Point, SensorConfig};
use crate::stage::LeadStatus;

/// Everything that distinguishes one board from another.
#[derive(Debug, Clone, Default)]
pub struct BoardConfig {
    pub columns: ColumnSet,
    pub sensor: SensorConfig,
    pub sort: SortPolicy,
}

/// What the host should do after feeding the board an event.
#[derive(Debug)]
pub enum Action {
    None,
    /// A card was clicked rather than dragged; open its detail panel.
    OpenDetail(LeadId),
    DragStarted(LeadId),
    /// Highlight this column (or none).
    HoverChanged(Option<LeadStatus>),
    /// The drag ended without a move.
    DropIgnored { lead_id: LeadId, reason: DropIgnored },
    DragCancelled(LeadId),
    /// Run this through `Committer::commit` and feed the outcome back.
    Commit(MoveRequest),
}

pub struct KanbanBoard {
    config: BoardConfig,
    drag: DragMachine,
    leads: Vec<Lead>,
    overlay: HashMap<LeadId, LeadStatus>,
    in_flight: InFlight,
}

impl KanbanBoard {
    #[must_use]
    pub fn new(config: BoardConfig) -> Self {
        let drag = DragMachine::new(config.sensor);
        Self { config, drag, leads: Vec::new(), overlay: HashMap::new(), in_flight: InFlight::new() }
    }

    // --- Data inputs ---

    /// Replace the lead snapshot with a freshly fetched list.
    ///
    /// Overlay entries survive the reload only while a move is in flight.
    /// With the guard free, any entry left over belongs to a commit that
    /// was dropped before reporting back, and the fetched status wins.
    pub fn load(&mut self, leads: Vec<Lead>) {
        self.leads = leads;
        if !self.in_flight.is_held() {
            self.overlay.clear();
            return;
        }
        let ids: HashSet<LeadId> = self.leads.iter().map(|lead| lead.id).collect();
        self.overlay.retain(|id, _| ids.contains(id));
    }

    /// Insert or replace one record (e.g. after a create or a detail edit).
    pub fn upsert(&mut self, lead: Lead) {
        match self.leads.iter_mut().find(|existing| existing.id == lead.id) {
            Some(existing) => *existing = lead,
            None => self.leads.push(lead),
        }
    }

    /// Reconcile a finished commit.
    pub fn apply_outcome(&mut self, outcome: MoveOutcome) {
        self.overlay.remove(&outcome.lead_id());
        match outcome {
            MoveOutcome::Moved { lead, .. } => self.upsert(lead),
            MoveOutcome::Rejected { lead_id, to, .. } => {
                debug!(%lead_id, %to, "move rejected; card returns to stored column");
            }
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    #[must_use]
    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    #[must_use]
    pub fn lead(&self, id: LeadId) -> Option<&Lead> {
        self.leads.iter().find(|lead| lead.id == id)
    }

    #[must_use]
    pub fn drag_state(&self) -> &DragState {
        self.drag.state()
    }

    /// Shared handle to this board's in-flight guard.
    #[must_use]
    pub fn in_flight(&self) -> InFlight {
        self.in_flight.clone()
    }

    /// Column a lead is shown in, overlay first.
    #[must_use]
    pub fn displayed_status(&self, lead: &Lead) -> Option<LeadStatus> {
        self.overlay.get(&lead.id).copied().or_else(|| lead.stage())
    }

    /// Stage shown for a move that has not been confirmed yet.
    #[must_use]
    pub fn pending_move(&self, id: LeadId) -> Option<LeadStatus> {
        self.overlay.get(&id).copied()
    }

    /// Project the leads into columns, with the hovered column highlighted.
    #[must_use]
    pub fn columns(&self) -> Vec<ColumnView<'_>> {
        let mut views = group_leads_by(&self.leads, &self.config.columns, self.config.sort, |lead| {
            self.displayed_status(lead)
        });
        if let Some(over) = self.drag.state().over() {
            for view in &mut views {
                view.highlighted = view.status == over;
            }
        }
        views
    }

    // --- Pointer input ---

    /// Press on a card. Cards that are not on the board are ignored.
    pub fn pointer_down(&mut self, lead_id: LeadId, at: Point, now_ms: u64) -> Action {
        let Some(from) = self
            .lead(lead_id)
            .and_then(|lead| self.displayed_status(lead))
            .filter(|status| self.config.columns.contains(*status))
        else {
            return Action::None;
        };
        let event = self.drag.pointer_down(lead_id, from, at, now_ms);
        self.translate(event)
    }

    /// Pointer moved; `over` is the column id under the pointer, if any.
    pub fn pointer_move(&mut self, at: Point, over: Option<&str>, now_ms: u64) -> Action {
        let over = self.column_at(over);
        let event = self.drag.pointer_move(at, over, now_ms);
        self.translate(event)
    }

    /// Clock advanced without pointer movement.
    pub fn tick(&mut self, now_ms: u64) -> Action {
        let event = self.drag.tick(now_ms);
        self.translate(event)
    }

    /// Pointer released; `over` is the column id under the pointer, if any.
    pub fn pointer_up(&mut self, over: Option<&str>) -> Action {
        let over = self.column_at(over);
        let event = self.drag.pointer_up(over);
        self.translate(event)
    }

    /// Escape or focus loss.
    pub fn cancel(&mut self) -> Action {
        let event = self.drag.cancel();
        self.translate(event)
    }

    fn column_at(&self, column_id: Option<&str>) -> Option<LeadStatus> {
        column_id.and_then(|id| self.config.columns.resolve(id))
    }

    fn translate(&mut self, event: DragEvent) -> Action {
        match event {
            DragEvent::None | DragEvent::Abandoned { .. } => Action::None,
            DragEvent::Started { lead_id } => Action::DragStarted(lead_id),
            DragEvent::HoverChanged { over } => Action::HoverChanged(over),
            DragEvent::Clicked { lead_id } => Action::OpenDetail(lead_id),
            DragEvent::Ignored { lead_id, reason } => Action::DropIgnored { lead_id, reason },
            DragEvent::Cancelled { lead_id } => Action::DragCancelled(lead_id),
            DragEvent::Dropped { lead_id, from, to } => {
                let Some(permit) = self.in_flight.try_acquire() else {
                    debug!(%lead_id, %to, "drop discarded while a move is in flight");
                    return Action::DropIgnored { lead_id, reason: DropIgnored::Suppressed };
                };
                // Guard was free, so nothing in the overlay is still pending.
                self.overlay.clear();
                self.overlay.insert(lead_id, to);
                Action::Commit(MoveRequest::new(lead_id, from, to, permit))
            }
        }
    }
}

impl Default for KanbanBoard {
    fn default() -> Self {
        Self::new(BoardConfig::default())
    }
}
