//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the lead store behind the `LeadStore` trait, so the same handlers run
//! on Postgres in production and on `MemoryLeadStore` in tests or when no
//! database is configured.

use std::sync::Arc;

use kanban::columns::SortPolicy;
use kanban::commit::Committer;
use kanban::notify::Notifier;
use kanban::store::LeadStore;

/// Clone is required by Axum; all inner fields are Arc-wrapped or Copy.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LeadStore>,
    /// Receives a notice for every lead write made through the service.
    pub notifier: Arc<dyn Notifier>,
    /// Board moves go through the same committer the board core uses.
    pub committer: Committer,
    /// Board column order when a request does not pick one.
    pub board_sort: SortPolicy,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn LeadStore>, notifier: Arc<dyn Notifier>, board_sort: SortPolicy) -> Self {
        let committer = Committer::new(Arc::clone(&store), Arc::clone(&notifier));
        Self { store, notifier, committer, board_sort }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
