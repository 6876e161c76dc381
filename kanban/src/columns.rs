//! Column definitions and the grouping/sort policy.
//!
//! Columns are a projection, not stored data. A `ColumnSet` is an ordered list
//! of `{status, title}` pairs fixed when the board is built; grouping walks the
//! lead list once and drops every lead whose status has no column.

#[cfg(test)]
#[path = "columns_test.rs"]
mod columns_test;

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::lead::Lead;
use crate::stage::{LeadStatus, StageMeta};

/// One column: the stage it shows and its heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDef {
    pub status: LeadStatus,
    pub title: String,
}

impl ColumnDef {
    /// Column titled with the stage's catalog label.
    #[must_use]
    pub fn for_stage(status: LeadStatus) -> Self {
        Self { status, title: status.meta().label.to_owned() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColumnError {
    #[error("column set is empty")]
    Empty,
    #[error("duplicate column for status {0}")]
    Duplicate(LeadStatus),
}

/// Ordered, duplicate-free list of columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSet {
    defs: Vec<ColumnDef>,
}

impl ColumnSet {
    /// Build a column set, rejecting empty sets and repeated stages.
    ///
    /// # Errors
    ///
    /// Returns `Empty` or `Duplicate` when the definitions would break the
    /// one-column-per-stage assumption.
    pub fn new(defs: Vec<ColumnDef>) -> Result<Self, ColumnError> {
        if defs.is_empty() {
            return Err(ColumnError::Empty);
        }
        for (i, def) in defs.iter().enumerate() {
            if defs[..i].iter().any(|earlier| earlier.status == def.status) {
                return Err(ColumnError::Duplicate(def.status));
            }
        }
        Ok(Self { defs })
    }

    /// Build from stages, titling each with its catalog label.
    ///
    /// # Errors
    ///
    /// Same as [`ColumnSet::new`].
    pub fn from_stages(stages: &[LeadStatus]) -> Result<Self, ColumnError> {
        Self::new(stages.iter().copied().map(ColumnDef::for_stage).collect())
    }

    /// All seven stages in pipeline order.
    #[must_use]
    pub fn pipeline() -> Self {
        Self { defs: LeadStatus::ALL.into_iter().map(ColumnDef::for_stage).collect() }
    }

    #[must_use]
    pub fn defs(&self) -> &[ColumnDef] {
        &self.defs
    }

    #[must_use]
    pub fn contains(&self, status: LeadStatus) -> bool {
        self.defs.iter().any(|def| def.status == status)
    }

    /// Resolve a raw column id (the stage wire name) to a displayed stage.
    #[must_use]
    pub fn resolve(&self, column_id: &str) -> Option<LeadStatus> {
        LeadStatus::parse(column_id).filter(|status| self.contains(*status))
    }
}

impl Default for ColumnSet {
    fn default() -> Self {
        Self::pipeline()
    }
}

/// Order of leads within a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortPolicy {
    /// Keep the order the leads were fetched in.
    #[default]
    InputOrder,
    /// Highest score first (unscored last), ties by most recent `updated_at`.
    ScoreThenRecency,
}

impl SortPolicy {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "input" | "input_order" => Some(Self::InputOrder),
            "score" | "score_then_recency" => Some(Self::ScoreThenRecency),
            _ => None,
        }
    }

    fn compare(self, a: &Lead, b: &Lead) -> Ordering {
        match self {
            Self::InputOrder => Ordering::Equal,
            Self::ScoreThenRecency => b.score.cmp(&a.score).then_with(|| b.updated_at.cmp(&a.updated_at)),
        }
    }
}

/// A rendered column: definition, metadata and the leads it holds.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnView<'a> {
    pub status: LeadStatus,
    pub title: String,
    pub meta: StageMeta,
    pub leads: Vec<&'a Lead>,
    /// Pointer is currently over this column during a drag.
    pub highlighted: bool,
}

impl ColumnView<'_> {
    #[must_use]
    pub fn lead_ids(&self) -> Vec<crate::lead::LeadId> {
        self.leads.iter().map(|lead| lead.id).collect()
    }
}

/// Group leads into columns by their stored status.
#[must_use]
pub fn group_leads<'a>(leads: &'a [Lead], columns: &ColumnSet, policy: SortPolicy) -> Vec<ColumnView<'a>> {
    group_leads_by(leads, columns, policy, Lead::stage)
}

/// Group leads into columns using `status_of` to decide each lead's stage.
///
/// Leads for which `status_of` returns `None`, or a stage without a column,
/// land in no column.
pub fn group_leads_by<'a, F>(leads: &'a [Lead], columns: &ColumnSet, policy: SortPolicy, status_of: F) -> Vec<ColumnView<'a>>
where
    F: Fn(&Lead) -> Option<LeadStatus>,
{
    let index: HashMap<LeadStatus, usize> = columns
        .defs()
        .iter()
        .enumerate()
        .map(|(i, def)| (def.status, i))
        .collect();

    let mut views: Vec<ColumnView<'a>> = columns
        .defs()
        .iter()
        .map(|def| ColumnView {
            status: def.status,
            title: def.title.clone(),
            meta: def.status.meta(),
            leads: Vec::new(),
            highlighted: false,
        })
        .collect();

    for lead in leads {
        let Some(slot) = status_of(lead).and_then(|status| index.get(&status)) else {
            continue;
        };
        views[*slot].leads.push(lead);
    }

    if policy != SortPolicy::InputOrder {
        for view in &mut views {
            view.leads.sort_by(|a, b| policy.compare(a, b));
        }
    }

    views
}
