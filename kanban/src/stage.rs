//! Pipeline stages and their display metadata.
//!
//! A lead occupies exactly one of seven stages. The wire name of each stage
//! doubles as the column id on the board. Labels and colors live here once;
//! nothing else in the workspace keeps its own status lookup table.

#[cfg(test)]
#[path = "stage_test.rs"]
mod stage_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the seven fixed pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    /// Just captured, nobody has reached out yet.
    New,
    /// First contact attempted or made.
    Contacted,
    /// Fit confirmed by the consultant.
    Qualified,
    /// A meeting is booked or held.
    Meeting,
    /// A proposal has been sent.
    Proposal,
    /// Signed.
    Client,
    /// Closed without a deal.
    Lost,
}

impl LeadStatus {
    /// Every stage in pipeline order.
    pub const ALL: [Self; 7] = [
        Self::New,
        Self::Contacted,
        Self::Qualified,
        Self::Meeting,
        Self::Proposal,
        Self::Client,
        Self::Lost,
    ];

    /// Wire name, also used as the column id.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::Qualified => "qualified",
            Self::Meeting => "meeting",
            Self::Proposal => "proposal",
            Self::Client => "client",
            Self::Lost => "lost",
        }
    }

    /// Parse a wire name. Returns `None` for anything outside the seven stages.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == raw)
    }

    /// Display metadata for this stage.
    #[must_use]
    pub fn meta(self) -> StageMeta {
        match self {
            Self::New => StageMeta { label: "New", color: "#94A3B8", description: "Captured, not yet contacted" },
            Self::Contacted => StageMeta { label: "Contacted", color: "#60A5FA", description: "Outreach in progress" },
            Self::Qualified => StageMeta { label: "Qualified", color: "#A78BFA", description: "Fit confirmed" },
            Self::Meeting => StageMeta { label: "Meeting", color: "#F59E0B", description: "Meeting booked or held" },
            Self::Proposal => StageMeta { label: "Proposal", color: "#F97316", description: "Proposal sent" },
            Self::Client => StageMeta { label: "Client", color: "#22C55E", description: "Deal signed" },
            Self::Lost => StageMeta { label: "Lost", color: "#EF4444", description: "Closed without a deal" },
        }
    }

    /// Whether the stage ends the pipeline.
    #[must_use]
    pub fn is_closed(self) -> bool {
        matches!(self, Self::Client | Self::Lost)
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the seven stages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown lead status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for LeadStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownStatus(s.to_owned()))
    }
}

/// Label, color and short description for one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageMeta {
    pub label: &'static str,
    pub color: &'static str,
    pub description: &'static str,
}
