//! Drag session state machine.
//!
//! `DragState` is the gesture tracked between pointer-down and pointer-up.
//! A press first sits in `Pending` until the sensor's activation constraint
//! is met; releasing while pending is a click. Once `Dragging`, hover changes
//! are recorded for highlighting only, and the release is resolved into
//! either a drop on a new column or one of the `DropIgnored` outcomes.
//! Nothing here touches persisted state.

#[cfg(test)]
#[path = "drag_test.rs"]
mod drag_test;

use crate::lead::LeadId;
use crate::sensor::{ActivationCheck, Point, SensorConfig};
use crate::stage::LeadStatus;

/// The active gesture, if any.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    /// No gesture in progress; cards are clickable.
    #[default]
    Idle,
    /// Pointer is down on a card but has not met the activation constraint.
    Pending {
        lead_id: LeadId,
        /// Stage of the card when it was pressed.
        from: LeadStatus,
        /// Press position.
        origin: Point,
        /// Most recent pointer position, used by `tick`.
        last: Point,
        pressed_ms: u64,
    },
    /// A card is being dragged.
    Dragging {
        lead_id: LeadId,
        from: LeadStatus,
        /// Column currently under the pointer, for highlight styling.
        over: Option<LeadStatus>,
    },
}

impl DragState {
    /// Lead being dragged, once activation has happened.
    #[must_use]
    pub fn active_id(&self) -> Option<LeadId> {
        match self {
            Self::Dragging { lead_id, .. } => Some(*lead_id),
            _ => None,
        }
    }

    /// Column under the pointer during a drag.
    #[must_use]
    pub fn over(&self) -> Option<LeadStatus> {
        match self {
            Self::Dragging { over, .. } => *over,
            _ => None,
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Why a release did not produce an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DropIgnored {
    #[error("released outside any column")]
    NoTarget,
    #[error("released on the column the lead is already in")]
    SameColumn,
    #[error("a previous move is still in flight")]
    Suppressed,
}

/// What a single input event did to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum DragEvent {
    /// Nothing observable changed.
    None,
    /// The pending press activated into a drag.
    Started { lead_id: LeadId },
    /// The hovered column changed.
    HoverChanged { over: Option<LeadStatus> },
    /// Press released before activation.
    Clicked { lead_id: LeadId },
    /// A pending press moved too far during a hold delay.
    Abandoned { lead_id: LeadId },
    /// The drag ended over a column different from its origin.
    Dropped { lead_id: LeadId, from: LeadStatus, to: LeadStatus },
    /// The drag ended without a move.
    Ignored { lead_id: LeadId, reason: DropIgnored },
    /// The drag was aborted (escape, focus loss).
    Cancelled { lead_id: LeadId },
}

/// Decide what a release over `target` means for a card from `from`.
///
/// # Errors
///
/// `NoTarget` when nothing is under the pointer, `SameColumn` when the
/// target is the card's own column.
pub fn resolve_drop(from: LeadStatus, target: Option<LeadStatus>) -> Result<LeadStatus, DropIgnored> {
    match target {
        None => Err(DropIgnored::NoTarget),
        Some(to) if to == from => Err(DropIgnored::SameColumn),
        Some(to) => Ok(to),
    }
}

/// The drag state plus the sensor that gates activation.
#[derive(Debug, Clone, Default)]
pub struct DragMachine {
    sensor: SensorConfig,
    state: DragState,
}

impl DragMachine {
    #[must_use]
    pub fn new(sensor: SensorConfig) -> Self {
        Self { sensor, state: DragState::Idle }
    }

    #[must_use]
    pub fn state(&self) -> &DragState {
        &self.state
    }

    #[must_use]
    pub fn sensor(&self) -> SensorConfig {
        self.sensor
    }

    /// Press on a card. Ignored unless idle.
    pub fn pointer_down(&mut self, lead_id: LeadId, from: LeadStatus, at: Point, now_ms: u64) -> DragEvent {
        if !self.state.is_idle() {
            return DragEvent::None;
        }
        self.state = DragState::Pending { lead_id, from, origin: at, last: at, pressed_ms: now_ms };
        DragEvent::None
    }

    /// Pointer moved, `over` is the column beneath it.
    pub fn pointer_move(&mut self, at: Point, over: Option<LeadStatus>, now_ms: u64) -> DragEvent {
        match &mut self.state {
            DragState::Idle => DragEvent::None,
            DragState::Pending { last, .. } => {
                *last = at;
                self.check_activation(over, now_ms)
            }
            DragState::Dragging { over: current, .. } => {
                if *current == over {
                    DragEvent::None
                } else {
                    *current = over;
                    DragEvent::HoverChanged { over }
                }
            }
        }
    }

    /// Clock advanced without movement. Only hold-to-drag sensors react;
    /// distance and native sensors need a `pointer_move`.
    pub fn tick(&mut self, now_ms: u64) -> DragEvent {
        if matches!(self.state, DragState::Pending { .. }) && self.sensor.activates_on_hold() {
            self.check_activation(None, now_ms)
        } else {
            DragEvent::None
        }
    }

    /// Pointer released over `over`.
    pub fn pointer_up(&mut self, over: Option<LeadStatus>) -> DragEvent {
        match std::mem::take(&mut self.state) {
            DragState::Idle => DragEvent::None,
            DragState::Pending { lead_id, .. } => DragEvent::Clicked { lead_id },
            DragState::Dragging { lead_id, from, .. } => match resolve_drop(from, over) {
                Ok(to) => DragEvent::Dropped { lead_id, from, to },
                Err(reason) => DragEvent::Ignored { lead_id, reason },
            },
        }
    }

    /// Abort whatever is in progress.
    pub fn cancel(&mut self) -> DragEvent {
        match std::mem::take(&mut self.state) {
            DragState::Idle => DragEvent::None,
            DragState::Pending { lead_id, .. } | DragState::Dragging { lead_id, .. } => {
                DragEvent::Cancelled { lead_id }
            }
        }
    }

    fn check_activation(&mut self, over: Option<LeadStatus>, now_ms: u64) -> DragEvent {
        let DragState::Pending { lead_id, from, origin, last, pressed_ms } = self.state else {
            return DragEvent::None;
        };
        match self.sensor.check(origin, pressed_ms, last, now_ms) {
            ActivationCheck::Wait => DragEvent::None,
            ActivationCheck::Abort => {
                self.state = DragState::Idle;
                DragEvent::Abandoned { lead_id }
            }
            ActivationCheck::Activate => {
                self.state = DragState::Dragging { lead_id, from, over };
                DragEvent::Started { lead_id }
            }
        }
    }
}
