//! Pointer sensors: when does a press become a drag?
//!
//! Every board variant differed only in these numbers, so they are data here.
//! A `SensorConfig` pairs a drag backend with an activation constraint; the
//! drag state machine asks it, on every move or tick, whether a pending press
//! should activate, keep waiting, or be abandoned.

#[cfg(test)]
#[path = "sensor_test.rs"]
mod sensor_test;

use serde::{Deserialize, Serialize};

use crate::consts::{RESPONSIVE_DISTANCE_PX, STANDARD_DISTANCE_PX, TOUCH_DELAY_MS, TOUCH_TOLERANCE_PX};

/// A point in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Where drag events come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragBackend {
    /// Pointer events interpreted by a drag library; honours the activation constraint.
    #[default]
    Library,
    /// HTML5 `dragstart`/`dragover`/`drop`; the browser has already decided
    /// the press is a drag, so the first move activates.
    Native,
}

/// Condition a pending press must meet before it becomes a drag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Activation {
    /// Activate once the pointer has travelled `px` from the press point.
    Distance { px: f64 },
    /// Activate after holding for `ms` without travelling more than `tolerance_px`.
    Delay { ms: u64, tolerance_px: f64 },
}

/// Result of checking a pending press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationCheck {
    /// Not yet; keep the press pending.
    Wait,
    /// Start the drag.
    Activate,
    /// The press moved too much during a delay; treat it as a scroll.
    Abort,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorConfig {
    pub backend: DragBackend,
    pub activation: Activation,
}

impl SensorConfig {
    /// Mouse default: 8px travel.
    #[must_use]
    pub fn standard() -> Self {
        Self { backend: DragBackend::Library, activation: Activation::Distance { px: STANDARD_DISTANCE_PX } }
    }

    /// Low-latency boards: 3px travel.
    #[must_use]
    pub fn responsive() -> Self {
        Self { backend: DragBackend::Library, activation: Activation::Distance { px: RESPONSIVE_DISTANCE_PX } }
    }

    /// Any movement starts a drag.
    #[must_use]
    pub fn immediate() -> Self {
        Self { backend: DragBackend::Library, activation: Activation::Distance { px: 0.0 } }
    }

    /// Press and hold for touch screens.
    #[must_use]
    pub fn touch() -> Self {
        Self {
            backend: DragBackend::Library,
            activation: Activation::Delay { ms: TOUCH_DELAY_MS, tolerance_px: TOUCH_TOLERANCE_PX },
        }
    }

    /// Native HTML5 drag events.
    #[must_use]
    pub fn native() -> Self {
        Self { backend: DragBackend::Native, activation: Activation::Distance { px: 0.0 } }
    }

    /// Look up a preset by name (`standard`, `responsive`, `immediate`, `touch`, `native`).
    #[must_use]
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "standard" => Some(Self::standard()),
            "responsive" => Some(Self::responsive()),
            "immediate" => Some(Self::immediate()),
            "touch" => Some(Self::touch()),
            "native" => Some(Self::native()),
            _ => None,
        }
    }

    /// Whether a press can activate from the clock alone, without movement.
    #[must_use]
    pub fn activates_on_hold(&self) -> bool {
        self.backend == DragBackend::Library && matches!(self.activation, Activation::Delay { .. })
    }

    /// Decide whether a press at `origin`/`pressed_ms` should activate now
    /// that the pointer is at `current` and the clock reads `now_ms`.
    #[must_use]
    pub fn check(&self, origin: Point, pressed_ms: u64, current: Point, now_ms: u64) -> ActivationCheck {
        if self.backend == DragBackend::Native {
            return ActivationCheck::Activate;
        }
        let travelled = origin.distance(current);
        match self.activation {
            Activation::Distance { px } => {
                if travelled >= px {
                    ActivationCheck::Activate
                } else {
                    ActivationCheck::Wait
                }
            }
            Activation::Delay { ms, tolerance_px } => {
                if travelled > tolerance_px {
                    ActivationCheck::Abort
                } else if now_ms.saturating_sub(pressed_ms) >= ms {
                    ActivationCheck::Activate
                } else {
                    ActivationCheck::Wait
                }
            }
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self::standard()
    }
}
