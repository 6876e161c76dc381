//! Shared numeric constants for the kanban crate.

// ── Pointer activation ──────────────────────────────────────────

/// Default drag activation distance in CSS pixels.
pub const STANDARD_DISTANCE_PX: f64 = 8.0;

/// Activation distance for the low-latency board preset.
pub const RESPONSIVE_DISTANCE_PX: f64 = 3.0;

/// Press-and-hold delay before a touch drag activates, in milliseconds.
pub const TOUCH_DELAY_MS: u64 = 250;

/// Movement allowed during the touch delay before the press is treated as a scroll.
pub const TOUCH_TOLERANCE_PX: f64 = 5.0;

// ── Lead scoring ────────────────────────────────────────────────

/// Lowest valid qualification score.
pub const SCORE_MIN: i32 = 0;

/// Highest valid qualification score.
pub const SCORE_MAX: i32 = 100;
