//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own validation and store access so route handlers stay
//! focused on request parsing and status-code translation.

pub mod lead;
pub mod transfer;
