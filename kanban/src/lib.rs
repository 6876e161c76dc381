//! Pipeline board core for the lead CRM.
//!
//! This crate owns everything about the Kanban board that does not depend on
//! a browser or a database: the lead record and its stage catalog, projecting
//! a flat lead list into status columns, turning raw pointer events into drag
//! gestures, and committing a completed drop as exactly one partial update.
//! Hosts (the HTTP service, a WASM front-end, tests) supply a [`store::LeadStore`]
//! and a [`notify::Notifier`] and forward pointer input to a
//! [`board::KanbanBoard`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`board`] | Board instance: leads, columns, drag session, optimistic overlay |
//! | [`drag`] | Drag session state machine and drop resolution |
//! | [`sensor`] | Pointer activation constraints and drag backends |
//! | [`columns`] | Column definitions, grouping and sort policy |
//! | [`commit`] | Move commit with the in-flight guard |
//! | [`lead`] | Lead record, sparse patch and creation payload |
//! | [`stage`] | The seven pipeline stages and their display metadata |
//! | [`store`] | Data-access trait and the in-memory implementation |
//! | [`notify`] | Toast-style notification sink |
//! | [`consts`] | Shared numeric constants |

pub mod board;
pub mod columns;
pub mod commit;
pub mod consts;
pub mod drag;
pub mod lead;
pub mod notify;
pub mod sensor;
pub mod stage;
pub mod store;

#[cfg(test)]
mod test_helpers;
