//! HTTP handlers.
//!
//! Every request builds a fresh manager or reconciler over the shared store,
//! runs one operation, and returns the resulting state.

pub mod checklist;
pub mod family;
pub mod members;
pub mod todos;
