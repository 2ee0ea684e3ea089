//! Pure domain logic for the Foyer household app.
//!
//! Nothing in this crate performs I/O. The checklist template, the derived
//! view model, change-event shapes and form validation live here so the
//! store-facing crates can share them.

pub mod change;
pub mod checklist;
pub mod error;
pub mod template;
pub mod types;
pub mod validation;
