//! Domain records and derived values.
//!
//! # Responsibility
//! - Define the list/task records shared by storage, live queries and the
//!   board service.
//! - Compute the progress summary shown for the selected list.
//!
//! # Invariants
//! - Ids are assigned by storage and never reused.
//! - A task belongs to exactly one list, by reference.

pub mod progress;
pub mod task;
pub mod task_list;
