//! Domain operations over the task-list store.
//!
//! # Responsibility
//! - Be the only mutation entry point for lists and tasks.
//! - Enforce invariants storage does not (non-blank input, a selected list,
//!   at least one list kept).

pub mod board_service;
