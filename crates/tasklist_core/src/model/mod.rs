//! Domain model for task lists and their tasks.
//!
//! # Responsibility
//! - Define the records persisted in the lists blob.
//! - Validate user input before the store mutates state.
//!
//! # Invariants
//! - Lists and tasks are identified by opaque, stable string ids.
//! - Tasks are owned by exactly one list.

pub mod task;
pub mod task_list;
