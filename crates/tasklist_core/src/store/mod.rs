//! Client-side state store.
//!
//! # Responsibility
//! - Hold the authoritative in-memory task lists for UI callers.
//! - Write every mutation through to the persistence adapter.

pub mod list_store;
