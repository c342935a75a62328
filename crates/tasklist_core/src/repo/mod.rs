//! Persistence adapter between the store and key-value storage.
//!
//! # Responsibility
//! - Define the whole-blob save/load contract used by `ListStore`.
//! - Keep JSON encoding details out of the store.
//!
//! # Invariants
//! - Write failures are swallowed at this layer; read failures can be
//!   surfaced through `try_load_lists`.

pub mod list_repo;
