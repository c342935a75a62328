//! Core use-case routines built on top of the store.
//!
//! # Responsibility
//! - Orchestrate multi-step store flows (startup initialization).
//! - Keep UI/FFI layers decoupled from storage details.

pub mod bootstrap;
