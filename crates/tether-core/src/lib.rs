//! Core types and errors for the tether constraint layout engine.
//!
//! This crate provides the foundational types used across the other tether crates:
//! - Widget identities and geometry variables
//! - Parameters that compiled layouts are evaluated against
//! - Resolved geometry
//! - Error types

pub mod errors;
pub mod types;

pub use errors::*;
pub use types::*;
