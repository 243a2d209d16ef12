//! Domain layer types and invariants.

pub mod error;
pub mod index;
pub mod metadata;
