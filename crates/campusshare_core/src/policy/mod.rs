//! Pure access-policy predicates.
//!
//! # Responsibility
//! - Decide visibility for (viewer, resource) pairs.
//! - Decide mutation permission for (viewer, record, now) triples.
//!
//! # Invariants
//! - Policy functions are side-effect free and never touch storage.
//! - Viewer identity is always an explicit argument, never ambient state.

pub mod lock;
pub mod visibility;
