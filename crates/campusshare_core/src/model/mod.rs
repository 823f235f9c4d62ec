//! Domain model for the resource-sharing core.
//!
//! # Responsibility
//! - Define the canonical records persisted by the durable store.
//! - Keep validation rules next to the data they protect.
//!
//! # Invariants
//! - Every record is identified by a stable UUID.
//! - `Resource.affiliation` is a creation-time snapshot of the owner's
//!   affiliation, never a live reference.
//! - Rating aggregates on `Resource` are derived values owned by the
//!   review aggregator.

pub mod profile;
pub mod request;
pub mod resource;
pub mod review;
pub mod validation;
pub mod viewer;
