//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate policy checks and repository calls into use-case APIs.
//! - Keep the request-handling layer decoupled from storage details.
//!
//! # Invariants
//! - Write entry points take an authenticated `&Viewer`; read entry points
//!   take `Option<&Viewer>` so anonymous access stays explicit.
//! - Services never bypass repository validation/persistence contracts.

pub mod leaderboard;
pub mod profile_service;
pub mod request_service;
pub mod resource_service;
pub mod review_service;
