//! Core domain logic for CampusShare.
//! This crate is the single source of truth for visibility, ownership-lock
//! and aggregate-consistency invariants.

pub mod clock;
pub mod db;
pub mod logging;
pub mod model;
pub mod policy;
pub mod repo;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::profile::{Profile, ProfileId};
pub use model::request::{RequestId, RequestStatus, ResourceRequest};
pub use model::resource::{NewResource, Resource, ResourceId, ResourceKind, Visibility};
pub use model::review::{Review, ReviewId};
pub use model::validation::ValidationError;
pub use model::viewer::Viewer;
pub use policy::lock::{check_mutation, MutationCheck, LOCK_WINDOW_MS};
pub use policy::visibility::{can_view, filter_visible};
pub use repo::profile_repo::{ProfileRepository, SqliteProfileRepository};
pub use repo::request_repo::{RequestRepository, SqliteRequestRepository};
pub use repo::resource_repo::{
    ResourceListQuery, ResourceRepository, SqliteResourceRepository,
};
pub use repo::review_repo::{ReviewRepository, SqliteReviewRepository};
pub use repo::{RepoError, RepoResult};
pub use service::leaderboard::{compute_leaderboard, LeaderboardEntry};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
