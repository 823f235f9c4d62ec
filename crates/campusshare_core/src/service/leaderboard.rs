//! Contribution scoring and leaderboard projection.
//!
//! # Responsibility
//! - Derive per-contributor points from resource records at query time.
//!
//! # Invariants
//! - Points are never stored; this is a pure projection.
//! - +10 per public resource, +5 per private resource.
//! - Profiles with zero resources appear with 0 points.
//! - Ordering is points descending, ties broken by ascending profile id,
//!   so output is deterministic regardless of input iteration order.

use crate::model::profile::{Profile, ProfileId};
use crate::model::resource::{Resource, Visibility};
use crate::repo::profile_repo::ProfileRepository;
use crate::repo::resource_repo::{ResourceListQuery, ResourceRepository};
use crate::repo::RepoResult;
use serde::Serialize;
use std::collections::HashMap;

/// Points awarded per public resource.
pub const PUBLIC_RESOURCE_POINTS: i64 = 10;
/// Points awarded per private resource.
pub const PRIVATE_RESOURCE_POINTS: i64 = 5;

/// One ranked leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub profile_id: ProfileId,
    pub points: i64,
}

/// Derives the contributor leaderboard from profiles and resources.
///
/// Resources whose owner is not in `profiles` are ignored; the profile
/// roster defines who appears.
pub fn compute_leaderboard(profiles: &[Profile], resources: &[Resource]) -> Vec<LeaderboardEntry> {
    let mut points: HashMap<ProfileId, i64> =
        profiles.iter().map(|profile| (profile.id, 0)).collect();

    for resource in resources {
        let Some(total) = points.get_mut(&resource.owner_id) else {
            continue;
        };
        *total += match resource.visibility {
            Visibility::Public => PUBLIC_RESOURCE_POINTS,
            Visibility::Private => PRIVATE_RESOURCE_POINTS,
        };
    }

    let mut entries: Vec<LeaderboardEntry> = points
        .into_iter()
        .map(|(profile_id, points)| LeaderboardEntry { profile_id, points })
        .collect();

    entries.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then_with(|| a.profile_id.cmp(&b.profile_id))
    });

    entries
}

/// Leaderboard use-case service.
pub struct LeaderboardService<P: ProfileRepository, R: ResourceRepository> {
    profiles: P,
    resources: R,
}

impl<P: ProfileRepository, R: ResourceRepository> LeaderboardService<P, R> {
    pub fn new(profiles: P, resources: R) -> Self {
        Self {
            profiles,
            resources,
        }
    }

    /// Computes the current leaderboard over all profiles and resources.
    pub fn leaderboard(&self) -> RepoResult<Vec<LeaderboardEntry>> {
        let profiles = self.profiles.list_profiles()?;
        let resources = self.resources.list_resources(&ResourceListQuery::default())?;
        Ok(compute_leaderboard(&profiles, &resources))
    }
}
