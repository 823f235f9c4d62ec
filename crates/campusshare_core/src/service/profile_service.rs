//! Profile use-case service.
//!
//! # Invariants
//! - A profile's id is the viewer's identity-provider id.
//! - Only the owning viewer may update a profile; no time lock applies.

use crate::clock::Clock;
use crate::model::profile::{Profile, ProfileId};
use crate::model::validation::ValidationError;
use crate::model::viewer::Viewer;
use crate::repo::profile_repo::ProfileRepository;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from profile use-cases.
#[derive(Debug)]
pub enum ProfileServiceError {
    /// Target profile does not exist.
    NotFound(ProfileId),
    /// Mutation attempted by a viewer who does not own the profile.
    NotOwner(ProfileId),
    /// Malformed input.
    Validation(ValidationError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ProfileServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "profile not found: {id}"),
            Self::NotOwner(id) => write!(f, "viewer does not own profile: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProfileServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ProfileServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound {
                entity: "profile",
                id,
            } => Self::NotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Caller-supplied mutable profile fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: String,
    pub affiliation: String,
    pub branch: String,
    pub year: i64,
}

/// Profile use-case service.
pub struct ProfileService<R: ProfileRepository, C: Clock> {
    repo: R,
    clock: C,
}

impl<R: ProfileRepository, C: Clock> ProfileService<R, C> {
    pub fn new(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Registers a profile for the viewer's identity.
    ///
    /// The profile id and affiliation come from the resolved identity, not
    /// from caller input.
    pub fn register(
        &self,
        viewer: &Viewer,
        name: impl Into<String>,
        branch: impl Into<String>,
        year: i64,
    ) -> Result<Profile, ProfileServiceError> {
        let profile = Profile::new(
            viewer.id,
            name,
            viewer.affiliation.clone(),
            branch,
            year,
            self.clock.now_epoch_ms(),
        );
        self.repo.create_profile(&profile)?;
        Ok(profile)
    }

    /// Updates the viewer's own profile.
    pub fn update_profile(
        &self,
        viewer: &Viewer,
        profile_id: ProfileId,
        update: ProfileUpdate,
    ) -> Result<Profile, ProfileServiceError> {
        if viewer.id != profile_id {
            return Err(ProfileServiceError::NotOwner(profile_id));
        }

        let Some(mut profile) = self.repo.get_profile(profile_id)? else {
            return Err(ProfileServiceError::NotFound(profile_id));
        };

        profile.name = update.name;
        profile.affiliation = update.affiliation;
        profile.branch = update.branch;
        profile.year = update.year;

        self.repo.update_profile(&profile)?;
        Ok(profile)
    }

    /// Gets one profile by id.
    pub fn get_profile(&self, id: ProfileId) -> Result<Profile, ProfileServiceError> {
        self.repo
            .get_profile(id)?
            .ok_or(ProfileServiceError::NotFound(id))
    }
}
