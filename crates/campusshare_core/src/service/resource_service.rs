//! Resource use-case service.
//!
//! # Responsibility
//! - Gate single-item reads with the visibility policy (access-denied is
//!   distinct from not-found).
//! - Gate update/delete with the ownership/time-lock guard.
//! - Apply visibility filtering and pagination over repository list
//!   results in display order.
//!
//! # Invariants
//! - Affiliation is snapshotted from the creating viewer; updates never
//!   touch it, the owner, the creation time, or the rating aggregates.
//! - Pagination is applied after visibility filtering so page numbering
//!   stays stable relative to display order.

use crate::clock::Clock;
use crate::model::resource::{NewResource, Resource, ResourceId};
use crate::model::validation::ValidationError;
use crate::model::viewer::Viewer;
use crate::policy::lock::{check_mutation, MutationCheck};
use crate::policy::visibility::{can_view, filter_visible};
use crate::repo::resource_repo::{ResourceListQuery, ResourceRepository};
use crate::repo::RepoError;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

const LIST_DEFAULT_LIMIT: u32 = 20;
const LIST_LIMIT_MAX: u32 = 100;

/// Errors from resource use-cases.
#[derive(Debug)]
pub enum ResourceServiceError {
    /// Target resource does not exist.
    NotFound(ResourceId),
    /// Resource exists but the visibility policy denies this viewer.
    AccessDenied(ResourceId),
    /// Mutation attempted by a viewer who does not own the resource.
    NotOwner(ResourceId),
    /// Mutation attempted outside the 24h lock window.
    LockExpired(ResourceId),
    /// Malformed input.
    Validation(ValidationError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ResourceServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "resource not found: {id}"),
            Self::AccessDenied(id) => write!(f, "resource not visible to viewer: {id}"),
            Self::NotOwner(id) => write!(f, "viewer does not own resource: {id}"),
            Self::LockExpired(id) => {
                write!(f, "resource mutation window has expired: {id}")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ResourceServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ResourceServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound {
                entity: "resource",
                id,
            } => Self::NotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Resource use-case service.
pub struct ResourceService<R: ResourceRepository, C: Clock> {
    repo: R,
    clock: C,
}

impl<R: ResourceRepository, C: Clock> ResourceService<R, C> {
    pub fn new(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Creates a resource owned by `owner`, snapshotting its affiliation.
    pub fn create_resource(
        &self,
        owner: &Viewer,
        spec: NewResource,
    ) -> Result<Resource, ResourceServiceError> {
        let resource = Resource::create(owner, spec, self.clock.now_epoch_ms());
        self.repo.create_resource(&resource)?;
        info!(
            "event=resource_create module=service status=ok resource_id={} visibility={}",
            resource.id,
            resource.visibility.as_str()
        );
        Ok(resource)
    }

    /// Gets one resource, visibility-gated.
    ///
    /// An existing-but-hidden resource yields `AccessDenied`, not
    /// `NotFound`.
    pub fn get_resource(
        &self,
        viewer: Option<&Viewer>,
        id: ResourceId,
    ) -> Result<Resource, ResourceServiceError> {
        let Some(resource) = self.repo.get_resource(id)? else {
            return Err(ResourceServiceError::NotFound(id));
        };

        if !can_view(viewer, &resource) {
            return Err(ResourceServiceError::AccessDenied(id));
        }

        Ok(resource)
    }

    /// Lists resources visible to `viewer`.
    ///
    /// The repository applies query filters and the fixed
    /// `created_at DESC, id ASC` ordering; this method then filters per
    /// item by visibility and finally paginates.
    pub fn list_resources(
        &self,
        viewer: Option<&Viewer>,
        query: &ResourceListQuery,
        limit: Option<u32>,
        offset: u32,
    ) -> Result<Vec<Resource>, ResourceServiceError> {
        let candidates = self.repo.list_resources(query)?;
        let visible = filter_visible(viewer, candidates);

        let limit = normalize_list_limit(limit) as usize;
        Ok(visible
            .into_iter()
            .skip(offset as usize)
            .take(limit)
            .collect())
    }

    /// Replaces the caller-editable fields of an owned resource.
    ///
    /// Owner, affiliation snapshot, creation time and rating aggregates
    /// are preserved from the existing row. The lock window stays anchored
    /// to the original creation time.
    pub fn update_resource(
        &self,
        viewer: &Viewer,
        id: ResourceId,
        spec: NewResource,
    ) -> Result<Resource, ResourceServiceError> {
        let existing = self.require_mutable(viewer, id)?;

        let updated = Resource {
            title: spec.title,
            description: spec.description,
            course: spec.course,
            branch: spec.branch,
            semester: spec.semester,
            kind: spec.kind,
            year: spec.year,
            visibility: spec.visibility,
            content_pointer: spec.content_pointer,
            ..existing
        };

        self.repo.update_resource(&updated)?;
        Ok(updated)
    }

    /// Deletes an owned resource; its reviews cascade.
    pub fn delete_resource(
        &self,
        viewer: &Viewer,
        id: ResourceId,
    ) -> Result<(), ResourceServiceError> {
        self.require_mutable(viewer, id)?;
        self.repo.delete_resource(id)?;
        info!(
            "event=resource_delete module=service status=ok resource_id={}",
            id
        );
        Ok(())
    }

    fn require_mutable(
        &self,
        viewer: &Viewer,
        id: ResourceId,
    ) -> Result<Resource, ResourceServiceError> {
        let Some(resource) = self.repo.get_resource(id)? else {
            return Err(ResourceServiceError::NotFound(id));
        };

        match check_mutation(
            viewer,
            resource.owner_id,
            resource.created_at,
            self.clock.now_epoch_ms(),
        ) {
            MutationCheck::Allowed => Ok(resource),
            MutationCheck::NotOwner => Err(ResourceServiceError::NotOwner(id)),
            MutationCheck::LockExpired => Err(ResourceServiceError::LockExpired(id)),
        }
    }
}

/// Normalizes a list limit: default 20, clamped to 100.
pub fn normalize_list_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) => LIST_DEFAULT_LIMIT,
        Some(value) if value > LIST_LIMIT_MAX => LIST_LIMIT_MAX,
        Some(value) => value,
        None => LIST_DEFAULT_LIMIT,
    }
}
