//! Review use-case service.
//!
//! # Responsibility
//! - Gate review update/delete with the ownership/time-lock guard.
//! - Delegate uniqueness and aggregate refresh to the repository, which
//!   runs both with the review write in one transaction.
//!
//! # Invariants
//! - The guard uses the review's own `reviewer_id` and original
//!   `created_at`; updating a review does not reset its lock window.
//! - Nothing here prevents an owner from reviewing their own resource.

use crate::clock::Clock;
use crate::model::profile::ProfileId;
use crate::model::resource::ResourceId;
use crate::model::review::{Review, ReviewId};
use crate::model::validation::ValidationError;
use crate::model::viewer::Viewer;
use crate::policy::lock::{check_mutation, MutationCheck};
use crate::repo::review_repo::ReviewRepository;
use crate::repo::RepoError;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from review use-cases.
#[derive(Debug)]
pub enum ReviewServiceError {
    /// Target resource does not exist.
    ResourceNotFound(ResourceId),
    /// Target review does not exist.
    ReviewNotFound(ReviewId),
    /// The viewer already reviewed this resource.
    DuplicateReview {
        resource_id: ResourceId,
        reviewer_id: ProfileId,
    },
    /// Mutation attempted by a viewer who did not author the review.
    NotOwner(ReviewId),
    /// Mutation attempted outside the 24h lock window.
    LockExpired(ReviewId),
    /// Malformed input, e.g. rating outside [1,5].
    Validation(ValidationError),
    /// Persistence-layer failure, including a failed aggregate refresh
    /// (which rolls the review write back).
    Repo(RepoError),
}

impl Display for ReviewServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ResourceNotFound(id) => write!(f, "resource not found: {id}"),
            Self::ReviewNotFound(id) => write!(f, "review not found: {id}"),
            Self::DuplicateReview {
                resource_id,
                reviewer_id,
            } => write!(
                f,
                "reviewer {reviewer_id} already reviewed resource {resource_id}"
            ),
            Self::NotOwner(id) => write!(f, "viewer did not author review: {id}"),
            Self::LockExpired(id) => write!(f, "review mutation window has expired: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ReviewServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ReviewServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound {
                entity: "resource",
                id,
            } => Self::ResourceNotFound(id),
            RepoError::NotFound {
                entity: "review",
                id,
            } => Self::ReviewNotFound(id),
            RepoError::DuplicateReview {
                resource_id,
                reviewer_id,
            } => Self::DuplicateReview {
                resource_id,
                reviewer_id,
            },
            other => Self::Repo(other),
        }
    }
}

/// Review use-case service.
pub struct ReviewService<R: ReviewRepository, C: Clock> {
    repo: R,
    clock: C,
}

impl<R: ReviewRepository, C: Clock> ReviewService<R, C> {
    pub fn new(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Submits a new review by `viewer` for `resource_id`.
    ///
    /// Rejected with `DuplicateReview` when the storage uniqueness
    /// constraint fires; on success the resource aggregate is already
    /// refreshed when this returns.
    pub fn submit_review(
        &mut self,
        viewer: &Viewer,
        resource_id: ResourceId,
        rating: i64,
        comment: impl Into<String>,
    ) -> Result<Review, ReviewServiceError> {
        let review = Review::new(
            resource_id,
            viewer.id,
            rating,
            comment,
            self.clock.now_epoch_ms(),
        );
        self.repo.submit_review(&review)?;
        info!(
            "event=review_submit module=service status=ok review_id={} resource_id={}",
            review.id, resource_id
        );
        Ok(review)
    }

    /// Replaces the rating/comment of the viewer's own review.
    pub fn update_review(
        &mut self,
        viewer: &Viewer,
        review_id: ReviewId,
        rating: i64,
        comment: impl Into<String>,
    ) -> Result<Review, ReviewServiceError> {
        let existing = self.require_mutable(viewer, review_id)?;

        let updated = Review {
            rating,
            comment: comment.into(),
            ..existing
        };

        self.repo.update_review(&updated)?;
        Ok(updated)
    }

    /// Deletes the viewer's own review.
    pub fn delete_review(
        &mut self,
        viewer: &Viewer,
        review_id: ReviewId,
    ) -> Result<(), ReviewServiceError> {
        self.require_mutable(viewer, review_id)?;
        self.repo.delete_review(review_id)?;
        info!(
            "event=review_delete module=service status=ok review_id={}",
            review_id
        );
        Ok(())
    }

    /// Lists all reviews of a resource, newest first.
    pub fn list_reviews(
        &self,
        resource_id: ResourceId,
    ) -> Result<Vec<Review>, ReviewServiceError> {
        Ok(self.repo.list_reviews_for_resource(resource_id)?)
    }

    fn require_mutable(
        &self,
        viewer: &Viewer,
        review_id: ReviewId,
    ) -> Result<Review, ReviewServiceError> {
        let Some(review) = self.repo.get_review(review_id)? else {
            return Err(ReviewServiceError::ReviewNotFound(review_id));
        };

        match check_mutation(
            viewer,
            review.reviewer_id,
            review.created_at,
            self.clock.now_epoch_ms(),
        ) {
            MutationCheck::Allowed => Ok(review),
            MutationCheck::NotOwner => Err(ReviewServiceError::NotOwner(review_id)),
            MutationCheck::LockExpired => Err(ReviewServiceError::LockExpired(review_id)),
        }
    }
}
