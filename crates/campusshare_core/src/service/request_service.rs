//! Resource-request fulfillment service.
//!
//! # Responsibility
//! - Create open requests and drive the `open -> fulfilled` transition.
//!
//! # Invariants
//! - Any authenticated viewer may fulfill any open request; no linkage to
//!   the requester is enforced.
//! - A request may be fulfilled exactly once; re-fulfilling is rejected
//!   with `AlreadyFulfilled` (strict guarded transition).
//! - The supplied resource id is recorded without validation.

use crate::clock::Clock;
use crate::model::request::{RequestId, RequestStatus, ResourceRequest};
use crate::model::resource::ResourceId;
use crate::model::validation::ValidationError;
use crate::model::viewer::Viewer;
use crate::repo::request_repo::RequestRepository;
use crate::repo::RepoError;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from request use-cases.
#[derive(Debug)]
pub enum RequestServiceError {
    /// Target request does not exist.
    NotFound(RequestId),
    /// Request has already been fulfilled; the transition is terminal.
    AlreadyFulfilled(RequestId),
    /// Malformed input.
    Validation(ValidationError),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Write succeeded but the read-back disagreed.
    InconsistentState(&'static str),
}

impl Display for RequestServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "request not found: {id}"),
            Self::AlreadyFulfilled(id) => write!(f, "request already fulfilled: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => {
                write!(f, "inconsistent request state: {details}")
            }
        }
    }
}

impl Error for RequestServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for RequestServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound {
                entity: "request",
                id,
            } => Self::NotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Request fulfillment use-case service.
pub struct RequestService<R: RequestRepository, C: Clock> {
    repo: R,
    clock: C,
}

impl<R: RequestRepository, C: Clock> RequestService<R, C> {
    pub fn new(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Opens a new request on behalf of `requester`.
    pub fn create_request(
        &self,
        requester: &Viewer,
        title: impl Into<String>,
        detail: impl Into<String>,
    ) -> Result<ResourceRequest, RequestServiceError> {
        let request =
            ResourceRequest::new(requester.id, title, detail, self.clock.now_epoch_ms());
        self.repo.create_request(&request)?;
        Ok(request)
    }

    /// Fulfills an open request with the supplied resource id.
    ///
    /// `_fulfiller` is required so only authenticated viewers reach this
    /// path, but carries no further authority: fulfillment is open to
    /// anyone. The resource id is recorded as-is, unvalidated.
    pub fn fulfill(
        &self,
        _fulfiller: &Viewer,
        request_id: RequestId,
        resource_id: ResourceId,
    ) -> Result<ResourceRequest, RequestServiceError> {
        let transitioned = self.repo.mark_fulfilled(request_id, resource_id)?;

        if !transitioned {
            // Classify: absent row vs. terminal state.
            return match self.repo.get_request(request_id)? {
                None => Err(RequestServiceError::NotFound(request_id)),
                Some(_) => Err(RequestServiceError::AlreadyFulfilled(request_id)),
            };
        }

        info!(
            "event=request_fulfill module=service status=ok request_id={} resource_id={}",
            request_id, resource_id
        );

        let Some(request) = self.repo.get_request(request_id)? else {
            return Err(RequestServiceError::InconsistentState(
                "request vanished after fulfillment",
            ));
        };
        Ok(request)
    }

    /// Gets one request by id.
    pub fn get_request(&self, id: RequestId) -> Result<ResourceRequest, RequestServiceError> {
        self.repo
            .get_request(id)?
            .ok_or(RequestServiceError::NotFound(id))
    }

    /// Lists requests, optionally restricted to one status, newest first.
    pub fn list_requests(
        &self,
        status: Option<RequestStatus>,
    ) -> Result<Vec<ResourceRequest>, RequestServiceError> {
        Ok(self.repo.list_requests(status)?)
    }
}
