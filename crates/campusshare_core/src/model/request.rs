//! Community resource request model.
//!
//! # Invariants
//! - Lifecycle is `open -> fulfilled`; `fulfilled` is terminal.
//! - `fulfilled_resource_id` is set exactly once, on the transition to
//!   `fulfilled`, and is not validated against the resources table.

use crate::model::profile::ProfileId;
use crate::model::resource::ResourceId;
use crate::model::validation::ValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a resource request.
pub type RequestId = Uuid;

/// Lifecycle state of a resource request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Initial state; awaiting a matching resource.
    Open,
    /// Terminal state; a resource id has been recorded.
    Fulfilled,
}

impl RequestStatus {
    /// Stable string id used in storage and on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Fulfilled => "fulfilled",
        }
    }

    /// Parses the storage string form.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "open" => Some(Self::Open),
            "fulfilled" => Some(Self::Fulfilled),
            _ => None,
        }
    }
}

/// An open call for a resource the community is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRequest {
    pub id: RequestId,
    pub requester_id: ProfileId,
    pub title: String,
    pub detail: String,
    pub status: RequestStatus,
    pub fulfilled_resource_id: Option<ResourceId>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl ResourceRequest {
    /// Builds a new open request with a generated id.
    pub fn new(
        requester_id: ProfileId,
        title: impl Into<String>,
        detail: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            requester_id,
            title: title.into(),
            detail: detail.into(),
            status: RequestStatus::Open,
            fulfilled_resource_id: None,
            created_at,
        }
    }

    /// Checks write-model invariants before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_nil() {
            return Err(ValidationError::NilId("request.id"));
        }
        if self.title.trim().is_empty() {
            return Err(ValidationError::BlankField("request.title"));
        }
        Ok(())
    }

    /// Returns whether the request still awaits fulfillment.
    pub fn is_open(&self) -> bool {
        self.status == RequestStatus::Open
    }
}
