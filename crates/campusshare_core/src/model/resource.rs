//! Shared academic resource model.
//!
//! # Responsibility
//! - Define the resource record and its visibility/kind vocabularies.
//! - Snapshot the owner's affiliation at creation time.
//!
//! # Invariants
//! - `rating_average` / `rating_count` are derived values; only the review
//!   aggregator writes them.
//! - `affiliation` does not change when the owner's profile changes later.

use crate::model::profile::ProfileId;
use crate::model::validation::ValidationError;
use crate::model::viewer::Viewer;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a shared resource.
pub type ResourceId = Uuid;

/// Who may see a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Visible to everyone, including anonymous viewers.
    Public,
    /// Visible to the owner and viewers sharing the snapshot affiliation.
    Private,
}

impl Visibility {
    /// Stable string id used in storage and on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }

    /// Parses the storage string form.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "public" => Some(Self::Public),
            "private" => Some(Self::Private),
            _ => None,
        }
    }
}

/// Category of shared material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Notes,
    Paper,
    Book,
    Other,
}

impl ResourceKind {
    /// Stable string id used in storage and on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Notes => "notes",
            Self::Paper => "paper",
            Self::Book => "book",
            Self::Other => "other",
        }
    }

    /// Parses the storage string form.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "notes" => Some(Self::Notes),
            "paper" => Some(Self::Paper),
            "book" => Some(Self::Book),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Caller-supplied fields for resource creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewResource {
    pub title: String,
    pub description: String,
    pub course: String,
    pub branch: String,
    pub semester: i64,
    pub kind: ResourceKind,
    pub year: i64,
    pub visibility: Visibility,
    /// Opaque handle into external file storage.
    pub content_pointer: String,
}

/// Persisted shared resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub owner_id: ProfileId,
    pub title: String,
    pub description: String,
    pub course: String,
    pub branch: String,
    pub semester: i64,
    pub kind: ResourceKind,
    pub year: i64,
    /// Owner affiliation snapshotted at creation time.
    pub affiliation: String,
    pub visibility: Visibility,
    /// Derived: mean of current review ratings, one decimal, half-up.
    pub rating_average: f64,
    /// Derived: number of current reviews.
    pub rating_count: i64,
    pub content_pointer: String,
    /// Unix epoch milliseconds; anchors the mutation lock window.
    pub created_at: i64,
}

impl Resource {
    /// Builds a resource owned by `owner`, snapshotting its affiliation.
    ///
    /// Aggregates start at `0.0` / `0`; only the review aggregator moves
    /// them afterwards.
    pub fn create(owner: &Viewer, spec: NewResource, created_at: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id: owner.id,
            title: spec.title,
            description: spec.description,
            course: spec.course,
            branch: spec.branch,
            semester: spec.semester,
            kind: spec.kind,
            year: spec.year,
            affiliation: owner.affiliation.clone(),
            visibility: spec.visibility,
            rating_average: 0.0,
            rating_count: 0,
            content_pointer: spec.content_pointer,
            created_at,
        }
    }

    /// Checks write-model invariants before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_nil() {
            return Err(ValidationError::NilId("resource.id"));
        }
        if self.title.trim().is_empty() {
            return Err(ValidationError::BlankField("resource.title"));
        }
        if self.course.trim().is_empty() {
            return Err(ValidationError::BlankField("resource.course"));
        }
        if !(1..=12).contains(&self.semester) {
            return Err(ValidationError::SemesterOutOfRange(self.semester));
        }
        if !(1950..=2100).contains(&self.year) {
            return Err(ValidationError::YearOutOfRange(self.year));
        }
        Ok(())
    }
}
