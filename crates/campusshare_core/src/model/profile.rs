//! Contributor profile model.
//!
//! # Invariants
//! - `id` is assigned by the external identity provider and never reused.
//! - Profiles are mutated only by the owning viewer and never deleted by
//!   this core.

use crate::model::validation::ValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a contributor profile.
pub type ProfileId = Uuid;

/// Registered contributor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Identity-provider id, shared with `Viewer.id`.
    pub id: ProfileId,
    pub name: String,
    /// College the contributor belongs to.
    pub affiliation: String,
    /// Academic branch, e.g. "cse".
    pub branch: String,
    /// Year of study, 1..=6.
    pub year: i64,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl Profile {
    /// Creates a profile for an identity-provider id.
    pub fn new(
        id: ProfileId,
        name: impl Into<String>,
        affiliation: impl Into<String>,
        branch: impl Into<String>,
        year: i64,
        created_at: i64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            affiliation: affiliation.into(),
            branch: branch.into(),
            year,
            created_at,
        }
    }

    /// Checks write-model invariants before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_nil() {
            return Err(ValidationError::NilId("profile.id"));
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::BlankField("profile.name"));
        }
        if self.affiliation.trim().is_empty() {
            return Err(ValidationError::BlankField("profile.affiliation"));
        }
        if !(1..=6).contains(&self.year) {
            return Err(ValidationError::StudyYearOutOfRange(self.year));
        }
        Ok(())
    }
}
