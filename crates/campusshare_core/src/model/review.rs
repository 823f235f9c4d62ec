//! Review model.
//!
//! # Invariants
//! - `rating` is an integer in [1,5].
//! - At most one review exists per `(resource_id, reviewer_id)` pair; the
//!   storage layer enforces this with a unique constraint.

use crate::model::profile::ProfileId;
use crate::model::resource::ResourceId;
use crate::model::validation::ValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a review.
pub type ReviewId = Uuid;

/// A viewer's rating of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub resource_id: ResourceId,
    pub reviewer_id: ProfileId,
    /// Integer rating in [1,5].
    pub rating: i64,
    pub comment: String,
    /// Unix epoch milliseconds; anchors the mutation lock window.
    pub created_at: i64,
}

impl Review {
    /// Builds a new review with a generated id.
    pub fn new(
        resource_id: ResourceId,
        reviewer_id: ProfileId,
        rating: i64,
        comment: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            resource_id,
            reviewer_id,
            rating,
            comment: comment.into(),
            created_at,
        }
    }

    /// Checks write-model invariants before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_nil() {
            return Err(ValidationError::NilId("review.id"));
        }
        if !(1..=5).contains(&self.rating) {
            return Err(ValidationError::RatingOutOfRange(self.rating));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Review;
    use crate::model::validation::ValidationError;
    use uuid::Uuid;

    #[test]
    fn ratings_inside_range_pass_validation() {
        for rating in 1..=5 {
            let review = Review::new(Uuid::new_v4(), Uuid::new_v4(), rating, "", 0);
            assert!(review.validate().is_ok(), "rating {rating} should pass");
        }
    }

    #[test]
    fn ratings_outside_range_are_rejected() {
        for rating in [0, 6, -1] {
            let review = Review::new(Uuid::new_v4(), Uuid::new_v4(), rating, "", 0);
            assert_eq!(
                review.validate().unwrap_err(),
                ValidationError::RatingOutOfRange(rating)
            );
        }
    }
}
