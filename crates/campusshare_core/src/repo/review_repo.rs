//! Review repository and rating aggregator.
//!
//! # Responsibility
//! - Enforce one-review-per-(resource, reviewer) through the storage
//!   unique constraint.
//! - Recompute `rating_average` / `rating_count` from all current reviews
//!   after every review mutation.
//!
//! # Invariants
//! - Review write and aggregate refresh commit in one IMMEDIATE
//!   transaction: callers never observe one without the other.
//! - Aggregates are recomputed from scratch, never maintained
//!   incrementally, so each refresh is idempotent and self-healing.
//! - A failed refresh rolls the review write back and surfaces as an
//!   error; a stale aggregate is never returned as success.

use crate::model::review::{Review, ReviewId};
use crate::model::resource::ResourceId;
use crate::repo::{ensure_connection_ready, parse_uuid, RepoError, RepoResult};
use log::debug;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const REVIEW_SELECT_SQL: &str = "SELECT
    id,
    resource_id,
    reviewer_id,
    rating,
    comment,
    created_at
FROM reviews";

const REVIEW_REQUIREMENTS: &[(&str, &[&str])] = &[
    (
        "reviews",
        &[
            "id",
            "resource_id",
            "reviewer_id",
            "rating",
            "comment",
            "created_at",
        ],
    ),
    ("resources", &["id", "rating_average", "rating_count"]),
];

/// Repository interface for reviews and their derived rating aggregates.
pub trait ReviewRepository {
    /// Inserts a review and refreshes the resource aggregate atomically.
    ///
    /// Fails with `DuplicateReview` when the reviewer already reviewed the
    /// resource, and with `NotFound` when the resource row is absent.
    fn submit_review(&mut self, review: &Review) -> RepoResult<ReviewId>;
    /// Replaces rating/comment of an existing review and refreshes the
    /// aggregate atomically.
    fn update_review(&mut self, review: &Review) -> RepoResult<()>;
    /// Deletes a review and refreshes the aggregate atomically.
    fn delete_review(&mut self, id: ReviewId) -> RepoResult<()>;
    /// Gets one review by id.
    fn get_review(&self, id: ReviewId) -> RepoResult<Option<Review>>;
    /// Lists all reviews of a resource, newest first.
    fn list_reviews_for_resource(&self, resource_id: ResourceId) -> RepoResult<Vec<Review>>;
}

/// SQLite-backed review repository.
pub struct SqliteReviewRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteReviewRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REVIEW_REQUIREMENTS)?;
        Ok(Self { conn })
    }
}

impl ReviewRepository for SqliteReviewRepository<'_> {
    fn submit_review(&mut self, review: &Review) -> RepoResult<ReviewId> {
        review.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !resource_exists_in_tx(&tx, review.resource_id)? {
            return Err(RepoError::NotFound {
                entity: "resource",
                id: review.resource_id,
            });
        }

        let inserted = tx.execute(
            "INSERT INTO reviews (id, resource_id, reviewer_id, rating, comment, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                review.id.to_string(),
                review.resource_id.to_string(),
                review.reviewer_id.to_string(),
                review.rating,
                review.comment.as_str(),
                review.created_at,
            ],
        );

        if let Err(err) = inserted {
            if is_unique_violation(&err) {
                return Err(RepoError::DuplicateReview {
                    resource_id: review.resource_id,
                    reviewer_id: review.reviewer_id,
                });
            }
            return Err(err.into());
        }

        refresh_rating_aggregate(&tx, review.resource_id)?;
        tx.commit()?;

        Ok(review.id)
    }

    fn update_review(&mut self, review: &Review) -> RepoResult<()> {
        review.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let changed = tx.execute(
            "UPDATE reviews
             SET
                rating = ?1,
                comment = ?2
             WHERE id = ?3;",
            params![review.rating, review.comment.as_str(), review.id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "review",
                id: review.id,
            });
        }

        refresh_rating_aggregate(&tx, review.resource_id)?;
        tx.commit()?;

        Ok(())
    }

    fn delete_review(&mut self, id: ReviewId) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let resource_id: Option<String> = tx
            .query_row(
                "SELECT resource_id FROM reviews WHERE id = ?1;",
                [id.to_string()],
                |row| row.get(0),
            )
            .map(Some)
            .or_else(|err| match err {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(other),
            })?;

        let Some(resource_id_text) = resource_id else {
            return Err(RepoError::NotFound {
                entity: "review",
                id,
            });
        };
        let resource_id = parse_uuid(&resource_id_text, "reviews.resource_id")?;

        tx.execute("DELETE FROM reviews WHERE id = ?1;", [id.to_string()])?;

        refresh_rating_aggregate(&tx, resource_id)?;
        tx.commit()?;

        Ok(())
    }

    fn get_review(&self, id: ReviewId) -> RepoResult<Option<Review>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{REVIEW_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_review_row(row)?));
        }

        Ok(None)
    }

    fn list_reviews_for_resource(&self, resource_id: ResourceId) -> RepoResult<Vec<Review>> {
        let mut stmt = self.conn.prepare(&format!(
            "{REVIEW_SELECT_SQL}
             WHERE resource_id = ?1
             ORDER BY created_at DESC, id ASC;"
        ))?;

        let mut rows = stmt.query([resource_id.to_string()])?;
        let mut reviews = Vec::new();
        while let Some(row) = rows.next()? {
            reviews.push(parse_review_row(row)?);
        }

        Ok(reviews)
    }
}

/// Rounds `sum / count` to one decimal place, half-up.
///
/// Integer math on tenths avoids float accumulation drift: the result is
/// `floor((20 * sum + count) / (2 * count)) / 10`. Returns `0.0` for an
/// empty review set.
pub fn round_rating_average(sum: i64, count: i64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    let tenths = (20 * sum + count) / (2 * count);
    tenths as f64 / 10.0
}

/// Recomputes a resource's rating aggregate from all current reviews.
///
/// Runs inside the caller's transaction so the review write and the
/// aggregate refresh become visible as one unit.
fn refresh_rating_aggregate(tx: &Transaction<'_>, resource_id: ResourceId) -> RepoResult<()> {
    let (count, sum): (i64, i64) = tx.query_row(
        "SELECT COUNT(*), COALESCE(SUM(rating), 0)
         FROM reviews
         WHERE resource_id = ?1;",
        [resource_id.to_string()],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    let average = round_rating_average(sum, count);

    let changed = tx.execute(
        "UPDATE resources
         SET
            rating_average = ?1,
            rating_count = ?2
         WHERE id = ?3;",
        params![average, count, resource_id.to_string()],
    )?;

    if changed == 0 {
        return Err(RepoError::NotFound {
            entity: "resource",
            id: resource_id,
        });
    }

    debug!(
        "event=rating_refresh module=repo status=ok resource_id={} count={} average={}",
        resource_id, count, average
    );

    Ok(())
}

fn resource_exists_in_tx(tx: &Transaction<'_>, resource_id: ResourceId) -> RepoResult<bool> {
    let exists: i64 = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM resources WHERE id = ?1);",
        [resource_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(ffi_err, _)
            if ffi_err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn parse_review_row(row: &Row<'_>) -> RepoResult<Review> {
    let id_text: String = row.get("id")?;
    let resource_text: String = row.get("resource_id")?;
    let reviewer_text: String = row.get("reviewer_id")?;

    let review = Review {
        id: parse_uuid(&id_text, "reviews.id")?,
        resource_id: parse_uuid(&resource_text, "reviews.resource_id")?,
        reviewer_id: parse_uuid(&reviewer_text, "reviews.reviewer_id")?,
        rating: row.get("rating")?,
        comment: row.get("comment")?,
        created_at: row.get("created_at")?,
    };
    review.validate()?;
    Ok(review)
}
