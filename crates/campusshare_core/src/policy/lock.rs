//! Ownership and time-lock guard.
//!
//! # Invariants
//! - Only the owning viewer may mutate a record.
//! - Mutations are permitted within 24 hours of the record's original
//!   creation; the window is never renewed by edits.
//! - Exactly 24h elapsed is still inside the window; the check is
//!   `elapsed > 24h`.

use crate::model::profile::ProfileId;
use crate::model::viewer::Viewer;

/// Mutation lock window: 24 hours in milliseconds.
pub const LOCK_WINDOW_MS: i64 = 24 * 60 * 60 * 1000;

/// Outcome of an ownership/time-lock check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationCheck {
    /// Viewer owns the record and is inside the lock window.
    Allowed,
    /// Viewer does not own the record.
    NotOwner,
    /// Viewer owns the record but the 24h window has passed.
    LockExpired,
}

/// Decides whether `viewer` may mutate a record created at `created_at_ms`.
///
/// `owner_id` is the record's owning identity: `Resource.owner_id` for
/// resources, `Review.reviewer_id` for reviews. Applies uniformly to update
/// and delete.
pub fn check_mutation(
    viewer: &Viewer,
    owner_id: ProfileId,
    created_at_ms: i64,
    now_ms: i64,
) -> MutationCheck {
    if viewer.id != owner_id {
        return MutationCheck::NotOwner;
    }

    let elapsed = now_ms - created_at_ms;
    if elapsed > LOCK_WINDOW_MS {
        return MutationCheck::LockExpired;
    }

    MutationCheck::Allowed
}
