//! Resolved request identity.
//!
//! The external identity provider maps a request credential to a stable
//! `Viewer`; this core never sees credentials. Anonymous access is
//! represented as `Option<&Viewer> = None` at call sites, never as global
//! ambient state.

use crate::model::profile::ProfileId;
use serde::{Deserialize, Serialize};

/// Identity of the party making a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    /// Stable profile id owned by the identity provider.
    pub id: ProfileId,
    /// College the viewer belongs to.
    pub affiliation: String,
}

impl Viewer {
    pub fn new(id: ProfileId, affiliation: impl Into<String>) -> Self {
        Self {
            id,
            affiliation: affiliation.into(),
        }
    }
}
