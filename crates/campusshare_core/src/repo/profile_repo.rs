//! Profile repository contract and SQLite implementation.
//!
//! # Invariants
//! - Profile ids come from the identity provider; this layer never
//!   generates them.
//! - No delete path exists; profile removal cascades externally.

use crate::model::profile::{Profile, ProfileId};
use crate::repo::{ensure_connection_ready, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const PROFILE_SELECT_SQL: &str = "SELECT
    id,
    name,
    affiliation,
    branch,
    year,
    created_at
FROM profiles";

const PROFILE_REQUIREMENTS: &[(&str, &[&str])] = &[(
    "profiles",
    &["id", "name", "affiliation", "branch", "year", "created_at"],
)];

/// Repository interface for contributor profiles.
pub trait ProfileRepository {
    /// Persists a new profile; the id must be unused.
    fn create_profile(&self, profile: &Profile) -> RepoResult<ProfileId>;
    /// Replaces the mutable fields of an existing profile.
    fn update_profile(&self, profile: &Profile) -> RepoResult<()>;
    /// Gets one profile by id.
    fn get_profile(&self, id: ProfileId) -> RepoResult<Option<Profile>>;
    /// Lists all profiles ordered by id for deterministic iteration.
    fn list_profiles(&self) -> RepoResult<Vec<Profile>>;
}

/// SQLite-backed profile repository.
#[derive(Debug)]
pub struct SqliteProfileRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProfileRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, PROFILE_REQUIREMENTS)?;
        Ok(Self { conn })
    }
}

impl ProfileRepository for SqliteProfileRepository<'_> {
    fn create_profile(&self, profile: &Profile) -> RepoResult<ProfileId> {
        profile.validate()?;

        self.conn.execute(
            "INSERT INTO profiles (id, name, affiliation, branch, year, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                profile.id.to_string(),
                profile.name.as_str(),
                profile.affiliation.as_str(),
                profile.branch.as_str(),
                profile.year,
                profile.created_at,
            ],
        )?;

        Ok(profile.id)
    }

    fn update_profile(&self, profile: &Profile) -> RepoResult<()> {
        profile.validate()?;

        let changed = self.conn.execute(
            "UPDATE profiles
             SET
                name = ?1,
                affiliation = ?2,
                branch = ?3,
                year = ?4
             WHERE id = ?5;",
            params![
                profile.name.as_str(),
                profile.affiliation.as_str(),
                profile.branch.as_str(),
                profile.year,
                profile.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "profile",
                id: profile.id,
            });
        }

        Ok(())
    }

    fn get_profile(&self, id: ProfileId) -> RepoResult<Option<Profile>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROFILE_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_profile_row(row)?));
        }

        Ok(None)
    }

    fn list_profiles(&self) -> RepoResult<Vec<Profile>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROFILE_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut profiles = Vec::new();

        while let Some(row) = rows.next()? {
            profiles.push(parse_profile_row(row)?);
        }

        Ok(profiles)
    }
}

fn parse_profile_row(row: &Row<'_>) -> RepoResult<Profile> {
    let id_text: String = row.get("id")?;
    let profile = Profile {
        id: parse_uuid(&id_text, "profiles.id")?,
        name: row.get("name")?,
        affiliation: row.get("affiliation")?,
        branch: row.get("branch")?,
        year: row.get("year")?,
        created_at: row.get("created_at")?,
    };
    profile.validate()?;
    Ok(profile)
}
