//! Resource repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and filtered-list access over `resources`.
//! - Keep the fixed display ordering (`created_at DESC, id ASC`) in one
//!   place.
//!
//! # Invariants
//! - `update_resource` never writes `owner_id`, `affiliation`,
//!   `rating_average`, `rating_count` or `created_at`; aggregates belong to
//!   the review aggregator and the rest are creation-time facts.
//! - `list_resources` applies query filters and ordering but NOT
//!   pagination; the service paginates after visibility filtering so page
//!   numbering stays stable relative to display order.

use crate::model::resource::{Resource, ResourceId, ResourceKind, Visibility};
use crate::repo::{ensure_connection_ready, parse_uuid, RepoError, RepoResult};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

const RESOURCE_SELECT_SQL: &str = "SELECT
    id,
    owner_id,
    title,
    description,
    course,
    branch,
    semester,
    kind,
    year,
    affiliation,
    visibility,
    rating_average,
    rating_count,
    content_pointer,
    created_at
FROM resources";

const RESOURCE_REQUIREMENTS: &[(&str, &[&str])] = &[(
    "resources",
    &[
        "id",
        "owner_id",
        "title",
        "description",
        "course",
        "branch",
        "semester",
        "kind",
        "year",
        "affiliation",
        "visibility",
        "rating_average",
        "rating_count",
        "content_pointer",
        "created_at",
    ],
)];

/// Ordinary query filters for resource listing.
///
/// All fields are conjunctive; `None` means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceListQuery {
    pub course: Option<String>,
    pub branch: Option<String>,
    pub semester: Option<i64>,
    pub kind: Option<ResourceKind>,
    pub year: Option<i64>,
    pub visibility: Option<Visibility>,
    /// Case-insensitive substring match over title and description.
    pub search: Option<String>,
}

/// Repository interface for shared resources.
pub trait ResourceRepository {
    /// Persists a new resource row.
    fn create_resource(&self, resource: &Resource) -> RepoResult<ResourceId>;
    /// Replaces caller-editable fields of an existing resource.
    fn update_resource(&self, resource: &Resource) -> RepoResult<()>;
    /// Gets one resource by id.
    fn get_resource(&self, id: ResourceId) -> RepoResult<Option<Resource>>;
    /// Lists resources matching `query`, newest first.
    ///
    /// Returns the full ordered candidate set; pagination happens in the
    /// service after per-item visibility filtering.
    fn list_resources(&self, query: &ResourceListQuery) -> RepoResult<Vec<Resource>>;
    /// Hard-deletes a resource; attached reviews cascade.
    fn delete_resource(&self, id: ResourceId) -> RepoResult<()>;
}

/// SQLite-backed resource repository.
pub struct SqliteResourceRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteResourceRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, RESOURCE_REQUIREMENTS)?;
        Ok(Self { conn })
    }
}

impl ResourceRepository for SqliteResourceRepository<'_> {
    fn create_resource(&self, resource: &Resource) -> RepoResult<ResourceId> {
        resource.validate()?;

        self.conn.execute(
            "INSERT INTO resources (
                id,
                owner_id,
                title,
                description,
                course,
                branch,
                semester,
                kind,
                year,
                affiliation,
                visibility,
                rating_average,
                rating_count,
                content_pointer,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15);",
            params![
                resource.id.to_string(),
                resource.owner_id.to_string(),
                resource.title.as_str(),
                resource.description.as_str(),
                resource.course.as_str(),
                resource.branch.as_str(),
                resource.semester,
                resource.kind.as_str(),
                resource.year,
                resource.affiliation.as_str(),
                resource.visibility.as_str(),
                resource.rating_average,
                resource.rating_count,
                resource.content_pointer.as_str(),
                resource.created_at,
            ],
        )?;

        Ok(resource.id)
    }

    fn update_resource(&self, resource: &Resource) -> RepoResult<()> {
        resource.validate()?;

        let changed = self.conn.execute(
            "UPDATE resources
             SET
                title = ?1,
                description = ?2,
                course = ?3,
                branch = ?4,
                semester = ?5,
                kind = ?6,
                year = ?7,
                visibility = ?8,
                content_pointer = ?9
             WHERE id = ?10;",
            params![
                resource.title.as_str(),
                resource.description.as_str(),
                resource.course.as_str(),
                resource.branch.as_str(),
                resource.semester,
                resource.kind.as_str(),
                resource.year,
                resource.visibility.as_str(),
                resource.content_pointer.as_str(),
                resource.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "resource",
                id: resource.id,
            });
        }

        Ok(())
    }

    fn get_resource(&self, id: ResourceId) -> RepoResult<Option<Resource>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RESOURCE_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_resource_row(row)?));
        }

        Ok(None)
    }

    fn list_resources(&self, query: &ResourceListQuery) -> RepoResult<Vec<Resource>> {
        let mut sql = format!("{RESOURCE_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(course) = query.course.as_ref() {
            sql.push_str(" AND course = ? COLLATE NOCASE");
            bind_values.push(Value::Text(course.clone()));
        }

        if let Some(branch) = query.branch.as_ref() {
            sql.push_str(" AND branch = ? COLLATE NOCASE");
            bind_values.push(Value::Text(branch.clone()));
        }

        if let Some(semester) = query.semester {
            sql.push_str(" AND semester = ?");
            bind_values.push(Value::Integer(semester));
        }

        if let Some(kind) = query.kind {
            sql.push_str(" AND kind = ?");
            bind_values.push(Value::Text(kind.as_str().to_string()));
        }

        if let Some(year) = query.year {
            sql.push_str(" AND year = ?");
            bind_values.push(Value::Integer(year));
        }

        if let Some(visibility) = query.visibility {
            sql.push_str(" AND visibility = ?");
            bind_values.push(Value::Text(visibility.as_str().to_string()));
        }

        if let Some(term) = query.search.as_ref().and_then(|raw| normalize_search(raw)) {
            sql.push_str(" AND (title || ' ' || description) LIKE '%' || ? || '%'");
            bind_values.push(Value::Text(term));
        }

        sql.push_str(" ORDER BY created_at DESC, id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut resources = Vec::new();

        while let Some(row) = rows.next()? {
            resources.push(parse_resource_row(row)?);
        }

        Ok(resources)
    }

    fn delete_resource(&self, id: ResourceId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM resources WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "resource",
                id,
            });
        }

        Ok(())
    }
}

/// Normalizes a raw search term: collapses whitespace runs and trims.
///
/// Returns `None` for terms that are blank after normalization.
pub fn normalize_search(raw: &str) -> Option<String> {
    let collapsed = WHITESPACE_RE.replace_all(raw.trim(), " ").to_string();
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

fn parse_resource_row(row: &Row<'_>) -> RepoResult<Resource> {
    let id_text: String = row.get("id")?;
    let owner_text: String = row.get("owner_id")?;

    let kind_text: String = row.get("kind")?;
    let kind = ResourceKind::parse(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid resource kind `{kind_text}` in resources.kind"))
    })?;

    let visibility_text: String = row.get("visibility")?;
    let visibility = Visibility::parse(&visibility_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid visibility `{visibility_text}` in resources.visibility"
        ))
    })?;

    let resource = Resource {
        id: parse_uuid(&id_text, "resources.id")?,
        owner_id: parse_uuid(&owner_text, "resources.owner_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        course: row.get("course")?,
        branch: row.get("branch")?,
        semester: row.get("semester")?,
        kind,
        year: row.get("year")?,
        affiliation: row.get("affiliation")?,
        visibility,
        rating_average: row.get("rating_average")?,
        rating_count: row.get("rating_count")?,
        content_pointer: row.get("content_pointer")?,
        created_at: row.get("created_at")?,
    };
    resource.validate()?;
    Ok(resource)
}

#[cfg(test)]
mod tests {
    use super::normalize_search;

    #[test]
    fn normalize_search_collapses_whitespace() {
        assert_eq!(
            normalize_search("  signal \t processing\n notes "),
            Some("signal processing notes".to_string())
        );
    }

    #[test]
    fn normalize_search_drops_blank_terms() {
        assert_eq!(normalize_search("   \t\n"), None);
        assert_eq!(normalize_search(""), None);
    }
}
