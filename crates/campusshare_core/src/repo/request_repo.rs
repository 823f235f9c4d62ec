//! Resource-request repository contract and SQLite implementation.
//!
//! # Invariants
//! - The only mutation is the guarded `open -> fulfilled` transition; no
//!   edit or delete path exists.
//! - The transition is a single conditional UPDATE, so concurrent
//!   fulfillment attempts cannot both succeed.
//! - `fulfilled_resource_id` is recorded as supplied, without validating
//!   it against the resources table.

use crate::model::request::{RequestId, RequestStatus, ResourceRequest};
use crate::model::resource::ResourceId;
use crate::repo::{ensure_connection_ready, parse_uuid, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const REQUEST_SELECT_SQL: &str = "SELECT
    id,
    requester_id,
    title,
    detail,
    status,
    fulfilled_resource_id,
    created_at
FROM requests";

const REQUEST_REQUIREMENTS: &[(&str, &[&str])] = &[(
    "requests",
    &[
        "id",
        "requester_id",
        "title",
        "detail",
        "status",
        "fulfilled_resource_id",
        "created_at",
    ],
)];

/// Repository interface for community resource requests.
pub trait RequestRepository {
    /// Persists a new open request.
    fn create_request(&self, request: &ResourceRequest) -> RepoResult<RequestId>;
    /// Gets one request by id.
    fn get_request(&self, id: RequestId) -> RepoResult<Option<ResourceRequest>>;
    /// Lists requests, optionally restricted to one status, newest first.
    fn list_requests(&self, status: Option<RequestStatus>) -> RepoResult<Vec<ResourceRequest>>;
    /// Attempts the `open -> fulfilled` transition.
    ///
    /// Returns `true` when the request was open and is now fulfilled with
    /// `resource_id` recorded; `false` when no open row matched (absent or
    /// already fulfilled — the caller classifies which).
    fn mark_fulfilled(&self, id: RequestId, resource_id: ResourceId) -> RepoResult<bool>;
}

/// SQLite-backed request repository.
pub struct SqliteRequestRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRequestRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUEST_REQUIREMENTS)?;
        Ok(Self { conn })
    }
}

impl RequestRepository for SqliteRequestRepository<'_> {
    fn create_request(&self, request: &ResourceRequest) -> RepoResult<RequestId> {
        request.validate()?;

        self.conn.execute(
            "INSERT INTO requests (
                id,
                requester_id,
                title,
                detail,
                status,
                fulfilled_resource_id,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                request.id.to_string(),
                request.requester_id.to_string(),
                request.title.as_str(),
                request.detail.as_str(),
                request.status.as_str(),
                request.fulfilled_resource_id.map(|id| id.to_string()),
                request.created_at,
            ],
        )?;

        Ok(request.id)
    }

    fn get_request(&self, id: RequestId) -> RepoResult<Option<ResourceRequest>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{REQUEST_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_request_row(row)?));
        }

        Ok(None)
    }

    fn list_requests(&self, status: Option<RequestStatus>) -> RepoResult<Vec<ResourceRequest>> {
        let mut sql = format!("{REQUEST_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(status) = status {
            sql.push_str(" AND status = ?");
            bind_values.push(Value::Text(status.as_str().to_string()));
        }

        sql.push_str(" ORDER BY created_at DESC, id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut requests = Vec::new();

        while let Some(row) = rows.next()? {
            requests.push(parse_request_row(row)?);
        }

        Ok(requests)
    }

    fn mark_fulfilled(&self, id: RequestId, resource_id: ResourceId) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "UPDATE requests
             SET
                status = 'fulfilled',
                fulfilled_resource_id = ?1
             WHERE id = ?2
               AND status = 'open';",
            params![resource_id.to_string(), id.to_string()],
        )?;

        Ok(changed > 0)
    }
}

fn parse_request_row(row: &Row<'_>) -> RepoResult<ResourceRequest> {
    let id_text: String = row.get("id")?;
    let requester_text: String = row.get("requester_id")?;

    let status_text: String = row.get("status")?;
    let status = RequestStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid request status `{status_text}` in requests.status"
        ))
    })?;

    let fulfilled_resource_id = match row.get::<_, Option<String>>("fulfilled_resource_id")? {
        Some(value) => Some(parse_uuid(&value, "requests.fulfilled_resource_id")?),
        None => None,
    };

    let request = ResourceRequest {
        id: parse_uuid(&id_text, "requests.id")?,
        requester_id: parse_uuid(&requester_text, "requests.requester_id")?,
        title: row.get("title")?,
        detail: row.get("detail")?,
        status,
        fulfilled_resource_id,
        created_at: row.get("created_at")?,
    };
    request.validate()?;
    Ok(request)
}
