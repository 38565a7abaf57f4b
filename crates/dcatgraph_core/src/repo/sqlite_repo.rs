//! SQLite-backed vertex store.
//!
//! # Responsibility
//! - Persist vertices as `(graph, vertex_type, vertex_id) -> attributes JSON`.
//! - Open the graph session before any vertex operation (`connect`).
//!
//! # Invariants
//! - One row per `(graph, vertex_type, vertex_id)`; upserts replace the
//!   attribute column wholesale.
//! - A repository only sees vertices of its own graph.
//! - Rows that are not a JSON object of strings/string arrays come back as
//!   unreadable `VertexRow`s, never repaired and never dropped.

use crate::config::{DatabaseLocation, StoreConfig};
use crate::db::migrations::{current_user_version, latest_version};
use crate::db::{open_db, open_db_in_memory};
use crate::model::attribute::AttributeMap;
use crate::model::schema::VertexKind;
use crate::repo::vertex_repo::{StoreError, StoreResult, UpsertAck, VertexRepository, VertexRow};
use log::{error, info, warn};
use rusqlite::{params, Connection};
use std::time::Instant;

/// Opens the configured database and the graph session on it.
///
/// Any failure here is reported as `StoreError::Unavailable`, so callers can
/// tell bootstrap problems apart from failed operations.
///
/// # Side effects
/// - Creates the database file and applies migrations when needed.
/// - Records the session in `graph_sessions`.
pub fn connect(config: &StoreConfig) -> StoreResult<Connection> {
    let started_at = Instant::now();
    let outcome = config
        .validate()
        .map_err(|err| err.to_string())
        .and_then(|()| {
            let conn = match &config.database {
                DatabaseLocation::InMemory => open_db_in_memory(),
                DatabaseLocation::File(path) => open_db(path),
            }
            .map_err(|err| err.to_string())?;
            open_graph_session(&conn, config.graph.as_str()).map_err(|err| err.to_string())?;
            Ok(conn)
        });

    match outcome {
        Ok(conn) => {
            info!(
                "event=store_connect module=repo status=ok graph={} duration_ms={}",
                config.graph,
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(reason) => {
            error!(
                "event=store_connect module=repo status=error graph={} duration_ms={} error={}",
                config.graph,
                started_at.elapsed().as_millis(),
                reason
            );
            Err(StoreError::Unavailable(reason))
        }
    }
}

fn open_graph_session(conn: &Connection, graph: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO graph_sessions (graph) VALUES (?1)
         ON CONFLICT(graph) DO UPDATE SET
            opened_at = (strftime('%s', 'now') * 1000),
            open_count = open_count + 1;",
        [graph],
    )?;
    Ok(())
}

/// Vertex repository scoped to one graph of a SQLite database.
pub struct SqliteVertexRepository<'conn> {
    conn: &'conn Connection,
    graph: String,
}

impl<'conn> SqliteVertexRepository<'conn> {
    /// Wraps a connection returned by `connect` (or `open_db*`).
    ///
    /// # Errors
    /// - `StoreError::Unavailable` when the connection's schema is not at the
    ///   version this binary expects.
    pub fn try_new(conn: &'conn Connection, graph: impl Into<String>) -> StoreResult<Self> {
        let version = current_user_version(conn)?;
        let expected = latest_version();
        if version != expected {
            return Err(StoreError::Unavailable(format!(
                "vertex store schema version is {version}, expected {expected}"
            )));
        }

        Ok(Self {
            conn,
            graph: graph.into(),
        })
    }

    pub fn graph(&self) -> &str {
        self.graph.as_str()
    }
}

impl VertexRepository for SqliteVertexRepository<'_> {
    fn upsert_vertex(
        &self,
        kind: VertexKind,
        id: &str,
        attributes: &AttributeMap,
    ) -> StoreResult<UpsertAck> {
        let payload = serde_json::to_string(attributes).map_err(|err| {
            StoreError::InvalidData(format!("cannot serialize {kind} `{id}` attributes: {err}"))
        })?;

        self.conn.execute(
            "INSERT INTO vertices (graph, vertex_type, vertex_id, attributes)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(graph, vertex_type, vertex_id) DO UPDATE SET
                attributes = excluded.attributes,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![self.graph.as_str(), kind.vertex_type(), id, payload],
        )?;

        Ok(UpsertAck::single(kind, id))
    }

    fn list_vertices(&self, kind: VertexKind) -> StoreResult<Vec<VertexRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT vertex_id, attributes
             FROM vertices
             WHERE graph = ?1 AND vertex_type = ?2;",
        )?;
        let mut rows = stmt.query(params![self.graph.as_str(), kind.vertex_type()])?;

        let mut vertices = Vec::new();
        while let Some(row) = rows.next()? {
            let id: String = row.get("vertex_id")?;
            let payload: String = row.get("attributes")?;
            let vertex = match serde_json::from_str::<AttributeMap>(&payload) {
                Ok(attributes) => VertexRow::readable(id, attributes),
                Err(err) => {
                    warn!(
                        "event=vertex_read module=repo status=rejected kind={} id={} error={}",
                        kind, id, err
                    );
                    VertexRow::unreadable(id, err.to_string())
                }
            };
            vertices.push(vertex);
        }

        Ok(vertices)
    }
}
