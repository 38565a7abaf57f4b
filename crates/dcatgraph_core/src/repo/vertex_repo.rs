//! Vertex repository contract.

use crate::db::DbError;
use crate::model::attribute::AttributeMap;
use crate::model::schema::VertexKind;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure reported by a vertex store.
#[derive(Debug)]
pub enum StoreError {
    /// The store could not be reached or the session could not be opened.
    Unavailable(String),
    Db(DbError),
    /// Attributes could not be serialized into the store's format.
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(reason) => write!(f, "vertex store unavailable: {reason}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid vertex data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Acknowledgement returned by a successful upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpsertAck {
    pub kind: VertexKind,
    pub id: String,
    /// Number of vertices the store accepted; `1` for every successful upsert.
    pub accepted_vertices: u32,
}

impl UpsertAck {
    pub fn single(kind: VertexKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            accepted_vertices: 1,
        }
    }
}

/// One stored vertex as returned by `list_vertices`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexRow {
    pub id: String,
    /// Stored attributes, or why they could not be read as an attribute map.
    ///
    /// An unreadable row does not fail the listing; the service reports it
    /// next to the readable ones.
    pub attributes: Result<AttributeMap, String>,
}

impl VertexRow {
    pub fn readable(id: impl Into<String>, attributes: AttributeMap) -> Self {
        Self {
            id: id.into(),
            attributes: Ok(attributes),
        }
    }

    pub fn unreadable(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: Err(reason.into()),
        }
    }
}

/// Store operations consumed by `EntityService`.
pub trait VertexRepository {
    /// Creates the vertex if absent, otherwise replaces its attribute set.
    fn upsert_vertex(
        &self,
        kind: VertexKind,
        id: &str,
        attributes: &AttributeMap,
    ) -> StoreResult<UpsertAck>;

    /// Returns every vertex of `kind`, in no particular order.
    fn list_vertices(&self, kind: VertexKind) -> StoreResult<Vec<VertexRow>>;
}

impl<R: VertexRepository + ?Sized> VertexRepository for &R {
    fn upsert_vertex(
        &self,
        kind: VertexKind,
        id: &str,
        attributes: &AttributeMap,
    ) -> StoreResult<UpsertAck> {
        (**self).upsert_vertex(kind, id, attributes)
    }

    fn list_vertices(&self, kind: VertexKind) -> StoreResult<Vec<VertexRow>> {
        (**self).list_vertices(kind)
    }
}
