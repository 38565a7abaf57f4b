//! Core of the DCAT metadata graph publisher.
//!
//! Translates typed catalog/dataset/distribution/data-service records to and
//! from vertex attribute maps, and upserts/lists them through a vertex
//! repository.

pub mod api;
pub mod codec;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use api::{get_documents, post_document, ListMode, ListResponse, RejectedRow};
pub use codec::{decode, defaults, encode, DecodingError, EncodingError};
pub use config::{ConfigError, DatabaseLocation, StoreConfig, DEFAULT_GRAPH};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::attribute::{
    AttrValue, AttributeMap, TimestampError, TimestampLiteral, TIMESTAMP_FORMAT,
};
pub use model::entities::{Catalog, DataService, Dataset, Distribution};
pub use model::schema::{Entity, EntitySchema, FieldKind, FieldSpec, VertexKind};
pub use repo::memory_repo::{MemoryVertexRepository, RepoCall};
pub use repo::sqlite_repo::{connect, SqliteVertexRepository};
pub use repo::vertex_repo::{StoreError, StoreResult, UpsertAck, VertexRepository, VertexRow};
pub use service::entity_service::{
    EntityService, Listing, SchemaViolation, ServiceError, ServiceResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
