//! Create-or-update and list operations for every entity kind.
//!
//! # Responsibility
//! - `create_or_update`: validate identifier, encode, upsert.
//! - `list_all`: list vertices of one kind and decode each row.
//!
//! # Invariants
//! - Exactly one repository call per operation; no retries or batching.
//! - Records are never rejected by content; only a missing identifier is a
//!   schema violation, checked before encoding.
//! - A row that fails to decode, or that the store cannot read back as an
//!   attribute map, is reported, never replaced by defaults, and does not
//!   hide the other rows.
//! - Store errors are returned untouched inside `StoreUnavailable`.

use crate::codec::{self, DecodingError, EncodingError};
use crate::model::schema::{Entity, VertexKind};
use crate::repo::vertex_repo::{StoreError, UpsertAck, VertexRepository};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Inbound record or document that does not satisfy its schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaViolation {
    MissingIdentifier {
        kind: VertexKind,
        field: &'static str,
    },
    MalformedDocument {
        kind: VertexKind,
        message: String,
    },
}

impl Display for SchemaViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingIdentifier { kind, field } => {
                write!(f, "{kind} record requires a non-empty `{field}`")
            }
            Self::MalformedDocument { kind, message } => {
                write!(f, "malformed {kind} document: {message}")
            }
        }
    }
}

impl Error for SchemaViolation {}

/// Service error for entity use-cases.
#[derive(Debug)]
pub enum ServiceError {
    SchemaViolation(SchemaViolation),
    /// Record/schema mismatch; a defect, not a caller error.
    Encoding(EncodingError),
    /// Strict listing found rows that do not decode.
    Decoding {
        kind: VertexKind,
        rejected: Vec<DecodingError>,
    },
    StoreUnavailable(StoreError),
    /// A decoded record could not be rendered as a response document.
    Rendering { kind: VertexKind, message: String },
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SchemaViolation(err) => write!(f, "{err}"),
            Self::Encoding(err) => write!(f, "{err}"),
            Self::Decoding { kind, rejected } => {
                write!(f, "{} stored {kind} vertices failed to decode", rejected.len())?;
                if let Some(first) = rejected.first() {
                    write!(f, "; first: {first}")?;
                }
                Ok(())
            }
            Self::StoreUnavailable(err) => write!(f, "{err}"),
            Self::Rendering { kind, message } => {
                write!(f, "failed to render {kind} document: {message}")
            }
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::SchemaViolation(err) => Some(err),
            Self::Encoding(err) => Some(err),
            Self::Decoding { rejected, .. } => rejected
                .first()
                .map(|err| err as &(dyn Error + 'static)),
            Self::StoreUnavailable(err) => Some(err),
            Self::Rendering { .. } => None,
        }
    }
}

impl From<SchemaViolation> for ServiceError {
    fn from(value: SchemaViolation) -> Self {
        Self::SchemaViolation(value)
    }
}

impl From<EncodingError> for ServiceError {
    fn from(value: EncodingError) -> Self {
        Self::Encoding(value)
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::StoreUnavailable(value)
    }
}

/// Result of a lenient listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing<E> {
    /// Rows that decoded, in store order.
    pub records: Vec<E>,
    /// Rows that failed to decode, one error per row.
    pub rejected: Vec<DecodingError>,
}

impl<E> Listing<E> {
    /// Whether every stored row decoded.
    pub fn is_complete(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Entity service over a vertex repository.
pub struct EntityService<R: VertexRepository> {
    repo: R,
}

impl<R: VertexRepository> EntityService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Encodes `record` and upserts it under its identifier.
    ///
    /// # Errors
    /// - `SchemaViolation` when the identifier is empty; nothing is written.
    /// - `Encoding` when the record does not match its schema.
    /// - `StoreUnavailable` when the repository call fails.
    pub fn create_or_update<E: Entity>(&self, record: &E) -> ServiceResult<UpsertAck> {
        let schema = &E::SCHEMA;
        let id = record.id();
        if id.trim().is_empty() {
            return Err(SchemaViolation::MissingIdentifier {
                kind: schema.kind,
                field: schema.id_field,
            }
            .into());
        }

        let attributes = codec::encode(record).map_err(|err| {
            error!(
                "event=vertex_encode module=service status=error kind={} id={} error={}",
                schema.kind, id, err
            );
            err
        })?;

        let started_at = Instant::now();
        match self.repo.upsert_vertex(schema.kind, id, &attributes) {
            Ok(ack) => {
                info!(
                    "event=vertex_upsert module=service status=ok kind={} id={} attributes={} duration_ms={}",
                    schema.kind,
                    id,
                    attributes.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(ack)
            }
            Err(err) => {
                error!(
                    "event=vertex_upsert module=service status=error kind={} id={} duration_ms={} error={}",
                    schema.kind,
                    id,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err.into())
            }
        }
    }

    /// Lists and decodes every stored record of kind `E`.
    ///
    /// Rows that fail to decode are returned in `Listing::rejected`.
    pub fn list_all<E: Entity>(&self) -> ServiceResult<Listing<E>> {
        let kind = E::SCHEMA.kind;
        let started_at = Instant::now();
        let rows = self.repo.list_vertices(kind).map_err(|err| {
            error!(
                "event=vertex_list module=service status=error kind={} duration_ms={} error={}",
                kind,
                started_at.elapsed().as_millis(),
                err
            );
            err
        })?;

        let mut listing = Listing {
            records: Vec::with_capacity(rows.len()),
            rejected: Vec::new(),
        };
        for row in rows {
            let decoded = match row.attributes {
                Ok(attributes) => codec::decode::<E>(row.id, &attributes),
                Err(reason) => Err(DecodingError::InvalidAttributes {
                    kind,
                    id: row.id,
                    reason,
                }),
            };
            match decoded {
                Ok(record) => listing.records.push(record),
                Err(err) => {
                    warn!(
                        "event=vertex_decode module=service status=rejected kind={} id={} error={}",
                        kind,
                        err.id(),
                        err
                    );
                    listing.rejected.push(err);
                }
            }
        }

        info!(
            "event=vertex_list module=service status=ok kind={} records={} rejected={} duration_ms={}",
            kind,
            listing.records.len(),
            listing.rejected.len(),
            started_at.elapsed().as_millis()
        );
        Ok(listing)
    }

    /// Like `list_all`, but fails when any stored row does not decode.
    pub fn list_all_strict<E: Entity>(&self) -> ServiceResult<Vec<E>> {
        let listing = self.list_all::<E>()?;
        if listing.is_complete() {
            Ok(listing.records)
        } else {
            Err(ServiceError::Decoding {
                kind: E::SCHEMA.kind,
                rejected: listing.rejected,
            })
        }
    }
}
