//! JSON document handlers for `POST <kind>` / `GET <kind>`.
//!
//! # Responsibility
//! - Turn inbound JSON documents into typed records and hand them to
//!   `EntityService`.
//! - Render listed records as JSON documents.
//!
//! # Invariants
//! - A document without a non-empty string `id` is rejected before any
//!   store call.
//! - Documents use attribute names as keys; absent fields take defaults.

use crate::model::entities::{Catalog, DataService, Dataset, Distribution};
use crate::model::schema::{Entity, VertexKind};
use crate::repo::vertex_repo::{UpsertAck, VertexRepository};
use crate::service::entity_service::{EntityService, SchemaViolation, ServiceError, ServiceResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// How `get_documents` treats rows that fail to decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListMode {
    /// Return decodable rows and report the others in `rejected`.
    #[default]
    Lenient,
    /// Fail the whole request when any row does not decode.
    Strict,
}

/// One stored row left out of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRow {
    pub id: String,
    pub error: String,
}

/// Response body for `GET <kind>`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListResponse {
    pub kind: VertexKind,
    pub items: Vec<Value>,
    pub rejected: Vec<RejectedRow>,
}

/// Handles `POST <kind>` with a JSON document body.
///
/// # Errors
/// - `SchemaViolation` for non-object bodies, a missing or empty `id`, or
///   fields of the wrong JSON type.
/// - Any error of `EntityService::create_or_update`.
pub fn post_document<R: VertexRepository>(
    service: &EntityService<R>,
    kind: VertexKind,
    document: &Value,
) -> ServiceResult<UpsertAck> {
    match kind {
        VertexKind::Catalog => post_typed::<Catalog, R>(service, document),
        VertexKind::Dataset => post_typed::<Dataset, R>(service, document),
        VertexKind::Distribution => post_typed::<Distribution, R>(service, document),
        VertexKind::DataService => post_typed::<DataService, R>(service, document),
    }
}

/// Handles `GET <kind>`.
pub fn get_documents<R: VertexRepository>(
    service: &EntityService<R>,
    kind: VertexKind,
    mode: ListMode,
) -> ServiceResult<ListResponse> {
    match kind {
        VertexKind::Catalog => get_typed::<Catalog, R>(service, mode),
        VertexKind::Dataset => get_typed::<Dataset, R>(service, mode),
        VertexKind::Distribution => get_typed::<Distribution, R>(service, mode),
        VertexKind::DataService => get_typed::<DataService, R>(service, mode),
    }
}

fn post_typed<E, R>(service: &EntityService<R>, document: &Value) -> ServiceResult<UpsertAck>
where
    E: Entity + DeserializeOwned,
    R: VertexRepository,
{
    let schema = &E::SCHEMA;
    let object = document
        .as_object()
        .ok_or_else(|| SchemaViolation::MalformedDocument {
            kind: schema.kind,
            message: "expected a JSON object".to_string(),
        })?;

    match object.get(schema.id_field) {
        Some(Value::String(id)) if !id.trim().is_empty() => {}
        Some(Value::String(_)) | Some(Value::Null) | None => {
            return Err(SchemaViolation::MissingIdentifier {
                kind: schema.kind,
                field: schema.id_field,
            }
            .into());
        }
        Some(_) => {
            return Err(SchemaViolation::MalformedDocument {
                kind: schema.kind,
                message: format!("`{}` must be a string", schema.id_field),
            }
            .into());
        }
    }

    let record = E::deserialize(document).map_err(|err| SchemaViolation::MalformedDocument {
        kind: schema.kind,
        message: err.to_string(),
    })?;
    service.create_or_update(&record)
}

fn get_typed<E, R>(service: &EntityService<R>, mode: ListMode) -> ServiceResult<ListResponse>
where
    E: Entity + Serialize,
    R: VertexRepository,
{
    let kind = E::SCHEMA.kind;
    let (records, rejected) = match mode {
        ListMode::Strict => (service.list_all_strict::<E>()?, Vec::new()),
        ListMode::Lenient => {
            let listing = service.list_all::<E>()?;
            let rejected: Vec<RejectedRow> = listing
                .rejected
                .iter()
                .map(|err| RejectedRow {
                    id: err.id().to_string(),
                    error: err.to_string(),
                })
                .collect();
            (listing.records, rejected)
        }
    };

    let items = records
        .iter()
        .map(|record| {
            serde_json::to_value(record).map_err(|err| {
                ServiceError::Rendering {
                    kind,
                    message: err.to_string(),
                }
            })
        })
        .collect::<ServiceResult<Vec<Value>>>()?;

    Ok(ListResponse {
        kind,
        items,
        rejected,
    })
}
