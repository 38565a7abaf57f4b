//! Schema-driven attribute codec.
//!
//! # Responsibility
//! - Translate typed entity records into store attribute maps and back.
//! - Canonicalize timestamps to `TIMESTAMP_FORMAT` in both directions.
//! - Fill schema defaults for attributes the store does not return.
//!
//! # Invariants
//! - Pure and stateless; safe to call from any number of threads.
//! - The identifying field never appears in an encoded map.
//! - A present but unparsable attribute is an error, never a default.
//! - `decode(id, encode(r)) == r` at second precision; encode truncates
//!   sub-second components.
//!
//! # See also
//! - `crate::model::schema` for the declarations walked here.

mod error;

pub use error::{DecodingError, EncodingError};

use crate::model::attribute::{parse_timestamp, AttrValue, AttributeMap, TimestampLiteral};
use crate::model::schema::{Entity, EntitySchema, FieldKind, FieldSpec, FieldValue, FieldValues};

/// Encodes one record into its vertex attribute map.
///
/// # Errors
/// - Returns `EncodingError` when the record's fields do not match its
///   schema. This indicates a defect in the record declaration.
pub fn encode<E: Entity>(record: &E) -> Result<AttributeMap, EncodingError> {
    let schema = &E::SCHEMA;
    let mut attributes = AttributeMap::new();

    for (name, value) in record.to_fields() {
        let spec = check_field(schema, name, &value)?;
        let attribute = match value {
            FieldValue::Text(value) => AttrValue::Text(value),
            FieldValue::TextList(values) => AttrValue::List(values),
            FieldValue::Timestamp(value) => {
                AttrValue::Timestamp(TimestampLiteral::from_datetime(&value))
            }
        };
        if attributes.insert(spec.name.to_string(), attribute).is_some() {
            return Err(EncodingError::DuplicateField {
                kind: schema.kind,
                field: spec.name,
            });
        }
    }

    if let Some(spec) = schema
        .fields
        .iter()
        .find(|spec| !attributes.contains_key(spec.name))
    {
        return Err(EncodingError::MissingField {
            kind: schema.kind,
            field: spec.name,
        });
    }

    Ok(attributes)
}

/// Decodes one vertex into a typed record.
///
/// Missing attributes take schema defaults; attributes unknown to the schema
/// are ignored.
///
/// # Errors
/// - `DecodingError::MalformedTimestamp` when a timestamp attribute does not
///   match `TIMESTAMP_FORMAT`.
/// - `DecodingError::UnexpectedType` when an attribute's shape does not fit
///   its declared kind.
pub fn decode<E: Entity>(
    id: impl Into<String>,
    attributes: &AttributeMap,
) -> Result<E, DecodingError> {
    let id = id.into();
    let schema = &E::SCHEMA;
    let mut fields = FieldValues::new();

    for spec in schema.fields {
        let value = match attributes.get(spec.name) {
            Some(attribute) => decode_attribute(schema, &id, spec, attribute)?,
            None => spec.kind.default_value(),
        };
        fields.insert(spec.name, value);
    }

    E::from_fields(id.clone(), fields).map_err(|source| DecodingError::Incomplete {
        kind: schema.kind,
        id,
        source,
    })
}

/// Returns the record decoded from an empty attribute map.
pub fn defaults<E: Entity>(id: impl Into<String>) -> Result<E, DecodingError> {
    decode(id, &AttributeMap::new())
}

fn check_field<'s>(
    schema: &'s EntitySchema,
    name: &'static str,
    value: &FieldValue,
) -> Result<&'s FieldSpec, EncodingError> {
    if name == schema.id_field {
        return Err(EncodingError::IdentifierField {
            kind: schema.kind,
            field: name,
        });
    }

    let spec = schema.field(name).ok_or(EncodingError::UnknownField {
        kind: schema.kind,
        field: name,
    })?;

    if spec.kind != value.kind() {
        return Err(EncodingError::TypeMismatch {
            kind: schema.kind,
            field: spec.name,
            expected: spec.kind,
            found: value.kind(),
        });
    }

    Ok(spec)
}

fn decode_attribute(
    schema: &EntitySchema,
    id: &str,
    spec: &FieldSpec,
    attribute: &AttrValue,
) -> Result<FieldValue, DecodingError> {
    match (spec.kind, attribute) {
        (FieldKind::Text, AttrValue::Text(value)) => Ok(FieldValue::Text(value.clone())),
        (FieldKind::TextList, AttrValue::List(values)) => {
            Ok(FieldValue::TextList(values.clone()))
        }
        (FieldKind::Timestamp, AttrValue::Text(_) | AttrValue::Timestamp(_)) => {
            let raw = attribute.as_str().unwrap_or_default();
            parse_timestamp(raw)
                .map(FieldValue::Timestamp)
                .map_err(|err| DecodingError::MalformedTimestamp {
                    kind: schema.kind,
                    id: id.to_string(),
                    field: spec.name,
                    value: raw.to_string(),
                    reason: err.to_string(),
                })
        }
        (expected, found) => Err(DecodingError::UnexpectedType {
            kind: schema.kind,
            id: id.to_string(),
            field: spec.name,
            expected,
            found: found.variant_name(),
        }),
    }
}
