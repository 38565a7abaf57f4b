//! Schema declarations shared by every entity kind.
//!
//! # Responsibility
//! - Name the vertex kinds and their store-level type names.
//! - Describe each kind's attribute set as pure data (`EntitySchema`).
//! - Bridge typed record fields and schema kinds through `FieldType`.
//!
//! # Invariants
//! - The identifying field never appears in `EntitySchema::fields`.
//! - Defaults are produced per call; nothing is captured at process start.
//! - Adding an entity kind only adds a declaration; codec code is unchanged.

use crate::model::attribute::epoch;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Vertex type of an entity in the graph store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VertexKind {
    Catalog,
    Dataset,
    Distribution,
    /// Stored under the vertex type `Service`.
    #[serde(rename = "Service")]
    DataService,
}

impl VertexKind {
    pub const ALL: [VertexKind; 4] = [
        VertexKind::Catalog,
        VertexKind::Dataset,
        VertexKind::Distribution,
        VertexKind::DataService,
    ];

    /// Vertex type name used by the store.
    pub fn vertex_type(self) -> &'static str {
        match self {
            Self::Catalog => "Catalog",
            Self::Dataset => "Dataset",
            Self::Distribution => "Distribution",
            Self::DataService => "Service",
        }
    }

    /// Path segment used by the request layer (`POST /dataset`, ...).
    pub fn route(self) -> &'static str {
        match self {
            Self::Catalog => "catalog",
            Self::Dataset => "dataset",
            Self::Distribution => "distribution",
            Self::DataService => "service",
        }
    }

    /// Parses either a route segment or a vertex type name, ignoring case.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        if matches!(
            normalized.as_str(),
            "dataservice" | "data_service" | "data-service"
        ) {
            return Some(Self::DataService);
        }
        Self::ALL.into_iter().find(|kind| {
            kind.route() == normalized || kind.vertex_type().to_ascii_lowercase() == normalized
        })
    }
}

impl Display for VertexKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.vertex_type())
    }
}

/// Declared type of one schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Text,
    TextList,
    Timestamp,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::TextList => "list",
            Self::Timestamp => "timestamp",
        }
    }

    /// Default value for an unset field of this kind.
    pub fn default_value(self) -> FieldValue {
        match self {
            Self::Text => FieldValue::Text(String::new()),
            Self::TextList => FieldValue::TextList(Vec::new()),
            Self::Timestamp => FieldValue::Timestamp(epoch()),
        }
    }
}

impl Display for FieldKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One non-identifying field of an entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Attribute name in the store.
    pub name: &'static str,
    pub kind: FieldKind,
}

/// Field set of one entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntitySchema {
    pub kind: VertexKind,
    /// Name of the identifying field; it maps to the vertex primary key.
    pub id_field: &'static str,
    pub fields: &'static [FieldSpec],
}

impl EntitySchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }
}

/// Typed in-memory value of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    TextList(Vec<String>),
    Timestamp(NaiveDateTime),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Text(_) => FieldKind::Text,
            Self::TextList(_) => FieldKind::TextList,
            Self::Timestamp(_) => FieldKind::Timestamp,
        }
    }
}

/// Rust field types usable in an entity record.
pub trait FieldType: Sized {
    const KIND: FieldKind;

    fn default_value() -> Self;
    fn to_field_value(&self) -> FieldValue;
    fn from_field_value(value: FieldValue) -> Option<Self>;
}

impl FieldType for String {
    const KIND: FieldKind = FieldKind::Text;

    fn default_value() -> Self {
        String::new()
    }

    fn to_field_value(&self) -> FieldValue {
        FieldValue::Text(self.clone())
    }

    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl FieldType for Vec<String> {
    const KIND: FieldKind = FieldKind::TextList;

    fn default_value() -> Self {
        Vec::new()
    }

    fn to_field_value(&self) -> FieldValue {
        FieldValue::TextList(self.clone())
    }

    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::TextList(values) => Some(values),
            _ => None,
        }
    }
}

impl FieldType for NaiveDateTime {
    const KIND: FieldKind = FieldKind::Timestamp;

    fn default_value() -> Self {
        epoch()
    }

    fn to_field_value(&self) -> FieldValue {
        FieldValue::Timestamp(*self)
    }

    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Timestamp(value) => Some(value),
            _ => None,
        }
    }
}

/// Error raised when a record cannot be assembled from field values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    Missing(&'static str),
    WrongKind {
        field: &'static str,
        expected: FieldKind,
        found: FieldKind,
    },
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(field) => write!(f, "field `{field}` has no value"),
            Self::WrongKind {
                field,
                expected,
                found,
            } => write!(f, "field `{field}` expected {expected}, found {found}"),
        }
    }
}

impl Error for FieldError {}

/// Typed values keyed by attribute name, consumed by `Entity::from_fields`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues {
    values: BTreeMap<&'static str, FieldValue>,
}

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &'static str, value: FieldValue) {
        self.values.insert(name, value);
    }

    /// Removes one value and converts it into the record's field type.
    pub fn take<T: FieldType>(&mut self, name: &'static str) -> Result<T, FieldError> {
        let value = self.values.remove(name).ok_or(FieldError::Missing(name))?;
        let found = value.kind();
        T::from_field_value(value).ok_or(FieldError::WrongKind {
            field: name,
            expected: T::KIND,
            found,
        })
    }
}

/// Typed record stored as one vertex.
///
/// Implemented through `entity_record!`; the codec only talks to this trait.
pub trait Entity: Sized {
    const SCHEMA: EntitySchema;

    fn id(&self) -> &str;

    /// Every non-identifying field as `(attribute name, value)`.
    fn to_fields(&self) -> Vec<(&'static str, FieldValue)>;

    fn from_fields(id: String, fields: FieldValues) -> Result<Self, FieldError>;
}
