use crate::model::schema::{FieldError, FieldKind, VertexKind};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Record/schema mismatch found while encoding. Always a programming defect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    IdentifierField {
        kind: VertexKind,
        field: &'static str,
    },
    UnknownField {
        kind: VertexKind,
        field: &'static str,
    },
    DuplicateField {
        kind: VertexKind,
        field: &'static str,
    },
    MissingField {
        kind: VertexKind,
        field: &'static str,
    },
    TypeMismatch {
        kind: VertexKind,
        field: &'static str,
        expected: FieldKind,
        found: FieldKind,
    },
}

impl EncodingError {
    pub fn kind(&self) -> VertexKind {
        match self {
            Self::IdentifierField { kind, .. }
            | Self::UnknownField { kind, .. }
            | Self::DuplicateField { kind, .. }
            | Self::MissingField { kind, .. }
            | Self::TypeMismatch { kind, .. } => *kind,
        }
    }
}

impl Display for EncodingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IdentifierField { kind, field } => {
                write!(f, "{kind} record emitted identifier `{field}` as an attribute")
            }
            Self::UnknownField { kind, field } => {
                write!(f, "{kind} record emitted field `{field}` missing from its schema")
            }
            Self::DuplicateField { kind, field } => {
                write!(f, "{kind} record emitted field `{field}` twice")
            }
            Self::MissingField { kind, field } => {
                write!(f, "{kind} record did not emit schema field `{field}`")
            }
            Self::TypeMismatch {
                kind,
                field,
                expected,
                found,
            } => write!(
                f,
                "{kind} field `{field}` declared as {expected} but record holds {found}"
            ),
        }
    }
}

impl Error for EncodingError {}

/// Stored attribute that violates its declared format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodingError {
    MalformedTimestamp {
        kind: VertexKind,
        id: String,
        field: &'static str,
        value: String,
        reason: String,
    },
    UnexpectedType {
        kind: VertexKind,
        id: String,
        field: &'static str,
        expected: FieldKind,
        found: &'static str,
    },
    Incomplete {
        kind: VertexKind,
        id: String,
        source: FieldError,
    },
    /// The store could not hand the vertex back as an attribute map.
    InvalidAttributes {
        kind: VertexKind,
        id: String,
        reason: String,
    },
}

impl DecodingError {
    pub fn kind(&self) -> VertexKind {
        match self {
            Self::MalformedTimestamp { kind, .. }
            | Self::UnexpectedType { kind, .. }
            | Self::Incomplete { kind, .. }
            | Self::InvalidAttributes { kind, .. } => *kind,
        }
    }

    /// Identifier of the vertex that failed to decode.
    pub fn id(&self) -> &str {
        match self {
            Self::MalformedTimestamp { id, .. }
            | Self::UnexpectedType { id, .. }
            | Self::Incomplete { id, .. }
            | Self::InvalidAttributes { id, .. } => id.as_str(),
        }
    }
}

impl Display for DecodingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedTimestamp {
                kind,
                id,
                field,
                value,
                reason,
            } => write!(
                f,
                "{kind} `{id}`: attribute `{field}` holds malformed timestamp `{value}` ({reason})"
            ),
            Self::UnexpectedType {
                kind,
                id,
                field,
                expected,
                found,
            } => write!(
                f,
                "{kind} `{id}`: attribute `{field}` expected {expected}, found {found}"
            ),
            Self::Incomplete { kind, id, source } => write!(f, "{kind} `{id}`: {source}"),
            Self::InvalidAttributes { kind, id, reason } => {
                write!(f, "{kind} `{id}`: stored attributes are unreadable ({reason})")
            }
        }
    }
}

impl Error for DecodingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Incomplete { source, .. } => Some(source),
            _ => None,
        }
    }
}
