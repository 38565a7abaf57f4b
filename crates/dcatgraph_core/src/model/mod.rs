//! Domain model for DCAT metadata published into the vertex store.
//!
//! # Responsibility
//! - Define the typed records for catalogs, datasets, distributions and data
//!   services.
//! - Define the closed attribute value type used at the store boundary.
//! - Declare the per-kind schema (field set, identifier, defaults) consumed by
//!   the codec.
//!
//! # Invariants
//! - Every record is identified by a stable string `id` that is never stored
//!   as an attribute.
//! - Every non-identifying field has a fixed default.
//!
//! # See also
//! - `crate::codec` for the schema-driven encode/decode pair.

#[macro_use]
mod macros;

pub mod attribute;
pub mod entities;
pub mod schema;
