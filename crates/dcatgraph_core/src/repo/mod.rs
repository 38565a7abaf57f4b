//! Vertex repository contracts and implementations.
//!
//! # Responsibility
//! - Define the two store operations the core relies on: upsert one vertex by
//!   id, and list every vertex of a kind.
//! - Provide a SQLite-backed store and an in-memory recording store.
//!
//! # Invariants
//! - Upserts are keyed by `(kind, id)`, replace the whole attribute set and
//!   never create duplicates.
//! - Listing order is unspecified.
//! - Store failures surface as `StoreError`; no retries happen here.

pub mod memory_repo;
pub mod sqlite_repo;
pub mod vertex_repo;
