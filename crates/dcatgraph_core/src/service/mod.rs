//! Entity use-case services.
//!
//! # Responsibility
//! - Orchestrate validation, the attribute codec and vertex repository calls.
//! - Keep request layers decoupled from store details.

pub mod entity_service;
