//! Store connection settings.
//!
//! # Responsibility
//! - Describe where the vertex store lives and which graph it serves.
//! - Reject unusable settings before any connection attempt.
//!
//! # Invariants
//! - Graph names are identifiers: `^[A-Za-z_][A-Za-z0-9_]*$`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Graph used when none is configured.
pub const DEFAULT_GRAPH: &str = "dcat";

static GRAPH_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid graph name regex"));

/// Location of the SQLite file backing the vertex store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    /// Private, process-local store; contents vanish with the connection.
    InMemory,
    File(PathBuf),
}

/// Settings consumed by `repo::connect`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub database: DatabaseLocation,
    pub graph: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database: DatabaseLocation::InMemory,
            graph: DEFAULT_GRAPH.to_string(),
        }
    }
}

impl StoreConfig {
    pub fn in_memory(graph: impl Into<String>) -> Self {
        Self {
            database: DatabaseLocation::InMemory,
            graph: graph.into(),
        }
    }

    pub fn file(path: impl Into<PathBuf>, graph: impl Into<String>) -> Self {
        Self {
            database: DatabaseLocation::File(path.into()),
            graph: graph.into(),
        }
    }

    /// Checks settings without touching the filesystem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.graph.trim().is_empty() {
            return Err(ConfigError::EmptyGraph);
        }
        if !GRAPH_NAME_RE.is_match(self.graph.as_str()) {
            return Err(ConfigError::InvalidGraph(self.graph.clone()));
        }
        if let DatabaseLocation::File(path) = &self.database {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::EmptyDatabasePath);
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyGraph,
    InvalidGraph(String),
    EmptyDatabasePath,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyGraph => write!(f, "graph name cannot be empty"),
            Self::InvalidGraph(value) => write!(
                f,
                "graph name `{value}` must start with a letter or `_` and contain only letters, digits or `_`"
            ),
            Self::EmptyDatabasePath => write!(f, "database path cannot be empty"),
        }
    }
}

impl Error for ConfigError {}
