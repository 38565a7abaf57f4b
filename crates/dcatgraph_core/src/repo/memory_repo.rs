//! In-memory vertex store that records every call.
//!
//! Used as the store double in tests and for embedding the core without a
//! database. Returns exactly the attributes it was given.

use crate::model::attribute::AttributeMap;
use crate::model::schema::VertexKind;
use crate::repo::vertex_repo::{StoreError, StoreResult, UpsertAck, VertexRepository, VertexRow};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// One call received by `MemoryVertexRepository`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoCall {
    Upsert {
        kind: VertexKind,
        id: String,
        attributes: AttributeMap,
    },
    ListAll {
        kind: VertexKind,
    },
}

#[derive(Debug, Default)]
struct MemoryState {
    vertices: BTreeMap<(VertexKind, String), Result<AttributeMap, String>>,
    calls: Vec<RepoCall>,
    unavailable: Option<String>,
}

#[derive(Debug, Default)]
pub struct MemoryVertexRepository {
    state: Mutex<MemoryState>,
}

impl MemoryVertexRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following call fail with `StoreError::Unavailable`.
    /// `None` restores normal operation.
    pub fn set_unavailable(&self, reason: Option<&str>) {
        self.lock().unavailable = reason.map(str::to_string);
    }

    /// Stores a vertex without recording a call, e.g. to seed corrupt rows.
    pub fn insert_raw(&self, kind: VertexKind, id: impl Into<String>, attributes: AttributeMap) {
        self.lock()
            .vertices
            .insert((kind, id.into()), Ok(attributes));
    }

    /// Stores a vertex whose attributes cannot be read back as a map.
    pub fn insert_unreadable(
        &self,
        kind: VertexKind,
        id: impl Into<String>,
        reason: impl Into<String>,
    ) {
        self.lock()
            .vertices
            .insert((kind, id.into()), Err(reason.into()));
    }

    /// Calls received so far, oldest first.
    pub fn calls(&self) -> Vec<RepoCall> {
        self.lock().calls.clone()
    }

    pub fn vertex(&self, kind: VertexKind, id: &str) -> Option<AttributeMap> {
        self.lock()
            .vertices
            .get(&(kind, id.to_string()))
            .and_then(|stored| stored.as_ref().ok().cloned())
    }

    pub fn vertex_count(&self, kind: VertexKind) -> usize {
        self.lock()
            .vertices
            .keys()
            .filter(|(stored_kind, _)| *stored_kind == kind)
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl VertexRepository for MemoryVertexRepository {
    fn upsert_vertex(
        &self,
        kind: VertexKind,
        id: &str,
        attributes: &AttributeMap,
    ) -> StoreResult<UpsertAck> {
        let mut state = self.lock();
        state.calls.push(RepoCall::Upsert {
            kind,
            id: id.to_string(),
            attributes: attributes.clone(),
        });
        if let Some(reason) = &state.unavailable {
            return Err(StoreError::Unavailable(reason.clone()));
        }

        state
            .vertices
            .insert((kind, id.to_string()), Ok(attributes.clone()));
        Ok(UpsertAck::single(kind, id))
    }

    fn list_vertices(&self, kind: VertexKind) -> StoreResult<Vec<VertexRow>> {
        let mut state = self.lock();
        state.calls.push(RepoCall::ListAll { kind });
        if let Some(reason) = &state.unavailable {
            return Err(StoreError::Unavailable(reason.clone()));
        }

        Ok(state
            .vertices
            .iter()
            .filter(|((stored_kind, _), _)| *stored_kind == kind)
            .map(|((_, id), attributes)| VertexRow {
                id: id.clone(),
                attributes: attributes.clone(),
            })
            .collect())
    }
}
