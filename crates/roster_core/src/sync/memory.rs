use super::error::StoreError;
use super::store::{ConstraintSnapshot, ConstraintStore};
use crate::models::PlayerName;
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A request as observed by [`InMemoryConstraintStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreRequest {
    Fetch,
    DeleteAll,
    Create(Vec<PlayerName>),
}

#[derive(Debug, Default)]
struct MemoryState {
    snapshot: ConstraintSnapshot,
    requests: Vec<StoreRequest>,
    fail_delete: bool,
    fail_create_at: Option<usize>,
    creates_seen: usize,
}

/// Process-local constraint store.
///
/// Records every request it receives and can be told to fail the delete-all
/// or the n-th create, which makes partial-sync behavior reproducible.
#[derive(Debug, Default)]
pub struct InMemoryConstraintStore {
    state: Mutex<MemoryState>,
}

impl InMemoryConstraintStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: ConstraintSnapshot) -> Self {
        let store = Self::default();
        store.lock().snapshot = snapshot;
        store
    }

    /// Make every delete-all fail until cleared with [`Self::heal`].
    pub fn fail_delete_all(self) -> Self {
        self.lock().fail_delete = true;
        self
    }

    /// Fail the create request with zero-based ordinal `n` (counted over the
    /// lifetime of the store).
    pub fn fail_create_at(self, n: usize) -> Self {
        self.lock().fail_create_at = Some(n);
        self
    }

    /// Drop any injected failures.
    pub fn heal(&self) {
        let mut state = self.lock();
        state.fail_delete = false;
        state.fail_create_at = None;
    }

    pub fn couplings(&self) -> Vec<Vec<PlayerName>> {
        self.lock().snapshot.couplings.clone()
    }

    pub fn requests(&self) -> Vec<StoreRequest> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ConstraintStore for InMemoryConstraintStore {
    async fn fetch(&self) -> Result<ConstraintSnapshot, StoreError> {
        let mut state = self.lock();
        state.requests.push(StoreRequest::Fetch);
        Ok(state.snapshot.clone())
    }

    async fn delete_all(&self) -> Result<(), StoreError> {
        let mut state = self.lock();
        state.requests.push(StoreRequest::DeleteAll);
        if state.fail_delete {
            return Err(StoreError::Unavailable("delete-all failure injected".to_string()));
        }
        // Clearing is absolute: both constraint lists are reset.
        state.snapshot = ConstraintSnapshot::default();
        Ok(())
    }

    async fn create_coupling(&self, players: &[PlayerName]) -> Result<(), StoreError> {
        let mut state = self.lock();
        state.requests.push(StoreRequest::Create(players.to_vec()));

        let ordinal = state.creates_seen;
        state.creates_seen += 1;
        if state.fail_create_at == Some(ordinal) {
            return Err(StoreError::Unavailable(format!("create #{} failure injected", ordinal)));
        }

        state.snapshot.couplings.push(players.to_vec());
        Ok(())
    }
}
