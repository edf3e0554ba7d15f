use super::error::StoreError;
use crate::models::PlayerName;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Constraint lists as held by the remote store for today's matchday.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintSnapshot {
    /// "Must play together" groups.
    #[serde(default)]
    pub couplings: Vec<Vec<PlayerName>>,

    /// "Must not play together" groups. Read-only here; carried so callers
    /// can show them, never edited by the partition engine.
    #[serde(default)]
    pub decouplings: Vec<Vec<PlayerName>>,
}

/// Remote coupling store.
///
/// Treated as an unordered store that is replaced wholesale: clear it, then
/// create each group again.
#[async_trait]
pub trait ConstraintStore: Send + Sync {
    async fn fetch(&self) -> Result<ConstraintSnapshot, StoreError>;

    async fn delete_all(&self) -> Result<(), StoreError>;

    async fn create_coupling(&self, players: &[PlayerName]) -> Result<(), StoreError>;
}
