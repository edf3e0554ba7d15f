use super::error::SyncError;
use super::store::{ConstraintSnapshot, ConstraintStore};
use crate::models::{PlayerName, Roster};
use crate::partition::{normalize_for_roster, Partition};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Where the coordinator is in its current (or last) invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    Syncing,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncReport {
    /// Groups written to the store.
    pub created: usize,
    /// Entries skipped for having fewer than two members.
    pub skipped: usize,
}

/// Pushes a local partition to the remote store by clearing it and
/// re-creating every group, one request at a time.
///
/// The protocol is not transactional. A failure stops the sequence and
/// surfaces the error; groups already created stay in the store. There is no
/// retry: the caller re-issues the whole sync.
pub struct SyncCoordinator<S> {
    store: S,
    phase: Mutex<SyncPhase>,
}

/// Resets the phase if a sync future is dropped before it finishes.
struct PhaseGuard<'a> {
    phase: &'a Mutex<SyncPhase>,
    finished: bool,
}

impl PhaseGuard<'_> {
    fn finish(mut self, outcome: SyncPhase) {
        *lock(self.phase) = outcome;
        self.finished = true;
    }
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            *lock(self.phase) = SyncPhase::Idle;
        }
    }
}

fn lock(phase: &Mutex<SyncPhase>) -> MutexGuard<'_, SyncPhase> {
    phase.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<S: ConstraintStore> SyncCoordinator<S> {
    pub fn new(store: S) -> Self {
        Self { store, phase: Mutex::new(SyncPhase::Idle) }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn phase(&self) -> SyncPhase {
        *lock(&self.phase)
    }

    pub fn is_syncing(&self) -> bool {
        self.phase() == SyncPhase::Syncing
    }

    /// Replace the remote couplings with `groups`.
    ///
    /// One delete-all, then one create per group with at least two members,
    /// each awaited before the next is sent. Rejected with
    /// [`SyncError::Busy`] while another sync on this coordinator is running.
    pub async fn sync<G>(&self, groups: &[G]) -> Result<SyncReport, SyncError>
    where
        G: AsRef<[PlayerName]> + Sync,
    {
        let guard = self.begin()?;
        let result = self.replace_all(groups).await;

        match &result {
            Ok(report) => {
                log::info!("Couplings synced: {} created, {} skipped", report.created, report.skipped);
                guard.finish(SyncPhase::Succeeded);
            }
            Err(e) => {
                log::warn!("Coupling sync failed: {}", e);
                guard.finish(SyncPhase::Failed);
            }
        }
        result
    }

    pub async fn sync_partition(&self, partition: &Partition) -> Result<SyncReport, SyncError> {
        self.sync(partition.groups()).await
    }

    /// Fetch the raw remote constraint lists.
    pub async fn fetch_snapshot(&self) -> Result<ConstraintSnapshot, SyncError> {
        self.store.fetch().await.map_err(SyncError::Fetch)
    }

    /// Re-pull the canonical partition, normalized against `roster`.
    pub async fn pull(&self, roster: &Roster) -> Result<Partition, SyncError> {
        let snapshot = self.fetch_snapshot().await?;
        let partition = normalize_for_roster(snapshot.couplings, roster);
        log::debug!("Pulled {} coupling groups", partition.len());
        Ok(partition)
    }

    fn begin(&self) -> Result<PhaseGuard<'_>, SyncError> {
        let mut phase = lock(&self.phase);
        if *phase == SyncPhase::Syncing {
            return Err(SyncError::Busy);
        }
        *phase = SyncPhase::Syncing;
        Ok(PhaseGuard { phase: &self.phase, finished: false })
    }

    async fn replace_all<G>(&self, groups: &[G]) -> Result<SyncReport, SyncError>
    where
        G: AsRef<[PlayerName]> + Sync,
    {
        self.store.delete_all().await.map_err(SyncError::DeleteAll)?;

        let mut report = SyncReport::default();
        for (index, group) in groups.iter().enumerate() {
            let players = group.as_ref();
            if players.len() < 2 {
                report.skipped += 1;
                continue;
            }
            self.store.create_coupling(players).await.map_err(|source| SyncError::Create {
                index,
                created: report.created,
                source,
            })?;
            report.created += 1;
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, RosterMember};
    use crate::partition::normalize;
    use crate::sync::error::StoreError;
    use crate::sync::memory::{InMemoryConstraintStore, StoreRequest};
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::sync::Notify;

    fn pair(a: &str, b: &str) -> Vec<String> {
        vec![a.to_string(), b.to_string()]
    }

    #[tokio::test]
    async fn test_empty_sync_issues_single_delete() {
        let coordinator = SyncCoordinator::new(InMemoryConstraintStore::new());
        let groups: Vec<Vec<String>> = Vec::new();

        let report = coordinator.sync(&groups).await.unwrap();

        assert_eq!(report, SyncReport { created: 0, skipped: 0 });
        assert_eq!(coordinator.store().requests(), vec![StoreRequest::DeleteAll]);
        assert_eq!(coordinator.phase(), SyncPhase::Succeeded);
    }

    #[tokio::test]
    async fn test_creates_in_order_and_skips_small_groups() {
        let coordinator = SyncCoordinator::new(InMemoryConstraintStore::new());
        let groups = vec![pair("A", "B"), vec!["Solo".to_string()], pair("C", "D")];

        let report = coordinator.sync(&groups).await.unwrap();

        assert_eq!(report, SyncReport { created: 2, skipped: 1 });
        assert_eq!(
            coordinator.store().requests(),
            vec![
                StoreRequest::DeleteAll,
                StoreRequest::Create(pair("A", "B")),
                StoreRequest::Create(pair("C", "D")),
            ]
        );
    }

    #[tokio::test]
    async fn test_create_failure_aborts_without_rollback() {
        let store = InMemoryConstraintStore::new().fail_create_at(1);
        let coordinator = SyncCoordinator::new(store);
        let groups = vec![pair("A", "B"), pair("C", "D"), pair("E", "F")];

        let err = coordinator.sync(&groups).await.unwrap_err();

        match &err {
            SyncError::Create { index, created, .. } => {
                assert_eq!(*index, 1);
                assert_eq!(*created, 1);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.left_partial_remote());
        // First group stays, third was never sent.
        assert_eq!(coordinator.store().couplings(), vec![pair("A", "B")]);
        assert_eq!(coordinator.store().requests().len(), 3);
        assert_eq!(coordinator.phase(), SyncPhase::Failed);
    }

    #[tokio::test]
    async fn test_delete_failure_sends_no_creates() {
        let store = InMemoryConstraintStore::with_snapshot(ConstraintSnapshot {
            couplings: vec![pair("X", "Y")],
            decouplings: Vec::new(),
        })
        .fail_delete_all();
        let coordinator = SyncCoordinator::new(store);

        let err = coordinator.sync(&[pair("A", "B")]).await.unwrap_err();

        assert!(matches!(err, SyncError::DeleteAll(_)));
        assert_eq!(coordinator.store().requests(), vec![StoreRequest::DeleteAll]);
        assert_eq!(coordinator.store().couplings(), vec![pair("X", "Y")]);
    }

    #[tokio::test]
    async fn test_resync_after_failure_replaces_everything() {
        let coordinator = SyncCoordinator::new(InMemoryConstraintStore::new().fail_create_at(0));
        let partition = normalize(vec![vec!["A", "B"], vec!["C", "D"]]);

        assert!(coordinator.sync_partition(&partition).await.is_err());
        coordinator.store().heal();
        coordinator.sync_partition(&partition).await.unwrap();

        assert_eq!(coordinator.store().couplings(), partition.to_raw());
    }

    #[tokio::test]
    async fn test_pull_normalizes_against_roster() {
        let store = InMemoryConstraintStore::with_snapshot(ConstraintSnapshot {
            couplings: vec![
                vec!["A".into(), "Gone".into()],
                vec!["B".into(), "C".into(), "B".into()],
            ],
            decouplings: Vec::new(),
        });
        let coordinator = SyncCoordinator::new(store);
        let roster = Roster::new(vec![
            RosterMember::new("A", Role::GK),
            RosterMember::new("B", Role::DEF),
            RosterMember::new("C", Role::ATT),
        ]);

        let partition = coordinator.pull(&roster).await.unwrap();
        assert_eq!(partition.to_raw(), vec![vec!["B", "C"]]);
    }

    /// Store whose first create blocks until released.
    struct GatedStore {
        inner: InMemoryConstraintStore,
        entered: Arc<Notify>,
        release: Arc<Notify>,
    }

    #[async_trait]
    impl ConstraintStore for GatedStore {
        async fn fetch(&self) -> Result<ConstraintSnapshot, StoreError> {
            self.inner.fetch().await
        }

        async fn delete_all(&self) -> Result<(), StoreError> {
            self.inner.delete_all().await
        }

        async fn create_coupling(&self, players: &[PlayerName]) -> Result<(), StoreError> {
            self.entered.notify_one();
            self.release.notified().await;
            self.inner.create_coupling(players).await
        }
    }

    #[tokio::test]
    async fn test_reentrant_sync_is_rejected() {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let coordinator = Arc::new(SyncCoordinator::new(GatedStore {
            inner: InMemoryConstraintStore::new(),
            entered: entered.clone(),
            release: release.clone(),
        }));

        let first = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move { coordinator.sync(&[pair("A", "B")]).await })
        };

        entered.notified().await;
        assert!(coordinator.is_syncing());
        assert!(matches!(coordinator.sync(&[pair("C", "D")]).await, Err(SyncError::Busy)));

        release.notify_one();
        let report = first.await.unwrap().unwrap();
        assert_eq!(report.created, 1);
        assert_eq!(coordinator.phase(), SyncPhase::Succeeded);
    }

    #[tokio::test]
    async fn test_dropped_sync_returns_to_idle() {
        let entered = Arc::new(Notify::new());
        let coordinator = SyncCoordinator::new(GatedStore {
            inner: InMemoryConstraintStore::new(),
            entered: entered.clone(),
            release: Arc::new(Notify::new()),
        });

        {
            let groups = [pair("A", "B")];
            let pending = coordinator.sync(&groups);
            tokio::pin!(pending);
            tokio::select! {
                _ = &mut pending => panic!("sync should block on the gated create"),
                _ = entered.notified() => {}
            }
            assert!(coordinator.is_syncing());
        }

        assert_eq!(coordinator.phase(), SyncPhase::Idle);
    }
}
