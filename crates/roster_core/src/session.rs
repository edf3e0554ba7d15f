//! Single owner of the matchday partition.
//!
//! Gesture capture lives outside this crate; it reports what was dropped
//! where as a [`Gesture`]. The session applies the matching partition
//! operation to its latest value, keeps the merge highlight, and pushes
//! committed state to the remote store.

use crate::error::{Result, SessionError};
use crate::feedback::MergePulse;
use crate::models::{Matchday, PlayerName, Roster};
use crate::notify::{Notice, NotificationSink};
use crate::ops;
use crate::partition::{normalize_for_roster, CouplingGroup, GroupKey, Partition};
use crate::projector::{project, RoleLine};
use crate::sync::{ConstraintSnapshot, ConstraintStore, SyncCoordinator, SyncReport};
use chrono::NaiveDate;
use std::time::Instant;

const SYNCED_MESSAGE: &str = "Couplings updated";
const NO_MATCHDAY_MESSAGE: &str = "Set up a matchday roster before adding couplings";

/// A completed drag, reduced to its logical meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gesture {
    /// `source` dropped onto player `target`.
    OntoPlayer { source: PlayerName, target: PlayerName },
    /// `source` dropped onto the group identified by `key`.
    OntoGroup { source: PlayerName, key: GroupKey },
    /// `source` dropped onto empty roster space.
    OntoEmpty { source: PlayerName },
}

#[derive(Debug, Clone, Default)]
pub struct MatchdaySession {
    matchday: Option<Matchday>,
    partition: Partition,
    decouplings: Vec<Vec<PlayerName>>,
    pulse: MergePulse,
}

impl MatchdaySession {
    pub fn new(pulse: MergePulse) -> Self {
        Self { pulse, ..Self::default() }
    }

    pub fn matchday(&self) -> Option<&Matchday> {
        self.matchday.as_ref()
    }

    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    pub fn decouplings(&self) -> &[Vec<PlayerName>] {
        &self.decouplings
    }

    pub fn pulse(&self) -> &MergePulse {
        &self.pulse
    }

    pub fn pulse_mut(&mut self) -> &mut MergePulse {
        &mut self.pulse
    }

    /// Adopt a matchday and the constraint lists stored for it.
    pub fn load(&mut self, matchday: Matchday, snapshot: ConstraintSnapshot) {
        self.partition = normalize_for_roster(snapshot.couplings, &matchday.roster);
        self.decouplings = snapshot.decouplings;
        self.pulse.reset();
        log::info!(
            "Loaded matchday {} ({} players, {} coupling groups)",
            matchday.date,
            matchday.roster.len(),
            self.partition.len()
        );
        self.matchday = Some(matchday);
    }

    /// Forget the matchday (removed by the operator, or expired).
    pub fn clear(&mut self) {
        self.matchday = None;
        self.partition = Partition::empty();
        self.decouplings.clear();
        self.pulse.reset();
    }

    /// Drop the matchday if it no longer belongs to `today`.
    pub fn roll_over(&mut self, today: NaiveDate) -> bool {
        match &self.matchday {
            Some(matchday) if !matchday.is_current(today) => {
                log::info!("Matchday {} expired, clearing couplings", matchday.date);
                self.clear();
                true
            }
            _ => false,
        }
    }

    /// Apply a gesture to the latest partition. Returns whether it changed.
    pub fn apply(&mut self, gesture: &Gesture, now: Instant) -> bool {
        let Some(matchday) = &self.matchday else {
            log::debug!("Ignoring gesture without a matchday: {:?}", gesture);
            return false;
        };
        let roster = &matchday.roster;

        let next = match gesture {
            Gesture::OntoPlayer { source, target } => {
                ops::merge_player_into_player(&self.partition, source, target)
            }
            Gesture::OntoGroup { source, key } => {
                ops::merge_player_into_group(&self.partition, source, key)
            }
            Gesture::OntoEmpty { source } => ops::remove_from_group(&self.partition, source),
        }
        .retain_roster(roster);

        let merged = merged_group(&next, gesture);
        self.pulse.trigger(merged, now);

        let changed = next != self.partition;
        self.partition = next;
        changed
    }

    /// Replace the partition after a roster swap of `current` for `replacement`.
    pub fn rename_player(&mut self, current: &str, replacement: &str, roster: Roster) {
        let Some(matchday) = &mut self.matchday else {
            return;
        };
        matchday.roster = roster;
        self.partition = ops::rename_player(&self.partition, current, replacement, &matchday.roster);
        self.decouplings =
            ops::rename_in_decouplings(&self.decouplings, current, replacement, &matchday.roster);
    }

    pub fn display(&self) -> Vec<RoleLine> {
        match &self.matchday {
            Some(matchday) => project(&matchday.roster, &self.partition),
            None => project(&Roster::default(), &Partition::empty()),
        }
    }

    /// Push the local partition, then re-pull canonical state.
    ///
    /// On failure the optimistic local partition is kept as is and an error
    /// notice is emitted; the next successful refresh reconciles.
    pub async fn commit<S: ConstraintStore>(
        &mut self,
        coordinator: &SyncCoordinator<S>,
        sink: &dyn NotificationSink,
    ) -> Result<SyncReport> {
        if self.matchday.is_none() {
            sink.notify(Notice::error(NO_MATCHDAY_MESSAGE));
            return Err(SessionError::NoMatchday);
        }

        let report = match coordinator.sync_partition(&self.partition).await {
            Ok(report) => report,
            Err(e) => {
                sink.notify(Notice::error(e.to_string()));
                return Err(e.into());
            }
        };

        if let Err(e) = self.refresh(coordinator).await {
            sink.notify(Notice::error(e.to_string()));
            return Err(e);
        }

        sink.notify(Notice::success(SYNCED_MESSAGE));
        Ok(report)
    }

    /// Full refresh: discard local-only state in favor of the remote store.
    pub async fn refresh<S: ConstraintStore>(
        &mut self,
        coordinator: &SyncCoordinator<S>,
    ) -> Result<()> {
        let Some(matchday) = &self.matchday else {
            return Err(SessionError::NoMatchday);
        };

        let snapshot = coordinator.fetch_snapshot().await?;
        self.partition = normalize_for_roster(snapshot.couplings, &matchday.roster);
        self.decouplings = snapshot.decouplings;
        Ok(())
    }
}

fn merged_group<'a>(partition: &'a Partition, gesture: &Gesture) -> Option<&'a CouplingGroup> {
    match gesture {
        Gesture::OntoPlayer { source, target } => {
            partition.group_of(source).filter(|g| g.contains(target))
        }
        Gesture::OntoGroup { source, .. } => partition.group_of(source),
        Gesture::OntoEmpty { .. } => None,
    }
}
