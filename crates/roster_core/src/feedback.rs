//! Short-lived "merge succeeded" highlight for a coupling group.
//!
//! Purely cosmetic: it never touches the partition. Time is passed in so the
//! host decides which clock drives it.

use crate::partition::{CouplingGroup, GroupKey};
use std::time::{Duration, Instant};

pub const DEFAULT_PULSE: Duration = Duration::from_millis(450);

#[derive(Debug, Clone)]
pub struct MergePulse {
    duration: Duration,
    active: Option<(GroupKey, Instant)>,
}

impl Default for MergePulse {
    fn default() -> Self {
        Self::new(DEFAULT_PULSE)
    }
}

impl MergePulse {
    pub fn new(duration: Duration) -> Self {
        Self { duration, active: None }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Start pulsing `group`, replacing any pulse still running.
    ///
    /// Missing or undersized groups are ignored.
    pub fn trigger(&mut self, group: Option<&CouplingGroup>, now: Instant) -> Option<&GroupKey> {
        let group = group.filter(|g| g.len() >= 2)?;
        self.active = Some((group.key().clone(), now));
        self.active.as_ref().map(|(key, _)| key)
    }

    pub fn is_pulsing(&self, key: &GroupKey, now: Instant) -> bool {
        self.active(now) == Some(key)
    }

    /// Key currently pulsing, if its time has not run out.
    pub fn active(&self, now: Instant) -> Option<&GroupKey> {
        match &self.active {
            Some((key, started)) if now.saturating_duration_since(*started) < self.duration => {
                Some(key)
            }
            _ => None,
        }
    }

    /// Timer callback for `key`. Leaves a newer pulse on another group alone.
    pub fn clear(&mut self, key: &GroupKey) {
        if matches!(&self.active, Some((active, _)) if active == key) {
            self.active = None;
        }
    }

    pub fn reset(&mut self) {
        self.active = None;
    }
}
