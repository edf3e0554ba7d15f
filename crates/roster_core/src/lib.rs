//! # roster_core - Coupling-Group Partition Engine
//!
//! Keeps the "must play together" groups of a matchday roster consistent
//! while an operator edits them, and lays the roster out by role.
//!
//! ## Features
//! - Normalized, disjoint partition values (no in-place mutation)
//! - Merge / remove operations that never fail
//! - Role-bucketed roster projection (GK, DEF, ATT, ALL)
//! - Delete-all/recreate sync to the remote constraint store

pub mod config;
pub mod error;
pub mod feedback;
pub mod models;
pub mod notify;
pub mod ops;
pub mod partition;
pub mod projector;
pub mod session;
pub mod sync;

pub use config::{RosterConfig, StoreConfig};
pub use error::{ConfigError, Result, SessionError};
pub use feedback::MergePulse;
pub use models::{Matchday, PlayerName, Role, Roster, RosterMember};
pub use notify::{CollectingSink, LogSink, Notice, NoticeKind, NotificationSink};
pub use ops::{
    merge_player_into_group, merge_player_into_player, remove_from_group, rename_in_decouplings,
    rename_player,
};
pub use partition::{normalize, normalize_for_roster, CouplingGroup, GroupKey, Partition};
pub use projector::{display_order, project, resolve_group_role, DisplayItem, RoleLine};
pub use session::{Gesture, MatchdaySession};
pub use sync::{
    ConstraintSnapshot, ConstraintStore, HttpConstraintStore, InMemoryConstraintStore,
    StoreError, SyncCoordinator, SyncError, SyncPhase, SyncReport,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
