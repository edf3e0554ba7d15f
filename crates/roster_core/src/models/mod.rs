//! Roster-side data the partition engine reads but never mutates.

pub mod player;
pub mod roster;

pub use player::{PlayerName, Role, RosterMember};
pub use roster::{Matchday, Roster};
