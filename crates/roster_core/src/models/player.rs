use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Player identifier. Names are unique within a roster and are the only key
/// used by the partition engine.
pub type PlayerName = String;

/// Display role of a roster member.
///
/// Ordered by layout priority: goalkeepers first, then defence, attack and
/// finally the general pool.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    GK,
    DEF,
    ATT,
    ALL,
}

impl Role {
    /// Role lines in display order.
    pub const ORDER: [Role; 4] = [Role::GK, Role::DEF, Role::ATT, Role::ALL];

    /// Lower value wins when a group mixes roles.
    pub fn priority(self) -> u8 {
        match self {
            Role::GK => 0,
            Role::DEF => 1,
            Role::ATT => 2,
            Role::ALL => 3,
        }
    }

    /// Parse a position label as it arrives from the roster API.
    ///
    /// Unknown labels yield `None` rather than an error; the projector
    /// treats such members as belonging to the general pool.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_uppercase().as_str() {
            "GK" => Some(Role::GK),
            "DEF" => Some(Role::DEF),
            "ATT" => Some(Role::ATT),
            "ALL" => Some(Role::ALL),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::GK => "GK",
            Role::DEF => "DEF",
            Role::ATT => "ATT",
            Role::ALL => "ALL",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A player registered for the current matchday.
///
/// Owned by the roster collaborator; the partition engine only reads it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RosterMember {
    pub name: PlayerName,

    #[serde(
        default,
        deserialize_with = "lenient_role",
        skip_serializing_if = "Option::is_none"
    )]
    pub position: Option<Role>,

    #[serde(default)]
    pub average_rating: f64,

    #[serde(default)]
    pub is_guest: bool,
}

impl RosterMember {
    pub fn new(name: impl Into<PlayerName>, position: Role) -> Self {
        Self { name: name.into(), position: Some(position), average_rating: 0.0, is_guest: false }
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.average_rating = rating;
        self
    }

    pub fn guest(mut self) -> Self {
        self.is_guest = true;
        self
    }

    /// Role line for this member when it is displayed on its own.
    pub fn display_role(&self) -> Role {
        self.position.unwrap_or(Role::ALL)
    }
}

fn lenient_role<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    let label: Option<String> = Option::deserialize(deserializer)?;
    Ok(label.as_deref().and_then(Role::from_label))
}
