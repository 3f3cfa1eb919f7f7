//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Roster-local identifier for a combatant
///
/// Assigned by whoever builds the roster (character store or room
/// generator). Stable for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CombatantId(pub u32);

impl CombatantId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Unique identifier for a combat session
///
/// Identity only. Never feeds the random stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Turn counter (main loop turns, 1-based in records)
pub type TurnNumber = u32;

/// Which side of the encounter a combatant fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Party,
    Monster,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Party => Side::Monster,
            Side::Monster => Side::Party,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Party => write!(f, "party"),
            Side::Monster => write!(f, "monster"),
        }
    }
}

/// Combatant role
///
/// Closed set. Party members carry a class; every creature is `Monster`.
/// Behavior dispatch goes through [`crate::combat::policy::policy_for`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Warrior,
    Rogue,
    Cleric,
    Mage,
    Monster,
}

impl Role {
    /// The side this role fights on
    pub fn side(self) -> Side {
        match self {
            Role::Monster => Side::Monster,
            _ => Side::Party,
        }
    }

    pub fn is_healer(self) -> bool {
        matches!(self, Role::Cleric)
    }

    pub fn is_caster(self) -> bool {
        matches!(self, Role::Mage)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Warrior => "warrior",
            Role::Rogue => "rogue",
            Role::Cleric => "cleric",
            Role::Mage => "mage",
            Role::Monster => "monster",
        };
        f.write_str(name)
    }
}
