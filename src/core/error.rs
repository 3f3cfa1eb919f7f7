use thiserror::Error;

use crate::core::types::{CombatantId, Side};

/// Errors raised while building a combat
///
/// Once a session exists, `run_combat` never fails: every in-combat problem
/// becomes a skipped turn or a forced result instead.
#[derive(Error, Debug)]
pub enum CombatError {
    #[error("Session cannot be both an ambush and a surprise")]
    ConflictingOpeners,

    #[error("No combatants on the {0} side")]
    EmptySide(Side),

    #[error("Duplicate combatant id: {0}")]
    DuplicateCombatant(CombatantId),

    #[error("Invalid stats for {id}: {reason}")]
    InvalidStats { id: CombatantId, reason: String },

    #[error("Invalid dice expression: {0}")]
    InvalidDice(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CombatError>;

/// Failure reported by the external equipment service
///
/// Always caught by the weapon resolver and replaced with a role default.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WeaponLookupError {
    #[error("No equipment record for {0}")]
    NotEquipped(CombatantId),

    #[error("Equipment service unavailable: {0}")]
    Unavailable(String),
}
