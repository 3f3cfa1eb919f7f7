pub mod config;
pub mod error;
pub mod types;

pub use config::{CombatConfig, TieBreak};
pub use error::{CombatError, Result, WeaponLookupError};
pub use types::{CombatantId, Role, SessionId, Side, TurnNumber};
