//! Turn-based encounter engine
//!
//! Bottom-up: dice and random streams, combatants and their roster,
//! initiative, action policy, resolution, then the session, the bonus rounds
//! and the orchestrator that ties them together.

pub mod ambush;
pub mod combatant;
pub mod dice;
pub mod equipment;
pub mod initiative;
pub mod log;
pub mod orchestrator;
pub mod policy;
pub mod resolution;
pub mod result;
pub mod rng;
pub mod roster;
pub mod scenario;
pub mod state;
pub mod weapons;

pub use combatant::{ability_modifier, Combatant, MonsterStatBlock};
pub use dice::DiceExpr;
pub use equipment::{resolve_weapon, NoEquipment, ResolvedWeapon, StaticArmory, WeaponLookup, WeaponSource};
pub use initiative::TurnOrder;
pub use log::{Round, SkipReason, TurnOutcome, TurnRecord};
pub use orchestrator::{run_combat, take_turn};
pub use policy::{choose_action, Action, ActionKind, ActionScript, ScriptedAction};
pub use resolution::{resolve_attack, resolve_heal, Resolution};
pub use result::CombatResult;
pub use rng::{RandomStream, StreamContext, StreamPhase};
pub use roster::Roster;
pub use scenario::Scenario;
pub use state::{CombatSession, CombatStatus, SessionOptions};
pub use weapons::{WeaponCategory, WeaponDescriptor};
