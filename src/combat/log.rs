//! Turn records
//!
//! One record per resolved (or skipped) action, bonus rounds included. Hit
//! point snapshots are taken before and after the mutation so a log can be
//! replayed for display without the session.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::combat::policy::Action;
use crate::core::types::{CombatantId, TurnNumber};

/// Which phase of the encounter produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Round {
    Ambush,
    Surprise,
    Main,
}

/// Why an actor did nothing this turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SkipReason {
    ActorDead,
    TargetUnavailable,
    InsufficientResource { required: u32, available: u32 },
    NoValidAction,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::ActorDead => write!(f, "actor is down"),
            SkipReason::TargetUnavailable => write!(f, "target unavailable"),
            SkipReason::InsufficientResource {
                required,
                available,
            } => write!(f, "needs {} resource, has {}", required, available),
            SkipReason::NoValidAction => write!(f, "no valid action"),
        }
    }
}

/// What an action did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum TurnOutcome {
    Attack {
        hit: bool,
        critical: bool,
        /// `None` for auto-hit magic
        natural_roll: Option<u32>,
        attack_total: Option<i32>,
        damage: u32,
        target_hp_before: u32,
        target_hp_after: u32,
    },
    Heal {
        amount: u32,
        target_hp_before: u32,
        target_hp_after: u32,
    },
    Skipped {
        reason: SkipReason,
    },
}

impl TurnOutcome {
    pub fn skipped(reason: SkipReason) -> Self {
        TurnOutcome::Skipped { reason }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, TurnOutcome::Skipped { .. })
    }

    /// Damage dealt, zero for anything but a landed attack
    pub fn damage(&self) -> u32 {
        match self {
            TurnOutcome::Attack { damage, .. } => *damage,
            _ => 0,
        }
    }
}

/// A single entry in the combat log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Main-loop turn number (1-based); 0 for bonus-round records
    pub turn: TurnNumber,
    pub round: Round,
    pub actor_id: CombatantId,
    pub actor_name: String,
    pub target_id: Option<CombatantId>,
    pub target_name: Option<String>,
    pub action: Option<Action>,
    pub outcome: TurnOutcome,
    pub actor_resource_before: u32,
    pub actor_resource_after: u32,
}

impl TurnRecord {
    /// One-line human readable summary
    pub fn describe(&self) -> String {
        let tag = match self.round {
            Round::Main => self.turn.to_string(),
            Round::Ambush => "ambush".to_string(),
            Round::Surprise => "surprise".to_string(),
        };
        let target = self.target_name.as_deref().unwrap_or("nobody");
        let weapon = self
            .action
            .as_ref()
            .map(|a| a.weapon.name.as_str())
            .unwrap_or("-");
        match &self.outcome {
            TurnOutcome::Attack {
                hit: true,
                critical,
                damage,
                target_hp_after,
                ..
            } => format!(
                "[{}] {} hits {} with {} for {}{} ({} hp left)",
                tag,
                self.actor_name,
                target,
                weapon,
                damage,
                if *critical { " (critical)" } else { "" },
                target_hp_after
            ),
            TurnOutcome::Attack { hit: false, .. } => format!(
                "[{}] {} misses {} with {}",
                tag, self.actor_name, target, weapon
            ),
            TurnOutcome::Heal {
                amount,
                target_hp_after,
                ..
            } => format!(
                "[{}] {} heals {} for {} ({} hp)",
                tag, self.actor_name, target, amount, target_hp_after
            ),
            TurnOutcome::Skipped { reason } => {
                format!("[{}] {} skips: {}", tag, self.actor_name, reason)
            }
        }
    }
}
