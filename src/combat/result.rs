//! Combat result
//!
//! The immutable summary handed back to collaborators once a session ends:
//! verdict, full log, final combatant states for write-back and the
//! experience award.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::combat::combatant::Combatant;
use crate::combat::log::TurnRecord;
use crate::combat::state::{CombatSession, CombatStatus};
use crate::core::types::{SessionId, Side, TurnNumber};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatResult {
    pub session_id: SessionId,
    pub room_id: String,
    pub seed: String,
    pub status: CombatStatus,
    /// Ended by the turn ceiling rather than a wipe
    pub stalemate: bool,
    pub turns_taken: TurnNumber,
    pub log: Vec<TurnRecord>,
    pub party_survivors: usize,
    pub monster_survivors: usize,
    /// Summed over defeated monsters, awarded on victory only
    pub experience: u32,
    pub final_party: Vec<Combatant>,
    pub final_monsters: Vec<Combatant>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub duration_ms: i64,
}

impl CombatResult {
    pub fn from_session(session: CombatSession) -> Self {
        let parts = session.into_parts();

        let final_party: Vec<Combatant> = parts.roster.side(Side::Party).cloned().collect();
        let final_monsters: Vec<Combatant> = parts.roster.side(Side::Monster).cloned().collect();

        let experience = if parts.status == CombatStatus::Victory {
            final_monsters
                .iter()
                .filter(|m| !m.is_alive())
                .map(|m| m.experience)
                .sum()
        } else {
            0
        };

        let duration_ms = match (parts.started_at, parts.ended_at) {
            (Some(start), Some(end)) => (end - start).num_milliseconds(),
            _ => 0,
        };

        Self {
            session_id: parts.id,
            room_id: parts.room_id,
            seed: parts.seed,
            status: parts.status,
            stalemate: parts.stalemate,
            turns_taken: parts.turns_taken,
            party_survivors: final_party.iter().filter(|c| c.is_alive()).count(),
            monster_survivors: final_monsters.iter().filter(|c| c.is_alive()).count(),
            log: parts.log,
            experience,
            final_party,
            final_monsters,
            started_at: parts.started_at,
            ended_at: parts.ended_at,
            duration_ms,
        }
    }

    pub fn is_victory(&self) -> bool {
        self.status == CombatStatus::Victory
    }

    /// Human readable report: one line per record plus the verdict
    pub fn summary(&self) -> String {
        let mut lines: Vec<String> = self.log.iter().map(TurnRecord::describe).collect();
        let verdict = if self.stalemate {
            format!("{} (stalemate after {} turns)", self.status, self.turns_taken)
        } else {
            format!("{} after {} turns", self.status, self.turns_taken)
        };
        lines.push(format!(
            "{}: {} party standing, {} monsters standing, {} xp",
            verdict, self.party_survivors, self.monster_survivors, self.experience
        ));
        lines.join("\n")
    }
}
