//! Turn order
//!
//! Initiative is computed once at session start: descending dexterity
//! modifier, then descending raw dexterity, then the configured
//! [`TieBreak`]. Each turn the orchestrator filters that fixed order down to
//! the living combatants.

use serde::{Deserialize, Serialize};

use crate::combat::rng::RandomStream;
use crate::combat::roster::Roster;
use crate::core::config::TieBreak;
use crate::core::types::{CombatantId, Side};

/// Fixed initiative ordering for one session
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TurnOrder {
    order: Vec<CombatantId>,
}

struct InitiativeEntry {
    id: CombatantId,
    dex_mod: i32,
    dex: i32,
    side_rank: u8,
    roll: u32,
}

impl TurnOrder {
    /// Compute initiative over the whole roster, dead members included
    ///
    /// `stream` is only drawn from for [`TieBreak::SeededRoll`], one roll per
    /// combatant in roster order.
    pub fn compute(roster: &Roster, tie_break: TieBreak, stream: &mut RandomStream, die: u32) -> Self {
        let mut entries: Vec<InitiativeEntry> = roster
            .iter()
            .map(|c| InitiativeEntry {
                id: c.id,
                dex_mod: c.dexterity_modifier(),
                dex: c.dexterity,
                side_rank: u8::from(tie_break == TieBreak::MonstersFirst && c.side() == Side::Party),
                roll: match tie_break {
                    TieBreak::SeededRoll => stream.roll_die(die),
                    _ => 0,
                },
            })
            .collect();

        // Stable sort: roster order settles anything the keys leave equal
        entries.sort_by(|a, b| {
            b.dex_mod
                .cmp(&a.dex_mod)
                .then(b.dex.cmp(&a.dex))
                .then(a.side_rank.cmp(&b.side_rank))
                .then(b.roll.cmp(&a.roll))
        });

        Self {
            order: entries.into_iter().map(|e| e.id).collect(),
        }
    }

    pub fn ids(&self) -> &[CombatantId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Living combatants in initiative order
    pub fn alive_view(&self, roster: &Roster) -> Vec<CombatantId> {
        self.order
            .iter()
            .copied()
            .filter(|&id| roster.is_alive(id))
            .collect()
    }

    /// Cursor into the next alive view for whoever follows `actor`
    ///
    /// Walks the fixed order forward from `actor`, wrapping, so a death earlier
    /// in the order does not shift whose turn is next.
    pub fn next_cursor(&self, roster: &Roster, actor: CombatantId) -> usize {
        let view = self.alive_view(roster);
        let Some(start) = self.order.iter().position(|&id| id == actor) else {
            return 0;
        };
        let len = self.order.len();
        (1..=len)
            .map(|step| self.order[(start + step) % len])
            .find(|&id| roster.is_alive(id))
            .and_then(|id| view.iter().position(|&v| v == id))
            .unwrap_or(0)
    }
}
