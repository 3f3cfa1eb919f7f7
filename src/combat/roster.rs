//! Fixed-membership roster of combatants
//!
//! Membership never changes once a session starts. Updates produce a new
//! roster (copy-on-write), so a turn either lands completely or not at all.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::combat::combatant::Combatant;
use crate::core::error::{CombatError, Result};
use crate::core::types::{CombatantId, Side};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "Vec<Combatant>", into = "Vec<Combatant>")]
pub struct Roster {
    members: Vec<Combatant>,
    index: AHashMap<CombatantId, usize>,
}

impl Roster {
    /// Build a roster with the party first, then monsters
    pub fn new(party: Vec<Combatant>, monsters: Vec<Combatant>) -> Result<Self> {
        if let Some(stray) = party.iter().find(|c| c.side() != Side::Party) {
            return Err(CombatError::InvalidStats {
                id: stray.id,
                reason: "monster listed in the party roster".into(),
            });
        }
        if let Some(stray) = monsters.iter().find(|c| c.side() != Side::Monster) {
            return Err(CombatError::InvalidStats {
                id: stray.id,
                reason: "party member listed among monsters".into(),
            });
        }

        let mut members = party;
        members.extend(monsters);

        let mut index = AHashMap::with_capacity(members.len());
        for (idx, member) in members.iter().enumerate() {
            member.validate()?;
            if index.insert(member.id, idx).is_some() {
                return Err(CombatError::DuplicateCombatant(member.id));
            }
        }

        Ok(Self { members, index })
    }

    pub fn get(&self, id: CombatantId) -> Option<&Combatant> {
        self.index.get(&id).map(|&idx| &self.members[idx])
    }

    /// Roster position of `id` (party first, then monsters)
    pub fn position(&self, id: CombatantId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Members in roster order
    pub fn iter(&self) -> impl Iterator<Item = &Combatant> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn side(&self, side: Side) -> impl Iterator<Item = &Combatant> {
        self.members.iter().filter(move |c| c.side() == side)
    }

    /// Living members of `side`, in roster order
    pub fn living(&self, side: Side) -> impl Iterator<Item = &Combatant> {
        self.side(side).filter(|c| c.is_alive())
    }

    pub fn living_count(&self, side: Side) -> usize {
        self.living(side).count()
    }

    pub fn is_alive(&self, id: CombatantId) -> bool {
        self.get(id).is_some_and(|c| c.is_alive())
    }

    /// New roster with `updates` swapped in by id
    ///
    /// Unknown ids are ignored; membership is fixed.
    pub fn with_updates(&self, updates: impl IntoIterator<Item = Combatant>) -> Self {
        let mut next = self.clone();
        for update in updates {
            if let Some(&idx) = self.index.get(&update.id) {
                next.members[idx] = update;
            }
        }
        next
    }
}

impl PartialEq for Roster {
    fn eq(&self, other: &Self) -> bool {
        self.members == other.members
    }
}

impl Eq for Roster {}

impl From<Vec<Combatant>> for Roster {
    fn from(members: Vec<Combatant>) -> Self {
        let index = members
            .iter()
            .enumerate()
            .map(|(idx, member)| (member.id, idx))
            .collect();
        Self { members, index }
    }
}

impl From<Roster> for Vec<Combatant> {
    fn from(roster: Roster) -> Self {
        roster.members
    }
}
