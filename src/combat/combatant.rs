//! Combatants and monster stat blocks
//!
//! Hit points and resource are unsigned and every mutation goes through a
//! clamping constructor, so `0 <= hp <= max_hp` and
//! `0 <= resource <= max_resource` hold for any value a caller can observe.

use serde::{Deserialize, Serialize};

use crate::combat::dice::DiceExpr;
use crate::combat::weapons::{WeaponCategory, WeaponDescriptor};
use crate::core::error::{CombatError, Result};
use crate::core::types::{CombatantId, Role, Side};

/// Ability score to modifier: 10-11 is +0, 12-13 is +1, 8-9 is -1
pub fn ability_modifier(score: i32) -> i32 {
    score.saturating_sub(10).div_euclid(2)
}

/// A single participant in a combat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    pub role: Role,
    pub hp: u32,
    pub max_hp: u32,
    #[serde(default)]
    pub resource: u32,
    #[serde(default)]
    pub max_resource: u32,
    /// Armor value an attack total must meet
    pub armor: i32,
    #[serde(default = "default_score")]
    pub strength: i32,
    #[serde(default = "default_score")]
    pub dexterity: i32,
    /// Experience awarded for defeating this combatant (monsters)
    #[serde(default)]
    pub experience: u32,
    /// Link to the external stat block or character record
    #[serde(default)]
    pub record_ref: Option<String>,
    /// Attack from the monster's stat block, used when nothing is equipped
    #[serde(default)]
    pub natural_weapon: Option<WeaponDescriptor>,
}

fn default_score() -> i32 {
    10
}

impl Combatant {
    /// Full-health combatant with average scores and no resource pool
    pub fn new(id: CombatantId, name: &str, role: Role, max_hp: u32, armor: i32) -> Self {
        Self {
            id,
            name: name.to_string(),
            role,
            hp: max_hp,
            max_hp,
            resource: 0,
            max_resource: 0,
            armor,
            strength: default_score(),
            dexterity: default_score(),
            experience: 0,
            record_ref: None,
            natural_weapon: None,
        }
    }

    pub fn with_scores(mut self, strength: i32, dexterity: i32) -> Self {
        self.strength = strength;
        self.dexterity = dexterity;
        self
    }

    /// Set the resource pool; `current` is clamped to `max`
    pub fn with_pool(mut self, current: u32, max: u32) -> Self {
        self.max_resource = max;
        self.resource = current.min(max);
        self
    }

    /// Copy with hit points clamped into `[0, max_hp]`
    pub fn with_hp(&self, hp: i64) -> Self {
        let mut next = self.clone();
        next.hp = hp.clamp(0, i64::from(self.max_hp)) as u32;
        next
    }

    /// Copy with resource clamped into `[0, max_resource]`
    pub fn with_resource(&self, resource: i64) -> Self {
        let mut next = self.clone();
        next.resource = resource.clamp(0, i64::from(self.max_resource)) as u32;
        next
    }

    pub fn side(&self) -> Side {
        self.role.side()
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn is_wounded(&self) -> bool {
        self.is_alive() && self.hp < self.max_hp
    }

    pub fn missing_hp(&self) -> u32 {
        self.max_hp - self.hp
    }

    pub fn can_afford(&self, cost: u32) -> bool {
        self.resource >= cost
    }

    pub fn dexterity_modifier(&self) -> i32 {
        ability_modifier(self.dexterity)
    }

    /// Ability modifier added to attack rolls with a weapon of `category`
    pub fn attack_modifier(&self, category: WeaponCategory) -> i32 {
        match category {
            WeaponCategory::MeleeStrength => ability_modifier(self.strength),
            WeaponCategory::MeleeDexterity => ability_modifier(self.dexterity),
            WeaponCategory::Heal | WeaponCategory::RangedMagic => 0,
        }
    }

    /// Check stats before a session is built
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| CombatError::InvalidStats {
            id: self.id,
            reason: reason.to_string(),
        };
        if self.max_hp == 0 {
            return Err(invalid("max_hp must be positive"));
        }
        if self.hp > self.max_hp {
            return Err(invalid("hp exceeds max_hp"));
        }
        if self.resource > self.max_resource {
            return Err(invalid("resource exceeds max_resource"));
        }
        Ok(())
    }
}

/// Base profile of a creature, as served by the monster registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterStatBlock {
    pub name: String,
    pub hp: u32,
    pub armor: i32,
    #[serde(default = "default_score")]
    pub strength: i32,
    #[serde(default = "default_score")]
    pub dexterity: i32,
    /// Attack damage; creatures without one fall back to claws
    #[serde(default)]
    pub attack: Option<DiceExpr>,
    #[serde(default)]
    pub to_hit: i32,
    #[serde(default)]
    pub experience: u32,
    #[serde(default)]
    pub record_ref: Option<String>,
}

impl MonsterStatBlock {
    pub fn into_combatant(self, id: CombatantId) -> Combatant {
        let natural_weapon = self.attack.map(|damage| {
            WeaponDescriptor::new(
                &format!("{} attack", self.name),
                damage,
                self.to_hit,
                WeaponCategory::MeleeStrength,
            )
        });

        Combatant {
            experience: self.experience,
            record_ref: self.record_ref,
            natural_weapon,
            ..Combatant::new(id, &self.name, Role::Monster, self.hp, self.armor)
                .with_scores(self.strength, self.dexterity)
        }
    }
}
