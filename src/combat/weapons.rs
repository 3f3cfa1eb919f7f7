//! Weapon and spell descriptors
//!
//! A descriptor says which ability drives the attack roll, what it rolls
//! for damage (or healing), and what it costs the wielder.

use serde::{Deserialize, Serialize};

use crate::combat::dice::DiceExpr;

/// How a descriptor resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponCategory {
    /// Attack roll uses strength (swords, maces, claws)
    MeleeStrength,
    /// Attack roll uses dexterity (daggers, rapiers)
    MeleeDexterity,
    /// Restores hit points to an ally, no attack roll
    Heal,
    /// Arcane attack that always hits
    RangedMagic,
}

/// Complete weapon or spell description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponDescriptor {
    pub name: String,
    /// Damage dealt on a hit, or healing for `Heal`
    pub damage: DiceExpr,
    /// Flat bonus to the attack roll
    #[serde(default)]
    pub to_hit: i32,
    /// Resource drawn from the wielder per use
    #[serde(default)]
    pub cost: u32,
    pub category: WeaponCategory,
}

impl WeaponDescriptor {
    pub fn new(name: &str, damage: DiceExpr, to_hit: i32, category: WeaponCategory) -> Self {
        Self {
            name: name.to_string(),
            damage,
            to_hit,
            cost: 0,
            category,
        }
    }

    /// Builder-style resource cost
    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = cost;
        self
    }

    /// Magic never rolls to hit
    pub fn auto_hits(&self) -> bool {
        self.category == WeaponCategory::RangedMagic
    }

    pub fn is_heal(&self) -> bool {
        self.category == WeaponCategory::Heal
    }

    /// Common weapon: Longsword (warriors)
    pub fn longsword() -> Self {
        Self::new("Longsword", DiceExpr { count: 1, sides: 8, modifier: 0 }, 0, WeaponCategory::MeleeStrength)
    }

    /// Common weapon: Dagger (rogues)
    pub fn dagger() -> Self {
        Self::new("Dagger", DiceExpr { count: 1, sides: 4, modifier: 1 }, 1, WeaponCategory::MeleeDexterity)
    }

    /// Common weapon: Mace (clerics)
    pub fn mace() -> Self {
        Self::new("Mace", DiceExpr { count: 1, sides: 6, modifier: 0 }, 0, WeaponCategory::MeleeStrength)
    }

    /// Common weapon: Quarterstaff (mages)
    pub fn quarterstaff() -> Self {
        Self::new("Quarterstaff", DiceExpr { count: 1, sides: 6, modifier: 0 }, 0, WeaponCategory::MeleeStrength)
    }

    /// Natural weapons for creatures without a stat-block attack
    pub fn claws() -> Self {
        Self::new("Claws", DiceExpr { count: 1, sides: 6, modifier: 0 }, 0, WeaponCategory::MeleeStrength)
    }

    /// Fixed attack monsters use during an ambush round
    pub fn basic_attack() -> Self {
        Self::new("Basic Attack", DiceExpr { count: 1, sides: 4, modifier: 0 }, 0, WeaponCategory::MeleeStrength)
    }

    /// Healer spell
    pub fn heal_spell() -> Self {
        Self::new("Cure Wounds", DiceExpr { count: 1, sides: 8, modifier: 2 }, 0, WeaponCategory::Heal)
            .with_cost(5)
    }

    /// Caster special attack
    pub fn arcane_bolt() -> Self {
        Self::new("Arcane Bolt", DiceExpr { count: 2, sides: 6, modifier: 0 }, 0, WeaponCategory::RangedMagic)
            .with_cost(8)
    }
}

impl Default for WeaponDescriptor {
    fn default() -> Self {
        Self::claws()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_magic_auto_hits() {
        assert!(WeaponDescriptor::arcane_bolt().auto_hits());
        assert!(!WeaponDescriptor::longsword().auto_hits());
        assert!(!WeaponDescriptor::heal_spell().auto_hits());
    }

    #[test]
    fn test_spells_carry_costs() {
        assert_eq!(WeaponDescriptor::heal_spell().cost, 5);
        assert_eq!(WeaponDescriptor::arcane_bolt().cost, 8);
        assert_eq!(WeaponDescriptor::dagger().cost, 0);
    }

    #[test]
    fn test_dagger_is_dexterity_based() {
        assert_eq!(WeaponDescriptor::dagger().category, WeaponCategory::MeleeDexterity);
    }

    #[test]
    fn test_descriptor_from_toml() {
        let weapon: WeaponDescriptor = toml::from_str(
            "name = \"Warhammer\"\ndamage = \"1d10+1\"\ncategory = \"melee_strength\"\n",
        )
        .unwrap();
        assert_eq!(weapon.damage.to_string(), "1d10+1");
        assert_eq!(weapon.to_hit, 0);
        assert_eq!(weapon.cost, 0);
    }
}
