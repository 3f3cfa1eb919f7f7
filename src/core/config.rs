//! Combat configuration with documented constants
//!
//! Every tunable number the engine uses lives here. Values can be loaded
//! from TOML (see `data/combat.toml`); missing keys keep their defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::combat::weapons::{WeaponCategory, WeaponDescriptor};
use crate::core::error::{CombatError, Result};

/// Largest accepted `crit_multiplier`
pub const MAX_CRIT_MULTIPLIER: u32 = 10;

/// How to order combatants whose dexterity ties exactly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Keep original roster order (party roster first, then monsters)
    #[default]
    RosterOrder,
    /// Monsters win ties, roster order within each side
    MonstersFirst,
    /// Each combatant rolls the attack die on the initiative stream;
    /// higher roll wins, roster order settles equal rolls
    SeededRoll,
}

/// Configuration for combat resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    // === TERMINATION ===
    /// Main-loop turn ceiling
    ///
    /// Reaching it while both sides still stand forces a stalemate, which is
    /// reported as a defeat.
    pub max_turns: u32,

    // === ACTION POLICY ===
    /// Probability that a healer heals when an ally is wounded
    pub heal_ratio: f64,

    /// Probability that a caster uses its special attack when it can pay
    pub special_ratio: f64,

    /// Healing spell used by healer roles
    ///
    /// Its `cost` is the resource a heal requires.
    pub heal_spell: WeaponDescriptor,

    /// Special attack used by caster roles (auto-hit magic)
    ///
    /// Its `cost` is the resource a special attack requires.
    pub special_spell: WeaponDescriptor,

    // === ATTACK ROLLS ===
    /// Size of the attack die (d20)
    pub attack_die: u32,

    /// Natural roll at or above which an attack is a critical hit
    pub crit_threshold: u32,

    /// Natural roll at or below which an attack always misses
    pub fumble_threshold: u32,

    /// Multiplier applied to damage dice (not flat modifiers) on a crit
    pub crit_multiplier: u32,

    // === INITIATIVE ===
    /// Tie-break rule for equal dexterity
    pub tie_break: TieBreak,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            max_turns: 1000,

            heal_ratio: 0.6,
            special_ratio: 0.5,
            heal_spell: WeaponDescriptor::heal_spell(),
            special_spell: WeaponDescriptor::arcane_bolt(),

            attack_die: 20,
            crit_threshold: 20,
            fumble_threshold: 1,
            crit_multiplier: 2,

            tie_break: TieBreak::RosterOrder,
        }
    }
}

impl CombatConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: CombatConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.max_turns == 0 {
            return Err(CombatError::InvalidConfig("max_turns must be positive".into()));
        }

        for (label, ratio) in [("heal_ratio", self.heal_ratio), ("special_ratio", self.special_ratio)] {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(CombatError::InvalidConfig(format!(
                    "{} ({}) must be within [0, 1]",
                    label, ratio
                )));
            }
        }

        if self.attack_die < 2 {
            return Err(CombatError::InvalidConfig("attack_die must be at least 2".into()));
        }

        if self.fumble_threshold >= self.crit_threshold || self.crit_threshold > self.attack_die {
            return Err(CombatError::InvalidConfig(format!(
                "thresholds must satisfy fumble ({}) < crit ({}) <= die ({})",
                self.fumble_threshold, self.crit_threshold, self.attack_die
            )));
        }

        if self.crit_multiplier == 0 || self.crit_multiplier > MAX_CRIT_MULTIPLIER {
            return Err(CombatError::InvalidConfig(format!(
                "crit_multiplier ({}) must be within [1, {}]",
                self.crit_multiplier, MAX_CRIT_MULTIPLIER
            )));
        }

        if self.heal_spell.category != WeaponCategory::Heal {
            return Err(CombatError::InvalidConfig(format!(
                "heal_spell '{}' must have the heal category",
                self.heal_spell.name
            )));
        }

        if self.special_spell.category == WeaponCategory::Heal {
            return Err(CombatError::InvalidConfig(format!(
                "special_spell '{}' cannot be a heal",
                self.special_spell.name
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CombatConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_turns, 1000);
        assert_eq!(config.tie_break, TieBreak::RosterOrder);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = CombatConfig::from_toml_str("max_turns = 50\nheal_ratio = 1.0\n").unwrap();
        assert_eq!(config.max_turns, 50);
        assert_eq!(config.heal_ratio, 1.0);
        assert_eq!(config.special_spell, CombatConfig::default().special_spell);
    }

    #[test]
    fn test_spell_override_from_toml() {
        let config = CombatConfig::from_toml_str(
            "[heal_spell]\nname = \"Mend\"\ndamage = \"1d4\"\ncost = 2\ncategory = \"heal\"\n",
        )
        .unwrap();
        assert_eq!(config.heal_spell.name, "Mend");
        assert_eq!(config.heal_spell.cost, 2);
    }

    #[test]
    fn test_shipped_config_loads() {
        let path = Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data/combat.toml"));
        let config = CombatConfig::load(path).unwrap();
        assert_eq!(config.heal_spell, CombatConfig::default().heal_spell);
        assert_eq!(config.special_spell.cost, 8);
    }

    #[test]
    fn test_tie_break_from_toml() {
        let config = CombatConfig::from_toml_str("tie_break = \"seeded_roll\"\n").unwrap();
        assert_eq!(config.tie_break, TieBreak::SeededRoll);
    }

    #[test]
    fn test_rejects_ratio_out_of_range() {
        let mut config = CombatConfig::default();
        config.special_ratio = 1.5;
        assert!(matches!(config.validate(), Err(CombatError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_zero_turn_ceiling() {
        let result = CombatConfig::from_toml_str("max_turns = 0\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_crossed_thresholds() {
        let mut config = CombatConfig::default();
        config.fumble_threshold = 20;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_oversized_crit_multiplier() {
        let mut config = CombatConfig::default();
        config.crit_multiplier = MAX_CRIT_MULTIPLIER;
        assert!(config.validate().is_ok());

        config.crit_multiplier = MAX_CRIT_MULTIPLIER + 1;
        assert!(matches!(config.validate(), Err(CombatError::InvalidConfig(_))));
        assert!(CombatConfig::from_toml_str("crit_multiplier = 4000000000\n").is_err());
    }

    #[test]
    fn test_rejects_heal_spell_without_heal_category() {
        let result = CombatConfig::from_toml_str(
            "[heal_spell]\nname = \"Smite\"\ndamage = \"1d8\"\ncost = 5\ncategory = \"melee_strength\"\n",
        );
        assert!(matches!(result, Err(CombatError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_special_spell_that_heals() {
        let mut config = CombatConfig::default();
        config.special_spell = WeaponDescriptor::heal_spell();
        assert!(matches!(config.validate(), Err(CombatError::InvalidConfig(_))));
    }
}
