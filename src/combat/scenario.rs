//! Scenario files
//!
//! A scenario is a TOML description of one encounter: the party as character
//! records, the monsters as stat blocks, the opener flags, optional scripted
//! actions and optional equipment.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::combat::combatant::{Combatant, MonsterStatBlock};
use crate::combat::equipment::StaticArmory;
use crate::combat::policy::{ActionScript, ScriptedAction};
use crate::combat::state::{CombatSession, SessionOptions};
use crate::combat::weapons::WeaponDescriptor;
use crate::core::config::CombatConfig;
use crate::core::error::Result;
use crate::core::types::CombatantId;

/// Monsters are numbered from here, in listing order
pub const MONSTER_ID_BASE: u32 = 100;

/// One equipped weapon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentEntry {
    pub combatant: CombatantId,
    pub weapon: WeaponDescriptor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub room_id: String,
    #[serde(default)]
    pub seed: Option<String>,
    #[serde(default)]
    pub ambush: bool,
    #[serde(default)]
    pub surprise: bool,
    pub party: Vec<Combatant>,
    pub monsters: Vec<MonsterStatBlock>,
    #[serde(default)]
    pub scripted: Vec<ScriptedAction>,
    #[serde(default)]
    pub equipment: Vec<EquipmentEntry>,
}

impl Scenario {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Monster combatants with ids assigned from [`MONSTER_ID_BASE`]
    pub fn monster_combatants(&self) -> Vec<Combatant> {
        self.monsters
            .iter()
            .cloned()
            .zip(MONSTER_ID_BASE..)
            .map(|(block, id)| block.into_combatant(CombatantId(id)))
            .collect()
    }

    /// Equipment served through the lookup port
    pub fn armory(&self) -> StaticArmory {
        let mut armory = StaticArmory::new();
        for entry in &self.equipment {
            armory.equip(entry.combatant, entry.weapon.clone());
        }
        armory
    }

    pub fn session_options(&self, config: CombatConfig) -> SessionOptions {
        SessionOptions {
            room_id: self.room_id.clone(),
            seed: self.seed.clone(),
            ambush: self.ambush,
            surprise: self.surprise,
            script: ActionScript::from(self.scripted.clone()),
            config,
        }
    }

    /// Build a session from this scenario
    pub fn build_session(&self, options: SessionOptions) -> Result<CombatSession> {
        CombatSession::new(self.party.clone(), self.monster_combatants(), options)
    }
}
