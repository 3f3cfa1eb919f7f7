//! Weapon resolution
//!
//! The equipment service is the one external call a turn makes. Its answer
//! (or the role default that replaces a failure) is settled before any
//! random draw for the turn.

use ahash::AHashMap;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::combat::combatant::Combatant;
use crate::combat::weapons::WeaponDescriptor;
use crate::core::error::WeaponLookupError;
use crate::core::types::{CombatantId, Role};

/// Port to the external equipment/inventory service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeaponLookup: Send + Sync {
    /// Weapon currently equipped by `combatant`, if any
    async fn equipped_weapon(
        &self,
        combatant: &Combatant,
    ) -> Result<Option<WeaponDescriptor>, WeaponLookupError>;
}

/// Lookup for encounters without an equipment service
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEquipment;

#[async_trait]
impl WeaponLookup for NoEquipment {
    async fn equipped_weapon(
        &self,
        _combatant: &Combatant,
    ) -> Result<Option<WeaponDescriptor>, WeaponLookupError> {
        Ok(None)
    }
}

/// In-memory equipment table keyed by combatant
#[derive(Debug, Clone, Default)]
pub struct StaticArmory {
    weapons: AHashMap<CombatantId, WeaponDescriptor>,
}

impl StaticArmory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn equip(&mut self, id: CombatantId, weapon: WeaponDescriptor) {
        self.weapons.insert(id, weapon);
    }

    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }
}

#[async_trait]
impl WeaponLookup for StaticArmory {
    async fn equipped_weapon(
        &self,
        combatant: &Combatant,
    ) -> Result<Option<WeaponDescriptor>, WeaponLookupError> {
        Ok(self.weapons.get(&combatant.id).cloned())
    }
}

/// Where a turn's weapon came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponSource {
    Equipped,
    RoleDefault,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedWeapon {
    pub weapon: WeaponDescriptor,
    pub source: WeaponSource,
}

/// Get default weapon for a combatant's role
///
/// Monsters fight with their stat-block attack when they have one.
pub fn weapon_for_role(combatant: &Combatant) -> WeaponDescriptor {
    match combatant.role {
        Role::Warrior => WeaponDescriptor::longsword(),
        Role::Rogue => WeaponDescriptor::dagger(),
        Role::Cleric => WeaponDescriptor::mace(),
        Role::Mage => WeaponDescriptor::quarterstaff(),
        Role::Monster => combatant
            .natural_weapon
            .clone()
            .unwrap_or_else(WeaponDescriptor::claws),
    }
}

/// Ask the equipment service, falling back to the role default on any miss
pub async fn resolve_weapon(lookup: &dyn WeaponLookup, combatant: &Combatant) -> ResolvedWeapon {
    match lookup.equipped_weapon(combatant).await {
        Ok(Some(weapon)) => ResolvedWeapon {
            weapon,
            source: WeaponSource::Equipped,
        },
        Ok(None) => {
            tracing::debug!(combatant = %combatant.id, "no equipped weapon, using role default");
            ResolvedWeapon {
                weapon: weapon_for_role(combatant),
                source: WeaponSource::RoleDefault,
            }
        }
        Err(err) => {
            tracing::warn!(
                combatant = %combatant.id,
                error = %err,
                "weapon lookup failed, using role default"
            );
            ResolvedWeapon {
                weapon: weapon_for_role(combatant),
                source: WeaponSource::RoleDefault,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::dice::DiceExpr;
    use crate::combat::weapons::WeaponCategory;

    fn warrior() -> Combatant {
        Combatant::new(CombatantId(1), "Brakka", Role::Warrior, 12, 15)
    }

    #[test]
    fn test_role_defaults() {
        assert_eq!(weapon_for_role(&warrior()).name, "Longsword");
        let rogue = Combatant::new(CombatantId(2), "Vex", Role::Rogue, 9, 14);
        assert_eq!(weapon_for_role(&rogue).category, WeaponCategory::MeleeDexterity);
    }

    #[test]
    fn test_monster_default_prefers_stat_block_attack() {
        let mut wolf = Combatant::new(CombatantId(3), "Wolf", Role::Monster, 11, 13);
        assert_eq!(weapon_for_role(&wolf).name, "Claws");

        wolf.natural_weapon = Some(WeaponDescriptor::new(
            "Bite",
            DiceExpr::parse("2d4").unwrap(),
            2,
            WeaponCategory::MeleeStrength,
        ));
        assert_eq!(weapon_for_role(&wolf).name, "Bite");
    }

    #[tokio::test]
    async fn test_static_armory_serves_equipped_weapon() {
        let mut armory = StaticArmory::new();
        armory.equip(CombatantId(1), WeaponDescriptor::dagger());

        let resolved = resolve_weapon(&armory, &warrior()).await;
        assert_eq!(resolved.source, WeaponSource::Equipped);
        assert_eq!(resolved.weapon.name, "Dagger");
    }

    #[tokio::test]
    async fn test_missing_equipment_falls_back() {
        let resolved = resolve_weapon(&NoEquipment, &warrior()).await;
        assert_eq!(resolved.source, WeaponSource::RoleDefault);
        assert_eq!(resolved.weapon, WeaponDescriptor::longsword());
    }

    #[tokio::test]
    async fn test_lookup_error_falls_back() {
        let mut lookup = MockWeaponLookup::new();
        lookup
            .expect_equipped_weapon()
            .returning(|_| Err(WeaponLookupError::Unavailable("timeout".into())));

        let resolved = resolve_weapon(&lookup, &warrior()).await;
        assert_eq!(resolved.source, WeaponSource::RoleDefault);
        assert_eq!(resolved.weapon, WeaponDescriptor::longsword());
    }
}
