//! Attack and heal resolution
//!
//! Pure functions: given the actor, the target, a descriptor and a stream,
//! compute the outcome and the updated combatants. Nothing here touches the
//! session; the caller commits `updates` as a whole or not at all.
//!
//! Validation happens before any draw, so a skipped action never consumes
//! randomness.

use crate::combat::combatant::Combatant;
use crate::combat::log::{SkipReason, TurnOutcome};
use crate::combat::rng::RandomStream;
use crate::combat::weapons::WeaponDescriptor;
use crate::core::config::CombatConfig;

/// Result of resolving one action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub outcome: TurnOutcome,
    /// Post-action state of every combatant the action changed
    pub updates: Vec<Combatant>,
}

impl Resolution {
    pub fn skipped(reason: SkipReason) -> Self {
        Self {
            outcome: TurnOutcome::skipped(reason),
            updates: Vec::new(),
        }
    }
}

/// Check everything that turns an action into a skip
fn precheck(actor: &Combatant, target: &Combatant, weapon: &WeaponDescriptor) -> Option<SkipReason> {
    if !actor.is_alive() {
        return Some(SkipReason::ActorDead);
    }
    if !target.is_alive() {
        return Some(SkipReason::TargetUnavailable);
    }
    if !actor.can_afford(weapon.cost) {
        return Some(SkipReason::InsufficientResource {
            required: weapon.cost,
            available: actor.resource,
        });
    }
    None
}

/// Deduct the descriptor's cost from the actor
fn pay(actor: &Combatant, weapon: &WeaponDescriptor) -> Combatant {
    actor.with_resource(i64::from(actor.resource) - i64::from(weapon.cost))
}

/// Resolve an attack from `actor` against `target`
///
/// Roll-based attacks roll the attack die plus the weapon's to-hit bonus and
/// the wielder's ability modifier against the target's armor. A natural roll
/// at or under the fumble threshold always misses; at or over the crit
/// threshold always hits and multiplies the damage dice. Magic skips the
/// roll entirely and never crits.
pub fn resolve_attack(
    actor: &Combatant,
    target: &Combatant,
    weapon: &WeaponDescriptor,
    stream: &mut RandomStream,
    config: &CombatConfig,
) -> Resolution {
    if weapon.is_heal() || actor.side() == target.side() {
        return Resolution::skipped(SkipReason::NoValidAction);
    }
    if let Some(reason) = precheck(actor, target, weapon) {
        return Resolution::skipped(reason);
    }

    let actor_after = pay(actor, weapon);

    let (hit, critical, natural_roll, attack_total) = if weapon.auto_hits() {
        (true, false, None, None)
    } else {
        let natural = stream.roll_die(config.attack_die);
        let total = i32::try_from(natural)
            .unwrap_or(i32::MAX)
            .saturating_add(weapon.to_hit)
            .saturating_add(actor.attack_modifier(weapon.category));
        let (hit, critical) = if natural <= config.fumble_threshold {
            (false, false)
        } else if natural >= config.crit_threshold {
            (true, true)
        } else {
            (total >= target.armor, false)
        };
        (hit, critical, Some(natural), Some(total))
    };

    let damage = if hit {
        let multiplier = if critical { config.crit_multiplier } else { 1 };
        weapon.damage.roll_with_multiplier(stream, multiplier).max(0) as u32
    } else {
        0
    };

    let target_after = target.with_hp(i64::from(target.hp) - i64::from(damage));

    Resolution {
        outcome: TurnOutcome::Attack {
            hit,
            critical,
            natural_roll,
            attack_total,
            damage,
            target_hp_before: target.hp,
            target_hp_after: target_after.hp,
        },
        updates: vec![actor_after, target_after],
    }
}

/// Resolve a heal from `actor` on `target`
///
/// Dead targets cannot be healed. Healing is capped at the target's max hit
/// points; the logged amount is what was actually restored.
pub fn resolve_heal(
    actor: &Combatant,
    target: &Combatant,
    spell: &WeaponDescriptor,
    stream: &mut RandomStream,
) -> Resolution {
    if !spell.is_heal() || actor.side() != target.side() {
        return Resolution::skipped(SkipReason::NoValidAction);
    }
    if let Some(reason) = precheck(actor, target, spell) {
        return Resolution::skipped(reason);
    }

    let actor_after = pay(actor, spell);
    let rolled = spell.damage.roll(stream).max(0);

    // Self-heal: apply to the already-charged actor
    let base = if target.id == actor.id { &actor_after } else { target };
    let target_after = base.with_hp(i64::from(base.hp) + i64::from(rolled));
    let amount = target_after.hp - base.hp;

    let outcome = TurnOutcome::Heal {
        amount,
        target_hp_before: target.hp,
        target_hp_after: target_after.hp,
    };

    let updates = if target.id == actor.id {
        vec![target_after]
    } else {
        vec![actor_after, target_after]
    };

    Resolution { outcome, updates }
}
