//! Action selection
//!
//! Each role maps to one policy function through [`policy_for`]. A scripted
//! action for the current `(actor, turn)` pair overrides the policy as long
//! as its target is still standing.

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BTreeMap;

use crate::combat::combatant::Combatant;
use crate::combat::rng::RandomStream;
use crate::combat::roster::Roster;
use crate::combat::weapons::WeaponDescriptor;
use crate::core::config::CombatConfig;
use crate::core::types::{CombatantId, Role, TurnNumber};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Attack,
    Heal,
    SpecialAttack,
}

/// What an actor will do this turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub actor: CombatantId,
    pub kind: ActionKind,
    pub target: CombatantId,
    pub weapon: WeaponDescriptor,
}

/// A pre-decided action for one actor on one main-loop turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedAction {
    pub actor: CombatantId,
    pub turn: TurnNumber,
    pub kind: ActionKind,
    pub target: CombatantId,
}

/// Scripted overrides keyed by `(actor, turn)`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ScriptedAction>", into = "Vec<ScriptedAction>")]
pub struct ActionScript {
    entries: BTreeMap<(CombatantId, TurnNumber), ScriptedAction>,
}

impl ActionScript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry; a later entry for the same pair replaces the earlier one
    pub fn push(&mut self, action: ScriptedAction) {
        self.entries.insert((action.actor, action.turn), action);
    }

    pub fn get(&self, actor: CombatantId, turn: TurnNumber) -> Option<&ScriptedAction> {
        self.entries.get(&(actor, turn))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<ScriptedAction>> for ActionScript {
    fn from(actions: Vec<ScriptedAction>) -> Self {
        let mut script = Self::new();
        for action in actions {
            script.push(action);
        }
        script
    }
}

impl From<ActionScript> for Vec<ScriptedAction> {
    fn from(script: ActionScript) -> Self {
        script.entries.into_values().collect()
    }
}

/// Everything a policy may look at
pub struct PolicyContext<'a> {
    pub roster: &'a Roster,
    pub actor: &'a Combatant,
    /// Weapon resolved for this turn (equipped or role default)
    pub weapon: &'a WeaponDescriptor,
    pub config: &'a CombatConfig,
    /// False during the surprise round
    pub allow_heal: bool,
}

impl PolicyContext<'_> {
    fn attack(&self, target: CombatantId) -> Action {
        Action {
            actor: self.actor.id,
            kind: ActionKind::Attack,
            target,
            weapon: self.weapon.clone(),
        }
    }

    /// Descriptor a given action kind uses
    fn weapon_for(&self, kind: ActionKind) -> WeaponDescriptor {
        match kind {
            ActionKind::Attack => self.weapon.clone(),
            ActionKind::Heal => self.config.heal_spell.clone(),
            ActionKind::SpecialAttack => self.config.special_spell.clone(),
        }
    }

    fn random_enemy(&self, stream: &mut RandomStream) -> Option<CombatantId> {
        let enemies: Vec<CombatantId> = self
            .roster
            .living(self.actor.side().opponent())
            .map(|c| c.id)
            .collect();
        stream.pick(enemies.len()).map(|idx| enemies[idx])
    }
}

pub type PolicyFn = fn(&PolicyContext<'_>, &mut RandomStream) -> Option<Action>;

/// Strategy table: role to action policy
pub fn policy_for(role: Role) -> PolicyFn {
    match role {
        Role::Cleric => healer_policy,
        Role::Mage => caster_policy,
        Role::Warrior | Role::Rogue | Role::Monster => attacker_policy,
    }
}

/// Normal attack at a random living enemy
fn attacker_policy(ctx: &PolicyContext<'_>, stream: &mut RandomStream) -> Option<Action> {
    ctx.random_enemy(stream).map(|target| ctx.attack(target))
}

/// Heal the most wounded ally when the roll allows, otherwise attack
fn healer_policy(ctx: &PolicyContext<'_>, stream: &mut RandomStream) -> Option<Action> {
    let spell = &ctx.config.heal_spell;
    let most_wounded = ctx
        .roster
        .living(ctx.actor.side())
        .filter(|c| c.is_wounded())
        .min_by_key(|c| Reverse(c.missing_hp()));

    if let Some(ally) = most_wounded {
        if ctx.allow_heal && ctx.actor.can_afford(spell.cost) && stream.next_f64() < ctx.config.heal_ratio {
            return Some(Action {
                actor: ctx.actor.id,
                kind: ActionKind::Heal,
                target: ally.id,
                weapon: spell.clone(),
            });
        }
    }

    attacker_policy(ctx, stream)
}

/// Special attack at a random enemy when affordable and the roll allows
fn caster_policy(ctx: &PolicyContext<'_>, stream: &mut RandomStream) -> Option<Action> {
    let spell = &ctx.config.special_spell;
    if ctx.actor.can_afford(spell.cost) && stream.next_f64() < ctx.config.special_ratio {
        return ctx.random_enemy(stream).map(|target| Action {
            actor: ctx.actor.id,
            kind: ActionKind::SpecialAttack,
            target,
            weapon: spell.clone(),
        });
    }

    attacker_policy(ctx, stream)
}

/// Choose this turn's action for `ctx.actor`
///
/// Returns `None` only when no enemy is left standing, which the caller
/// treats as a termination trigger.
pub fn choose_action(
    ctx: &PolicyContext<'_>,
    scripted: Option<&ScriptedAction>,
    stream: &mut RandomStream,
) -> Option<Action> {
    if ctx.roster.living_count(ctx.actor.side().opponent()) == 0 {
        return None;
    }

    if let Some(script) = scripted {
        let allowed = ctx.allow_heal || script.kind != ActionKind::Heal;
        if allowed && script.actor == ctx.actor.id && ctx.roster.is_alive(script.target) {
            return Some(Action {
                actor: ctx.actor.id,
                kind: script.kind,
                target: script.target,
                weapon: ctx.weapon_for(script.kind),
            });
        }
    }

    policy_for(ctx.actor.role)(ctx, stream)
}
