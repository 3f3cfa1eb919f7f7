//! Opening bonus rounds
//!
//! Ambush: every living monster gets one basic attack on a random living
//! party member before initiative begins. Surprise: every living party
//! member acts once with its normal policy, minus healing. Each round runs at
//! most once per session and stops as soon as the fight is decided.

use crate::combat::equipment::{resolve_weapon, WeaponLookup};
use crate::combat::log::Round;
use crate::combat::policy::{choose_action, Action, ActionKind, PolicyContext};
use crate::combat::resolution::resolve_attack;
use crate::combat::rng::{RandomStream, StreamContext};
use crate::combat::state::{CombatSession, CombatStatus};
use crate::combat::weapons::WeaponDescriptor;
use crate::core::types::{CombatantId, Side};

/// Run the ambush round if it was requested and has not run yet
pub fn run_ambush(session: &mut CombatSession) {
    if !session.ambush().is_due() || session.status() != CombatStatus::Active {
        return;
    }
    session.complete_ambush();

    let attackers: Vec<CombatantId> = session.roster().living(Side::Monster).map(|c| c.id).collect();
    tracing::info!(session = %session.id(), attackers = attackers.len(), "ambush round");

    let basic = WeaponDescriptor::basic_attack();
    for (slot, id) in attackers.into_iter().enumerate() {
        if session.refresh_status().is_terminal() {
            break;
        }
        let Some(attacker) = session.roster().get(id).cloned() else {
            continue;
        };
        if !attacker.is_alive() {
            continue;
        }

        let mut stream = RandomStream::derive(
            session.seed(),
            &StreamContext::ambush(session.room_id(), slot as u32),
        );
        let victims: Vec<CombatantId> = session.roster().living(Side::Party).map(|c| c.id).collect();
        let Some(victim_id) = stream.pick(victims.len()).map(|idx| victims[idx]) else {
            break;
        };
        let Some(victim) = session.roster().get(victim_id).cloned() else {
            continue;
        };

        let resolution = resolve_attack(&attacker, &victim, &basic, &mut stream, session.config());
        let action = Action {
            actor: id,
            kind: ActionKind::Attack,
            target: victim_id,
            weapon: basic.clone(),
        };
        session.commit(0, Round::Ambush, id, Some(action), resolution);
    }

    session.refresh_status();
}

/// Run the surprise round if it was requested and has not run yet
///
/// Weapons for the whole party are resolved up front, so the lookup never
/// sits between two draws.
pub async fn run_surprise(session: &mut CombatSession, lookup: &dyn WeaponLookup) {
    if !session.surprise().is_due() || session.status() != CombatStatus::Active {
        return;
    }
    session.complete_surprise();

    let mut loadout = Vec::new();
    for member in session.roster().living(Side::Party) {
        loadout.push((member.id, resolve_weapon(lookup, member).await.weapon));
    }
    tracing::info!(session = %session.id(), actors = loadout.len(), "surprise round");

    for (slot, (id, weapon)) in loadout.into_iter().enumerate() {
        if session.refresh_status().is_terminal() {
            break;
        }
        let Some(actor) = session.roster().get(id).cloned() else {
            continue;
        };
        if !actor.is_alive() {
            continue;
        }

        let mut stream = RandomStream::derive(
            session.seed(),
            &StreamContext::surprise(session.room_id(), slot as u32),
        );
        let ctx = PolicyContext {
            roster: session.roster(),
            actor: &actor,
            weapon: &weapon,
            config: session.config(),
            allow_heal: false,
        };
        let Some(action) = choose_action(&ctx, None, &mut stream) else {
            break;
        };
        let Some(target) = session.roster().get(action.target).cloned() else {
            continue;
        };

        let resolution = resolve_attack(&actor, &target, &action.weapon, &mut stream, session.config());
        session.commit(0, Round::Surprise, id, Some(action), resolution);
    }

    session.refresh_status();
}
