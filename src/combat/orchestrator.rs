//! Combat loop
//!
//! Drives a session from `Pending` to a verdict: bonus rounds first, then
//! main-loop turns in initiative order until one side is wiped out or the
//! turn ceiling is reached. The only suspension point is the weapon lookup,
//! which always completes before the turn's stream is derived.

use crate::combat::ambush::{run_ambush, run_surprise};
use crate::combat::equipment::{resolve_weapon, WeaponLookup};
use crate::combat::log::{Round, SkipReason};
use crate::combat::policy::{choose_action, Action, ActionKind, PolicyContext};
use crate::combat::resolution::{resolve_attack, resolve_heal, Resolution};
use crate::combat::result::CombatResult;
use crate::combat::rng::{RandomStream, StreamContext};
use crate::combat::roster::Roster;
use crate::combat::state::{CombatSession, CombatStatus};
use crate::core::config::CombatConfig;

/// Run a session to completion
///
/// Never fails: every problem past construction becomes a skipped turn or a
/// fallback weapon, and the turn ceiling guarantees termination.
pub async fn run_combat(mut session: CombatSession, lookup: &dyn WeaponLookup) -> CombatResult {
    session.begin();
    tracing::info!(
        session = %session.id(),
        room = %session.room_id(),
        seed = %session.seed(),
        combatants = session.roster().len(),
        "combat started"
    );

    run_ambush(&mut session);
    run_surprise(&mut session, lookup).await;

    let max_turns = session.config().max_turns;
    while session.status() == CombatStatus::Active && session.turns_taken() < max_turns {
        if !take_turn(&mut session, lookup).await {
            break;
        }
    }

    if session.status() == CombatStatus::Active {
        tracing::warn!(
            session = %session.id(),
            turns = session.turns_taken(),
            "turn ceiling reached, ending in stalemate"
        );
        session.force_stalemate();
    }

    let result = CombatResult::from_session(session);
    tracing::info!(
        session = %result.session_id,
        status = %result.status,
        turns = result.turns_taken,
        experience = result.experience,
        "combat finished"
    );
    result
}

/// Execute one main-loop turn
///
/// Only an `Active` session with its bonus rounds done and turns left under
/// the ceiling is stepped. Returns `false` without touching the session
/// otherwise, and also when nobody is left to act or the actor has no enemy
/// to act against.
pub async fn take_turn(session: &mut CombatSession, lookup: &dyn WeaponLookup) -> bool {
    if session.status() != CombatStatus::Active
        || session.ambush().is_due()
        || session.surprise().is_due()
        || session.turns_taken() >= session.config().max_turns
    {
        return false;
    }

    let alive = session.turn_order().alive_view(session.roster());
    if alive.is_empty() {
        session.refresh_status();
        return false;
    }
    let actor_id = alive[session.cursor() % alive.len()];
    let Some(actor) = session.roster().get(actor_id).cloned() else {
        return false;
    };
    let turn = session.turns_taken() + 1;

    let weapon = resolve_weapon(lookup, &actor).await.weapon;
    let mut stream = RandomStream::derive(session.seed(), &StreamContext::turn(session.room_id(), turn));

    let ctx = PolicyContext {
        roster: session.roster(),
        actor: &actor,
        weapon: &weapon,
        config: session.config(),
        allow_heal: true,
    };
    let Some(action) = choose_action(&ctx, session.script().get(actor_id, turn), &mut stream) else {
        session.refresh_status();
        return false;
    };

    let resolution = execute(&action, session.roster(), &mut stream, session.config());
    session.commit(turn, Round::Main, actor_id, Some(action), resolution);
    session.advance(actor_id);
    session.refresh_status();
    true
}

/// Dispatch an action to the matching resolver
pub fn execute(action: &Action, roster: &Roster, stream: &mut RandomStream, config: &CombatConfig) -> Resolution {
    let Some(actor) = roster.get(action.actor) else {
        return Resolution::skipped(SkipReason::ActorDead);
    };
    let Some(target) = roster.get(action.target) else {
        return Resolution::skipped(SkipReason::TargetUnavailable);
    };
    match action.kind {
        ActionKind::Attack | ActionKind::SpecialAttack => {
            resolve_attack(actor, target, &action.weapon, stream, config)
        }
        ActionKind::Heal => resolve_heal(actor, target, &action.weapon, stream),
    }
}
