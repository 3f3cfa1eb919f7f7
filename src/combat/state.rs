//! Combat session state
//!
//! A [`CombatSession`] owns everything one encounter needs: the roster, the
//! fixed initiative order, the log, the seed and the lifecycle status. Only
//! construction can fail; once built, a session always runs to a terminal
//! status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::combat::combatant::Combatant;
use crate::combat::initiative::TurnOrder;
use crate::combat::log::{Round, TurnRecord};
use crate::combat::policy::{Action, ActionScript};
use crate::combat::resolution::Resolution;
use crate::combat::rng::{default_seed, RandomStream, StreamContext};
use crate::combat::roster::Roster;
use crate::core::config::CombatConfig;
use crate::core::error::{CombatError, Result};
use crate::core::types::{CombatantId, SessionId, Side, TurnNumber};

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombatStatus {
    Pending,
    Active,
    Victory,
    Defeat,
}

impl CombatStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, CombatStatus::Victory | CombatStatus::Defeat)
    }
}

impl fmt::Display for CombatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombatStatus::Pending => write!(f, "pending"),
            CombatStatus::Active => write!(f, "active"),
            CombatStatus::Victory => write!(f, "victory"),
            CombatStatus::Defeat => write!(f, "defeat"),
        }
    }
}

/// State of an optional opening round
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusRound {
    pub requested: bool,
    pub completed: bool,
}

impl BonusRound {
    fn requested(requested: bool) -> Self {
        Self {
            requested,
            completed: false,
        }
    }

    /// Requested and not yet run
    pub fn is_due(&self) -> bool {
        self.requested && !self.completed
    }
}

/// Caller-supplied knobs for a new session
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub room_id: String,
    /// Replay seed; a fresh one is generated when absent
    pub seed: Option<String>,
    pub ambush: bool,
    pub surprise: bool,
    pub script: ActionScript,
    pub config: CombatConfig,
}

impl SessionOptions {
    pub fn new(room_id: &str) -> Self {
        Self {
            room_id: room_id.to_string(),
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: &str) -> Self {
        self.seed = Some(seed.to_string());
        self
    }
}

/// One encounter, from validation to verdict
#[derive(Debug, Clone)]
pub struct CombatSession {
    id: SessionId,
    room_id: String,
    seed: String,
    roster: Roster,
    order: TurnOrder,
    cursor: usize,
    turns_taken: TurnNumber,
    log: Vec<TurnRecord>,
    ambush: BonusRound,
    surprise: BonusRound,
    status: CombatStatus,
    stalemate: bool,
    script: ActionScript,
    config: CombatConfig,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

impl CombatSession {
    /// Validate the inputs and compute initiative
    pub fn new(party: Vec<Combatant>, monsters: Vec<Combatant>, options: SessionOptions) -> Result<Self> {
        if options.ambush && options.surprise {
            return Err(CombatError::ConflictingOpeners);
        }
        if party.is_empty() {
            return Err(CombatError::EmptySide(Side::Party));
        }
        if monsters.is_empty() {
            return Err(CombatError::EmptySide(Side::Monster));
        }
        options.config.validate()?;

        let roster = Roster::new(party, monsters)?;
        let seed = options.seed.unwrap_or_else(default_seed);

        let mut stream = RandomStream::derive(&seed, &StreamContext::initiative(&options.room_id));
        let order = TurnOrder::compute(
            &roster,
            options.config.tie_break,
            &mut stream,
            options.config.attack_die,
        );

        let session = Self {
            id: SessionId::new(),
            room_id: options.room_id,
            seed,
            roster,
            order,
            cursor: 0,
            turns_taken: 0,
            log: Vec::new(),
            ambush: BonusRound::requested(options.ambush),
            surprise: BonusRound::requested(options.surprise),
            status: CombatStatus::Pending,
            stalemate: false,
            script: options.script,
            config: options.config,
            started_at: None,
            ended_at: None,
        };

        tracing::debug!(
            session = %session.id,
            room = %session.room_id,
            order = ?session.order.ids(),
            "initiative computed"
        );

        Ok(session)
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn turn_order(&self) -> &TurnOrder {
        &self.order
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Main-loop turns executed so far
    pub fn turns_taken(&self) -> TurnNumber {
        self.turns_taken
    }

    pub fn log(&self) -> &[TurnRecord] {
        &self.log
    }

    pub fn ambush(&self) -> BonusRound {
        self.ambush
    }

    pub fn surprise(&self) -> BonusRound {
        self.surprise
    }

    pub fn status(&self) -> CombatStatus {
        self.status
    }

    pub fn is_stalemate(&self) -> bool {
        self.stalemate
    }

    pub fn script(&self) -> &ActionScript {
        &self.script
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Move from `Pending` to `Active`, then settle an already-decided fight
    pub fn begin(&mut self) {
        if self.status == CombatStatus::Pending {
            self.status = CombatStatus::Active;
            self.started_at = Some(Utc::now());
        }
        self.refresh_status();
    }

    /// Verdict the current roster implies, ignoring lifecycle
    pub fn evaluate_status(&self) -> Option<CombatStatus> {
        if self.roster.living_count(Side::Monster) == 0 {
            Some(CombatStatus::Victory)
        } else if self.roster.living_count(Side::Party) == 0 {
            Some(CombatStatus::Defeat)
        } else {
            None
        }
    }

    /// Re-check termination; terminal statuses never change
    pub fn refresh_status(&mut self) -> CombatStatus {
        if self.status == CombatStatus::Active {
            if let Some(verdict) = self.evaluate_status() {
                self.finish(verdict);
            }
        }
        self.status
    }

    /// End an active session that hit the turn ceiling as a stalemate defeat
    pub(crate) fn force_stalemate(&mut self) {
        if self.status == CombatStatus::Active {
            self.stalemate = true;
            self.finish(CombatStatus::Defeat);
        }
    }

    fn finish(&mut self, status: CombatStatus) {
        self.status = status;
        self.ended_at = Some(Utc::now());
    }

    pub(crate) fn complete_ambush(&mut self) {
        self.ambush.completed = true;
    }

    pub(crate) fn complete_surprise(&mut self) {
        self.surprise.completed = true;
    }

    /// Record a resolved action and swap in its updates
    ///
    /// The record is built from the pre-action roster; the new roster only
    /// replaces the old one once both are ready.
    pub(crate) fn commit(
        &mut self,
        turn: TurnNumber,
        round: Round,
        actor: CombatantId,
        action: Option<Action>,
        resolution: Resolution,
    ) {
        let Some(before) = self.roster.get(actor) else {
            tracing::warn!(actor = %actor, "commit for unknown combatant ignored");
            return;
        };
        let target = action.as_ref().and_then(|a| self.roster.get(a.target));
        let resource_after = resolution
            .updates
            .iter()
            .find(|c| c.id == actor)
            .map_or(before.resource, |c| c.resource);

        let record = TurnRecord {
            turn,
            round,
            actor_id: actor,
            actor_name: before.name.clone(),
            target_id: target.map(|t| t.id),
            target_name: target.map(|t| t.name.clone()),
            actor_resource_before: before.resource,
            actor_resource_after: resource_after,
            action,
            outcome: resolution.outcome,
        };

        tracing::debug!(turn, round = ?round, "{}", record.describe());

        let next = self.roster.with_updates(resolution.updates);
        self.roster = next;
        self.log.push(record);
    }

    /// Close out a main-loop turn taken by `actor`
    pub(crate) fn advance(&mut self, actor: CombatantId) {
        self.turns_taken += 1;
        self.cursor = self.order.next_cursor(&self.roster, actor);
    }

    pub(crate) fn into_parts(self) -> SessionParts {
        SessionParts {
            id: self.id,
            room_id: self.room_id,
            seed: self.seed,
            roster: self.roster,
            turns_taken: self.turns_taken,
            log: self.log,
            status: self.status,
            stalemate: self.stalemate,
            started_at: self.started_at,
            ended_at: self.ended_at,
        }
    }
}

/// What a finished session hands to the result builder
pub(crate) struct SessionParts {
    pub id: SessionId,
    pub room_id: String,
    pub seed: String,
    pub roster: Roster,
    pub turns_taken: TurnNumber,
    pub log: Vec<TurnRecord>,
    pub status: CombatStatus,
    pub stalemate: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}
