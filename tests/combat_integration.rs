//! Combat integration tests
//!
//! End-to-end encounters through `run_combat`, covering the reference
//! scenarios plus the failure paths a running session must absorb.

use async_trait::async_trait;

use dungeon_combat::combat::{
    run_combat, ActionKind, ActionScript, CombatResult, CombatSession, CombatStatus, Combatant,
    DiceExpr, NoEquipment, Round, Scenario, ScriptedAction, SessionOptions, SkipReason,
    StaticArmory, TurnOutcome, TurnRecord, WeaponCategory, WeaponDescriptor, WeaponLookup,
};
use dungeon_combat::core::error::WeaponLookupError;
use dungeon_combat::core::types::{CombatantId, Role};

fn warrior() -> Combatant {
    Combatant::new(CombatantId(1), "Brakka", Role::Warrior, 12, 15)
}

fn goblin() -> Combatant {
    Combatant::new(CombatantId(10), "Goblin", Role::Monster, 7, 13)
}

fn longsword_armory() -> StaticArmory {
    let mut armory = StaticArmory::new();
    armory.equip(
        CombatantId(1),
        WeaponDescriptor::new("Longsword", DiceExpr::parse("1d8").unwrap(), 0, WeaponCategory::MeleeStrength),
    );
    armory
}

async fn duel(seed: &str) -> CombatResult {
    let session = CombatSession::new(
        vec![warrior()],
        vec![goblin()],
        SessionOptions::new("cellar").with_seed(seed),
    )
    .unwrap();
    run_combat(session, &longsword_armory()).await
}

fn damage_trace(result: &CombatResult) -> Vec<(u32, u32)> {
    result
        .log
        .iter()
        .map(|r| (r.actor_id.0, r.outcome.damage()))
        .collect()
}

#[tokio::test]
async fn test_same_seed_replays_damage() {
    let first = duel("s1").await;
    let second = duel("s1").await;

    assert_eq!(damage_trace(&first), damage_trace(&second));
    assert_eq!(first.log, second.log);
    assert_eq!(first.status, second.status);
    assert_eq!(first.final_party, second.final_party);
    assert_eq!(first.final_monsters, second.final_monsters);
    assert_ne!(first.session_id, second.session_id);
}

#[tokio::test]
async fn test_duel_ends_with_one_side_down() {
    let result = duel("s1").await;
    assert!(result.status.is_terminal());
    assert!(!result.stalemate);
    match result.status {
        CombatStatus::Victory => {
            assert_eq!(result.monster_survivors, 0);
            assert_eq!(result.party_survivors, 1);
        }
        CombatStatus::Defeat => {
            assert_eq!(result.party_survivors, 0);
            assert_eq!(result.monster_survivors, 1);
        }
        other => panic!("non-terminal status {}", other),
    }
}

#[tokio::test]
async fn test_ambush_lands_before_first_main_turn() {
    let mut options = SessionOptions::new("warren").with_seed("ambush");
    options.ambush = true;
    // No crits, so two 1d4 hits cannot drop the scout
    options.config.crit_multiplier = 1;
    let scout = Combatant::new(CombatantId(1), "Vex", Role::Rogue, 10, 14).with_scores(9, 17);
    let monsters = vec![
        Combatant::new(CombatantId(10), "Goblin", Role::Monster, 30, 13),
        Combatant::new(CombatantId(11), "Goblin", Role::Monster, 30, 13),
    ];
    let session = CombatSession::new(vec![scout], monsters, options).unwrap();
    let result = run_combat(session, &NoEquipment).await;

    let ambush: Vec<_> = result.log.iter().take_while(|r| r.round == Round::Ambush).collect();
    assert_eq!(ambush.len(), 2);
    assert_eq!(ambush[0].actor_id, CombatantId(10));
    assert_eq!(ambush[1].actor_id, CombatantId(11));

    let hp_before = |r: &TurnRecord| match r.outcome {
        TurnOutcome::Attack { target_hp_before, .. } => target_hp_before,
        _ => panic!("ambush records are attacks"),
    };
    let hp_after = |r: &TurnRecord| match r.outcome {
        TurnOutcome::Attack { target_hp_after, .. } => target_hp_after,
        _ => panic!("ambush records are attacks"),
    };
    assert_eq!(hp_before(ambush[0]), 10);
    assert_eq!(hp_before(ambush[1]), hp_after(ambush[0]));
    let total: u32 = ambush.iter().map(|r| r.outcome.damage()).sum();
    assert_eq!(hp_after(ambush[1]), 10 - total);
    assert!(hp_after(ambush[1]) > 0);

    let first_main = &result.log[2];
    assert_eq!(first_main.round, Round::Main);
    assert_eq!(first_main.turn, 1);
}

#[tokio::test]
async fn test_broke_mage_scripted_special_is_skipped() {
    let mage = Combatant::new(CombatantId(3), "Mira", Role::Mage, 8, 11)
        .with_scores(8, 18)
        .with_pool(0, 20);
    let ogre = Combatant::new(CombatantId(10), "Ogre", Role::Monster, 50, 12);

    let mut script = ActionScript::new();
    script.push(ScriptedAction {
        actor: CombatantId(3),
        turn: 1,
        kind: ActionKind::SpecialAttack,
        target: CombatantId(10),
    });
    let mut options = SessionOptions::new("tower").with_seed("broke");
    options.script = script;

    let session = CombatSession::new(vec![mage], vec![ogre], options).unwrap();
    let result = run_combat(session, &NoEquipment).await;

    let first = &result.log[0];
    assert_eq!(first.actor_id, CombatantId(3));
    assert_eq!(first.turn, 1);
    assert_eq!(
        first.outcome,
        TurnOutcome::skipped(SkipReason::InsufficientResource {
            required: 8,
            available: 0
        })
    );
    assert_eq!(first.actor_resource_before, 0);
    assert_eq!(first.actor_resource_after, 0);
    assert_eq!(first.outcome.damage(), 0);

    // The ogre's first swing sees it unhurt
    let ogre_hp: Vec<u32> = result
        .log
        .iter()
        .filter(|r| r.actor_id == CombatantId(10))
        .take(1)
        .filter_map(|r| match r.outcome {
            TurnOutcome::Attack { target_hp_before, .. } => Some(target_hp_before),
            _ => None,
        })
        .collect();
    assert!(ogre_hp.iter().all(|&hp| hp == 8));
    assert_eq!(result.final_monsters[0].max_hp, 50);
}

#[tokio::test]
async fn test_harmless_fighters_hit_the_ceiling() {
    let feather = WeaponDescriptor::new("Feather", DiceExpr::parse("0").unwrap(), 0, WeaponCategory::MeleeStrength);
    let mut armory = StaticArmory::new();
    armory.equip(CombatantId(1), feather.clone());
    armory.equip(CombatantId(10), feather);

    let session = CombatSession::new(
        vec![warrior()],
        vec![goblin()],
        SessionOptions::new("cellar").with_seed("stalemate"),
    )
    .unwrap();
    let result = run_combat(session, &armory).await;

    assert_eq!(result.status, CombatStatus::Defeat);
    assert!(result.stalemate);
    assert_eq!(result.turns_taken, 1000);
    assert_eq!(result.log.len(), 1000);
    assert_eq!(result.party_survivors, 1);
    assert_eq!(result.monster_survivors, 1);
    assert!(result.log.iter().all(|r| r.outcome.damage() == 0));
}

struct BrokenInventory;

#[async_trait]
impl WeaponLookup for BrokenInventory {
    async fn equipped_weapon(&self, _combatant: &Combatant) -> Result<Option<WeaponDescriptor>, WeaponLookupError> {
        Err(WeaponLookupError::Unavailable("connection refused".into()))
    }
}

#[tokio::test]
async fn test_failing_inventory_uses_role_defaults() {
    let build = || {
        CombatSession::new(
            vec![warrior()],
            vec![goblin()],
            SessionOptions::new("cellar").with_seed("fallback"),
        )
        .unwrap()
    };
    let broken = run_combat(build(), &BrokenInventory).await;
    let empty = run_combat(build(), &NoEquipment).await;

    assert!(broken.status.is_terminal());
    assert_eq!(broken.log, empty.log);
    for record in broken.log.iter().filter(|r| r.actor_id == CombatantId(1)) {
        assert_eq!(record.action.as_ref().unwrap().weapon.name, "Longsword");
    }
}

#[tokio::test]
async fn test_cleric_keeps_party_standing() {
    let mut options = SessionOptions::new("chapel").with_seed("mend");
    options.config.heal_ratio = 1.0;
    let party = vec![
        Combatant::new(CombatantId(1), "Brakka", Role::Warrior, 20, 15).with_hp(4),
        Combatant::new(CombatantId(2), "Ilse", Role::Cleric, 12, 14)
            .with_scores(10, 16)
            .with_pool(20, 20),
    ];
    let monsters = vec![Combatant::new(CombatantId(10), "Rat", Role::Monster, 40, 10)];
    let session = CombatSession::new(party, monsters, options).unwrap();
    let result = run_combat(session, &NoEquipment).await;

    // Ilse opens and patches up the wounded warrior
    let first = &result.log[0];
    assert_eq!(first.actor_id, CombatantId(2));
    assert_eq!(first.target_id, Some(CombatantId(1)));
    assert!(matches!(first.outcome, TurnOutcome::Heal { target_hp_before: 4, .. }));
    assert_eq!(first.actor_resource_after, 15);
}

#[tokio::test]
async fn test_scenario_file_runs() {
    let scenario = Scenario::load(std::path::Path::new(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/data/scenarios/goblin_ambush.toml"
    )))
    .unwrap();
    let mut options = scenario.session_options(Default::default());
    options.seed = Some("fixture".into());
    let session = scenario.build_session(options).unwrap();
    let result = run_combat(session, &scenario.armory()).await;

    assert!(result.status.is_terminal());
    assert_eq!(result.log[0].round, Round::Ambush);
    assert_eq!(result.final_party.len(), 4);
    assert_eq!(result.final_monsters.len(), 3);
    if result.status == CombatStatus::Victory {
        assert_eq!(result.experience, 100);
    }
}

#[test]
fn test_both_openers_rejected() {
    let mut options = SessionOptions::new("cellar");
    options.ambush = true;
    options.surprise = true;
    assert!(CombatSession::new(vec![warrior()], vec![goblin()], options).is_err());
}
