use std::fs;

use encounter_engine::api::{describe, simulate_adventure, simulate_adventure_many};
use encounter_engine::config::AdventureConfig;
use encounter_engine::content::{BUILTIN_ADVENTURES, BUILTIN_CHARACTERS, BUILTIN_MONSTERS};
use encounter_engine::store::{
    CharacterStore, JsonStore, ADVENTURES_FILE, CHARACTERS_FILE, MONSTERS_FILE,
};
use encounter_engine::{ActionReport, AdventureOutcome, Event, HitOutcome, Side};
use tempfile::tempdir;

fn rat_cellar(seed: u64) -> AdventureConfig {
    let mut cfg = AdventureConfig::new("Rat Cellar", vec!["Aria".into(), "Brom".into(), "Ivy".into()]);
    cfg.seed = Some(seed);
    cfg
}

#[test]
fn adventure_with_builtins_runs() {
    let res = simulate_adventure(rat_cellar(2025)).unwrap();
    assert_eq!(res.adventure, "Rat Cellar");
    assert_eq!(res.party.len(), 3);
    assert!(res.log[0].starts_with("[ENCOUNTER] 1/1: 3x Giant Rat"));
    match res.outcome {
        AdventureOutcome::Victory => assert_eq!(res.encounters_cleared, 1),
        AdventureOutcome::Defeat { encounter } => assert_eq!(encounter, 0),
    }
}

#[test]
fn same_seed_same_log() {
    let a = simulate_adventure(rat_cellar(11)).unwrap();
    let b = simulate_adventure(rat_cellar(11)).unwrap();
    assert_eq!(a.log, b.log);
}

#[test]
fn adventure_many_summary_makes_sense() {
    let mut cfg = AdventureConfig::new(
        "Ogre's Den",
        vec!["Aria".into(), "Brom".into(), "Ivy".into(), "Tobin".into()],
    );
    cfg.seed = Some(1);
    let stats = simulate_adventure_many(cfg, 50).unwrap();
    assert_eq!(stats.samples, 50);
    assert_eq!(stats.victories + stats.defeats, 50);
    assert_eq!(stats.defeats_by_encounter.len(), 3);
    assert_eq!(stats.defeats_by_encounter.iter().sum::<u32>(), stats.defeats);
    assert!((0.0..=3.0).contains(&stats.avg_encounters_cleared));
}

#[test]
fn unknown_adventure_is_an_error() {
    let cfg = AdventureConfig::new("Dragon Peak", vec!["Aria".into(), "Brom".into(), "Ivy".into()]);
    assert!(simulate_adventure(cfg).is_err());
}

#[test]
fn yaml_config_loads() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.yaml");
    fs::write(
        &path,
        "adventure: Goblin Ambush\nparty: [Aria, Brom, Ivy, Wren]\nseed: 9\nsave: false\n",
    )
    .unwrap();
    let cfg = AdventureConfig::from_path(&path).unwrap();
    assert_eq!(cfg.seed, Some(9));
    assert!(!cfg.save);
    assert!(simulate_adventure(cfg).is_ok());

    let bad = dir.path().join("run.toml");
    fs::write(&bad, "adventure = 'x'").unwrap();
    assert!(AdventureConfig::from_path(&bad).is_err());
}

#[test]
fn experience_is_saved_only_after_victory() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(CHARACTERS_FILE), BUILTIN_CHARACTERS).unwrap();
    fs::write(dir.path().join(MONSTERS_FILE), BUILTIN_MONSTERS).unwrap();
    fs::write(dir.path().join(ADVENTURES_FILE), BUILTIN_ADVENTURES).unwrap();
    let before = JsonStore::open(dir.path()).character("Brom").unwrap();

    let mut cfg = rat_cellar(3);
    cfg.data_dir = Some(dir.path().display().to_string());
    let res = simulate_adventure(cfg).unwrap();

    let after = JsonStore::open(dir.path()).character("Brom").unwrap();
    let brom = res.party.iter().find(|m| m.name == "Brom").unwrap();
    match res.outcome {
        AdventureOutcome::Victory => assert_eq!(after.xp, brom.xp),
        AdventureOutcome::Defeat { .. } => assert_eq!(after, before),
    }
    assert_eq!(after.spirit, before.spirit);
}

#[test]
fn attack_line_format() {
    let event = Event::Action(ActionReport {
        round: 2,
        slot: 0,
        actor: "Ogre".into(),
        side: Side::Monsters,
        hit_die: 10,
        outcome: HitOutcome::Critical,
        damage: 12,
        damage_type: Some("Bludgeoning".into()),
        targets: vec!["Aria".into(), "Brom".into()],
        felled: vec!["Brom".into()],
    });
    insta::assert_snapshot!(
        describe(&event).unwrap(),
        @"[ATTACK][Ogre] hit=10 CRIT! dmg=12 [Bludgeoning] → Aria, Brom ✖ Brom down"
    );
    assert_eq!(describe(&Event::RoundEnded { round: 2 }), None);
}
