use encounter_engine::store::{CharacterStore, MemoryStore};
use encounter_engine::{
    play_adventure, Adventure, AdventureError, AdventureOutcome, AdventureRun, ChallengeTier,
    Character, ClassRegistry, Combatant, DamageDice, Dice, Encounter, Event, Monster, Party,
    RosterError, StoreError, ADVENTURER,
};

fn member(name: &str, xp: u32, body: i32) -> Character {
    Character::new(name, "p", xp, [body, 0, 0], ADVENTURER)
}

fn slime() -> Monster {
    Monster::new("Slime", ChallengeTier::Normal, 50, 1, 0, DamageDice::new(1, 4), "Acid")
}

fn encounter(monster: Monster, quantity: u32) -> Encounter {
    let mut e = Encounter::new();
    e.add_monster(&monster, quantity).unwrap();
    e
}

fn slime_pit() -> Adventure {
    Adventure::new("Slime Pit", vec![encounter(slime(), 1)]).unwrap()
}

// Initiative 12, 11, 10 against the slime's 2; Aria then hits for 3.
const SLIME_SCRIPT: [u32; 6] = [10, 9, 8, 1, 5, 3];

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn member_named<'a>(party: &'a [Character], name: &str) -> &'a Character {
    party.iter().find(|c| c.name == name).unwrap()
}

#[test]
fn single_encounter_victory() {
    let registry = ClassRegistry::default();
    let party = Party::assemble(vec![member("A", 0, 0), member("B", 0, 0), member("C", 0, 0)])
        .unwrap();
    let mut run = AdventureRun::new(&slime_pit(), party, &registry);
    let mut dice = Dice::from_scripted(SLIME_SCRIPT.to_vec());
    let mut events = Vec::new();

    let outcome = run.play(&mut dice, |e| events.push(e.clone()));

    assert_eq!(outcome, AdventureOutcome::Victory);
    assert_eq!(run.encounters_cleared(), 1);
    for c in run.party() {
        assert_eq!(c.xp, 50);
        assert_eq!(c.current_hp(), 10);
        assert_eq!(c.max_hp(), 10);
        assert_eq!(c.spirit, -1);
    }
    assert!(events.contains(&Event::EncounterWon { index: 0, xp: 50 }));
    assert!(matches!(events.last(), Some(Event::AdventureWon { name }) if name == "Slime Pit"));

    let prepared = events
        .iter()
        .filter(|e| matches!(e, Event::Prepared { spirit: 1, .. }))
        .count();
    assert_eq!(prepared, 3);
}

#[test]
fn finished_run_replays_nothing() {
    let registry = ClassRegistry::default();
    let party = Party::assemble(vec![member("A", 0, 0), member("B", 0, 0), member("C", 0, 0)])
        .unwrap();
    let mut run = AdventureRun::new(&slime_pit(), party, &registry);
    let mut dice = Dice::from_scripted(SLIME_SCRIPT.to_vec());
    assert_eq!(run.play(&mut dice, |_| {}), AdventureOutcome::Victory);
    assert_eq!(run.outcome(), Some(AdventureOutcome::Victory));

    let mut events = Vec::new();
    assert_eq!(run.play(&mut dice, |e| events.push(e.clone())), AdventureOutcome::Victory);
    assert!(events.is_empty());
    assert_eq!(run.encounters_cleared(), 1);
    assert!(run.party().iter().all(|c| c.xp == 50));
}

#[test]
fn defeat_stops_the_adventure() {
    let registry = ClassRegistry::default();
    let boss = Monster::new("Tyrant", ChallengeTier::Boss, 500, 100, 0, DamageDice::new(1, 8), "Crushing");
    let adventure =
        Adventure::new("Tyrant's Hall", vec![encounter(boss, 1), encounter(slime(), 2)]).unwrap();
    let party = Party::assemble(vec![member("A", 0, -1), member("B", 0, -1), member("C", 0, -1)])
        .unwrap();
    let mut run = AdventureRun::new(&adventure, party, &registry);
    // Party initiative 3 each, the boss 13 and then a critical 8.
    let mut dice = Dice::from_scripted(vec![1, 1, 1, 12, 10, 8]);
    let mut events = Vec::new();

    let outcome = run.play(&mut dice, |e| events.push(e.clone()));

    assert_eq!(outcome, AdventureOutcome::Defeat { encounter: 0 });
    assert_eq!(run.encounters_cleared(), 0);
    assert_eq!(run.play(&mut dice, |e| events.push(e.clone())), outcome);
    assert!(run.party().iter().all(|c| c.xp == 0 && c.current_hp() == 0));
    assert!(events.contains(&Event::PartyDefeated { index: 0 }));
    assert!(!events
        .iter()
        .any(|e| matches!(e, Event::EncounterStarted { index: 1, .. })));
    assert!(!events.iter().any(|e| matches!(e, Event::ExperienceGained { .. })));
}

#[test]
fn level_up_resets_hit_points_before_resting() {
    let registry = ClassRegistry::default();
    let party = Party::assemble(vec![member("A", 90, 0), member("B", 0, 0), member("C", 0, 0)])
        .unwrap();
    let mut run = AdventureRun::new(&slime_pit(), party, &registry);
    let mut dice = Dice::from_scripted(SLIME_SCRIPT.to_vec());
    let mut events = Vec::new();

    run.play(&mut dice, |e| events.push(e.clone()));

    let a = member_named(run.party(), "A");
    assert_eq!(a.xp, 140);
    assert_eq!(a.level(), 2);
    assert_eq!(a.max_hp(), 20);
    assert_eq!(a.current_hp(), 20);
    assert!(events.iter().any(|e| matches!(
        e,
        Event::ExperienceGained { name, leveled_up: true, level: 2, .. } if name == "A"
    )));
}

#[test]
fn unconscious_members_do_not_heal() {
    let registry = ClassRegistry::default();
    let rat = Monster::new("Rat", ChallengeTier::Normal, 10, 1, 0, DamageDice::new(1, 6), "Bite");
    let adventure = Adventure::new("Rat Hole", vec![encounter(rat, 1)]).unwrap();
    let party = Party::assemble(vec![member("A", 0, 0), member("B", 0, 0), member("C", 0, 0)])
        .unwrap();
    let mut run = AdventureRun::new(&adventure, party, &registry);
    // The rat goes first and crits A for 10; A's slot passes, B kills the rat.
    let mut dice = Dice::from_scripted(vec![1, 1, 1, 12, 10, 5, 1, 5, 3]);
    let mut events = Vec::new();

    let outcome = run.play(&mut dice, |e| events.push(e.clone()));

    assert_eq!(outcome, AdventureOutcome::Victory);
    let a = member_named(run.party(), "A");
    assert_eq!(a.current_hp(), 0);
    assert_eq!(a.xp, 10);
    assert!(events.contains(&Event::ShortRest {
        name: "A".into(),
        healed: 0,
        current_hp: 0,
        max_hp: 10,
    }));
    assert!(run
        .party()
        .iter()
        .filter(|c| c.name != "A")
        .all(|c| c.is_conscious()));
}

fn slime_store() -> MemoryStore {
    let characters = vec![member("A", 0, 0), member("B", 0, 0), member("C", 0, 0)];
    MemoryStore::new(characters, vec![slime()], vec![slime_pit()])
}

#[test]
fn victory_writes_back_experience_only() {
    let registry = ClassRegistry::default();
    let mut store = slime_store();
    let mut dice = Dice::from_scripted(SLIME_SCRIPT.to_vec());

    let report = play_adventure(
        &mut store,
        "Slime Pit",
        &names(&["A", "B", "C"]),
        &registry,
        &mut dice,
        |_| {},
    )
    .unwrap();

    assert_eq!(report.outcome, AdventureOutcome::Victory);
    for name in ["A", "B", "C"] {
        let stored = store.character(name).unwrap();
        assert_eq!(stored.xp, 50);
        assert_eq!(stored.spirit, 0);
        assert_eq!(member_named(&report.party, name).spirit, -1);
    }
}

#[test]
fn defeat_leaves_the_store_untouched() {
    let registry = ClassRegistry::default();
    let boss = Monster::new("Tyrant", ChallengeTier::Boss, 500, 100, 0, DamageDice::new(1, 8), "Crushing");
    let adventure = Adventure::new("Tyrant's Hall", vec![encounter(boss, 1)]).unwrap();
    let mut store = slime_store();
    store.adventures.push(adventure);
    let before = store.clone();
    let mut dice = Dice::from_scripted(vec![1, 1, 1, 12, 10, 8]);

    let report = play_adventure(
        &mut store,
        "Tyrant's Hall",
        &names(&["A", "B", "C"]),
        &registry,
        &mut dice,
        |_| {},
    )
    .unwrap();

    assert_eq!(report.outcome, AdventureOutcome::Defeat { encounter: 0 });
    assert_eq!(store.characters, before.characters);
}

#[test]
fn play_adventure_reports_lookup_and_roster_errors() {
    let registry = ClassRegistry::default();
    let mut store = slime_store();
    let mut dice = Dice::from_seed(7);

    let err = play_adventure(&mut store, "Nowhere", &names(&["A", "B", "C"]), &registry, &mut dice, |_| {})
        .unwrap_err();
    assert!(matches!(
        err,
        AdventureError::Store(StoreError::NotFound { kind: "adventure", .. })
    ));

    let err = play_adventure(&mut store, "Slime Pit", &names(&["A", "Z", "C"]), &registry, &mut dice, |_| {})
        .unwrap_err();
    assert!(matches!(
        err,
        AdventureError::Store(StoreError::NotFound { kind: "character", ref name }) if name == "Z"
    ));

    let err = play_adventure(&mut store, "Slime Pit", &names(&["A", "B"]), &registry, &mut dice, |_| {})
        .unwrap_err();
    assert!(matches!(err, AdventureError::Roster(RosterError::PartySize(2))));
}
