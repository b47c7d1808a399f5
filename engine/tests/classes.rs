use encounter_engine::combat::character_attack;
use encounter_engine::{
    Character, ChallengeTier, ClassActions, ClassRegistry, Combatant, DamageDice, Dice, Monster,
    ADVENTURER,
};

fn rat() -> Monster {
    let mut m = Monster::new("Rat", ChallengeTier::Normal, 10, 20, 0, DamageDice::new(1, 4), "Bite");
    m.init_hp();
    m
}

#[test]
fn adventurer_prepare_and_reverse_use_mind() {
    let registry = ClassRegistry::default();
    let actions = registry.actions(ADVENTURER);
    let mut c = Character::new("Ivy", "sam", 0, [0, 2, 0], ADVENTURER);

    actions.prepare(&mut c);
    assert_eq!(c.spirit, 1);
    actions.reverse_prepare(&mut c);
    // Restored from mind, so it lands on 1 rather than 0.
    assert_eq!(c.spirit, 1);
}

#[test]
fn adventurer_rolls() {
    let registry = ClassRegistry::default();
    let actions = registry.actions(ADVENTURER);
    let c = Character::new("Tobin", "sam", 0, [2, -1, 3], ADVENTURER);
    let mut dice = Dice::from_scripted(vec![7, 4, 6]);

    assert_eq!(actions.roll_initiative(&c, &mut dice), Some(11));
    assert_eq!(actions.roll_attack(&c, &mut dice), Some(6));
    assert_eq!(actions.roll_healing(&c, &mut dice), Some(5));
}

#[test]
fn unknown_class_does_nothing() {
    let registry = ClassRegistry::default();
    let mut bard = Character::new("Lute", "kim", 0, [1, 1, 1], "Bard");
    bard.init_hp();
    let actions = registry.actions(&bard.class);

    actions.prepare(&mut bard);
    actions.reverse_prepare(&mut bard);
    assert_eq!(bard.spirit, 1);

    let mut dice = Dice::from_scripted(vec![9, 9]);
    assert_eq!(actions.roll_initiative(&bard, &mut dice), None);
    assert_eq!(actions.roll_healing(&bard, &mut dice), None);

    let mut monsters = vec![rat()];
    assert!(character_attack(&bard, &mut monsters, &registry, &mut dice, 1, 0).is_none());
    assert_eq!(monsters[0].current_hp(), 20);
}

fn brute_attack(c: &Character, dice: &mut Dice) -> i32 {
    dice.roll(12) as i32 + 2 * c.body
}

#[test]
fn registered_classes_plug_into_combat() {
    let mut registry = ClassRegistry::default();
    registry.register(
        "Brute",
        ClassActions {
            attack: Some(brute_attack),
            ..ClassActions::NONE
        },
    );
    assert!(registry.is_registered("Brute"));
    assert_eq!(registry.classes().collect::<Vec<_>>(), vec![ADVENTURER, "Brute"]);

    let mut brute = Character::new("Grug", "kim", 0, [1, 0, 0], "Brute");
    brute.init_hp();
    let mut monsters = vec![rat()];
    let mut dice = Dice::from_scripted(vec![5, 7]);

    let report = character_attack(&brute, &mut monsters, &registry, &mut dice, 1, 0).unwrap();
    assert_eq!(report.damage, 9);
    assert_eq!(monsters[0].current_hp(), 11);

    // Everything else stays a no-op.
    let spirit = brute.spirit;
    registry.actions("Brute").prepare(&mut brute);
    assert_eq!(brute.spirit, spirit);
}
