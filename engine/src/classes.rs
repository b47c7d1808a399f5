//! Per-class behaviour, looked up by the character's class tag.
//!
//! Each class registers a bundle of hooks. A tag with no registered bundle, or
//! a bundle with a hook left empty, resolves to a no-op: the character simply
//! skips that step.

use indexmap::IndexMap;
use tracing::trace;

use crate::character::Character;
use crate::Dice;

pub const ADVENTURER: &str = "Adventurer";

/// Stat change applied before an encounter, or undone after the short rest.
pub type StatHook = fn(&mut Character);
/// A roll derived from the character's stats.
pub type RollHook = fn(&Character, &mut Dice) -> i32;

#[derive(Clone, Copy, Debug, Default)]
pub struct ClassActions {
    /// Once per encounter, before initiative.
    pub prepare: Option<StatHook>,
    /// Initiative roll. Classes without one keep initiative 0.
    pub initiative: Option<RollHook>,
    /// Unmodified damage roll for the character's turn.
    pub attack: Option<RollHook>,
    /// Healing rolled during the short rest.
    pub short_rest: Option<RollHook>,
    /// Runs after the short rest to undo `prepare`.
    pub reverse_prepare: Option<StatHook>,
}

static NO_ACTIONS: ClassActions = ClassActions::NONE;

impl ClassActions {
    pub const NONE: Self = Self {
        prepare: None,
        initiative: None,
        attack: None,
        short_rest: None,
        reverse_prepare: None,
    };

    pub fn prepare(&self, character: &mut Character) {
        match self.prepare {
            Some(hook) => hook(character),
            None => trace!(character = %character.name, "no preparation action"),
        }
    }

    pub fn roll_initiative(&self, character: &Character, dice: &mut Dice) -> Option<i32> {
        self.initiative.map(|hook| hook(character, dice))
    }

    pub fn roll_attack(&self, character: &Character, dice: &mut Dice) -> Option<i32> {
        self.attack.map(|hook| hook(character, dice))
    }

    pub fn roll_healing(&self, character: &Character, dice: &mut Dice) -> Option<i32> {
        self.short_rest.map(|hook| hook(character, dice))
    }

    pub fn reverse_prepare(&self, character: &mut Character) {
        match self.reverse_prepare {
            Some(hook) => hook(character),
            None => trace!(character = %character.name, "nothing to reverse"),
        }
    }
}

/// Class tag to hook bundle, in registration order.
#[derive(Clone, Debug)]
pub struct ClassRegistry {
    classes: IndexMap<String, ClassActions>,
}

impl ClassRegistry {
    pub fn empty() -> Self {
        Self { classes: IndexMap::new() }
    }

    pub fn register(&mut self, class: impl Into<String>, actions: ClassActions) -> &mut Self {
        self.classes.insert(class.into(), actions);
        self
    }

    /// Hooks for `class`, or the no-op bundle when it is not registered.
    pub fn actions(&self, class: &str) -> &ClassActions {
        self.classes.get(class).unwrap_or(&NO_ACTIONS)
    }

    pub fn is_registered(&self, class: &str) -> bool {
        self.classes.contains_key(class)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }
}

impl Default for ClassRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(ADVENTURER, adventurer());
        registry
    }
}

/// The starting class: +1 spirit while preparing, d6 + body damage, d8 + mind
/// healing.
pub fn adventurer() -> ClassActions {
    ClassActions {
        prepare: Some(adventurer_prepare),
        initiative: Some(adventurer_initiative),
        attack: Some(adventurer_attack),
        short_rest: Some(adventurer_healing),
        reverse_prepare: Some(adventurer_reverse),
    }
}

fn adventurer_prepare(c: &mut Character) {
    c.spirit += 1;
}

fn adventurer_initiative(c: &Character, dice: &mut Dice) -> i32 {
    dice.d12() as i32 + 1 + c.spirit
}

fn adventurer_attack(c: &Character, dice: &mut Dice) -> i32 {
    dice.d6() as i32 + c.body
}

fn adventurer_healing(c: &Character, dice: &mut Dice) -> i32 {
    dice.d8() as i32 + c.mind
}

// Reads mind, not spirit. Kept as shipped.
fn adventurer_reverse(c: &mut Character) {
    c.spirit = c.mind - 1;
}
