use serde::Serialize;
use tracing::debug;

use crate::character::Character;
use crate::classes::ClassRegistry;
use crate::combatant::Combatant;
use crate::events::{ActionReport, Side};
use crate::monster::Monster;
use crate::Dice;

/// Sides on the hit die rolled for every attack.
pub const HIT_DIE: u32 = 10;

/// Result of the hit die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HitOutcome {
    /// Natural 1: the attack deals nothing.
    Fail,
    Normal,
    /// Natural 10: damage is doubled.
    Critical,
}

impl HitOutcome {
    pub fn from_roll(hit: u32) -> Self {
        match hit {
            1 => Self::Fail,
            HIT_DIE => Self::Critical,
            _ => Self::Normal,
        }
    }

    pub fn apply(self, damage: i32) -> i32 {
        match self {
            Self::Fail => 0,
            Self::Normal => damage,
            Self::Critical => damage * 2,
        }
    }
}

/// Index of the live monster with the lowest current HP; the first one wins ties.
pub fn lowest_hp_target(monsters: &[Monster]) -> Option<usize> {
    monsters
        .iter()
        .enumerate()
        .min_by_key(|(_, m)| m.current_hp())
        .map(|(idx, _)| idx)
}

/// A character's turn: roll the hit die and the class damage, then hit the
/// weakest monster. `None` when the class has no attack or nothing is left to hit.
pub fn character_attack(
    attacker: &Character,
    monsters: &mut [Monster],
    registry: &ClassRegistry,
    dice: &mut Dice,
    round: u32,
    slot: usize,
) -> Option<ActionReport> {
    let actions = registry.actions(&attacker.class);
    if actions.attack.is_none() {
        return None;
    }
    let idx = lowest_hp_target(monsters)?;

    let hit_die = dice.roll(HIT_DIE);
    let outcome = HitOutcome::from_roll(hit_die);
    let rolled = actions.roll_attack(attacker, dice).unwrap_or(0).max(0);
    let damage = outcome.apply(rolled);

    let target = &mut monsters[idx];
    let felled = target.take_hit(damage);
    debug!(
        actor = %attacker.name,
        target = %target.name,
        hit_die,
        damage,
        hp = target.current_hp(),
        "character attacks"
    );

    Some(ActionReport {
        round,
        slot,
        actor: attacker.name.clone(),
        side: Side::Party,
        hit_die,
        outcome,
        damage,
        damage_type: None,
        targets: vec![target.name.clone()],
        felled: if felled { vec![target.name.clone()] } else { vec![] },
    })
}

/// A monster's turn. Bosses hit every conscious party member; anything else
/// hits one conscious member chosen uniformly at random.
pub fn monster_attack(
    attacker: &Monster,
    party: &mut [Character],
    dice: &mut Dice,
    round: u32,
    slot: usize,
) -> ActionReport {
    let hit_die = dice.roll(HIT_DIE);
    let outcome = HitOutcome::from_roll(hit_die);
    let damage = outcome.apply(dice.roll_damage(attacker.damage_dice));

    let conscious: Vec<usize> = party
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_conscious())
        .map(|(idx, _)| idx)
        .collect();
    let victims = if attacker.is_boss() || conscious.is_empty() {
        conscious
    } else {
        vec![conscious[dice.pick(conscious.len())]]
    };

    let mut targets = Vec::with_capacity(victims.len());
    let mut felled = Vec::new();
    for idx in victims {
        let victim = &mut party[idx];
        if victim.take_hit(damage) {
            felled.push(victim.name.clone());
        }
        targets.push(victim.name.clone());
    }
    debug!(actor = %attacker.name, hit_die, damage, ?targets, "monster attacks");

    ActionReport {
        round,
        slot,
        actor: attacker.name.clone(),
        side: Side::Monsters,
        hit_die,
        outcome,
        damage,
        damage_type: Some(attacker.damage_type.clone()),
        targets,
        felled,
    }
}
