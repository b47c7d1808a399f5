use tracing::debug;

use crate::character::Character;
use crate::classes::ClassRegistry;
use crate::combatant::Combatant;
use crate::monster::Monster;
use crate::Dice;

/// Roll initiative for both sides.
///
/// Characters roll through their class hook; a class without one keeps 0.
/// Monsters roll `d12 + 1 + base`, overwriting the base modifier.
pub fn roll_initiative(
    party: &mut [Character],
    monsters: &mut [Monster],
    registry: &ClassRegistry,
    dice: &mut Dice,
) {
    for character in party.iter_mut() {
        let rolled = registry
            .actions(&character.class)
            .roll_initiative(character, dice)
            .unwrap_or(0);
        character.set_initiative(rolled);
    }
    for monster in monsters.iter_mut() {
        let rolled = dice.d12() as i32 + 1 + monster.initiative;
        monster.set_initiative(rolled);
    }
}

/// Sort each side by descending initiative (stable) and merge them into one
/// sequence of turn slots `0..party + monsters`.
///
/// A character goes first only when its initiative is strictly higher; ties
/// favour the monster.
pub fn assign_turn_order(party: &mut [Character], monsters: &mut [Monster]) {
    party.sort_by(|a, b| b.initiative().cmp(&a.initiative()));
    monsters.sort_by(|a, b| b.initiative().cmp(&a.initiative()));

    let (mut c, mut m) = (0, 0);
    for slot in 0..party.len() + monsters.len() {
        let character_next = match (party.get(c), monsters.get(m)) {
            (Some(ch), Some(mo)) => ch.initiative() > mo.initiative(),
            (Some(_), None) => true,
            (None, _) => false,
        };
        if character_next {
            party[c].set_turn_slot(slot);
            debug!(slot, name = %party[c].name, initiative = party[c].initiative, "turn slot");
            c += 1;
        } else {
            monsters[m].set_turn_slot(slot);
            debug!(slot, name = %monsters[m].name, initiative = monsters[m].initiative, "turn slot");
            m += 1;
        }
    }
}

/// Roll initiative, then assign turn slots.
pub fn schedule(
    party: &mut [Character],
    monsters: &mut [Monster],
    registry: &ClassRegistry,
    dice: &mut Dice,
) {
    roll_initiative(party, monsters, registry, dice);
    assign_turn_order(party, monsters);
}
