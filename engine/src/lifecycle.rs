use serde::Serialize;
use tracing::{info, warn};

use crate::character::{Character, Party};
use crate::classes::{ClassActions, ClassRegistry};
use crate::combat::{Battle, CombatStatus};
use crate::combatant::Combatant;
use crate::error::{AdventureError, StoreError};
use crate::events::{CombatantView, Event, Side};
use crate::initiative::schedule;
use crate::monster::{summarize, total_experience, Adventure, Monster};
use crate::store::{AdventureStore, CharacterStore};
use crate::Dice;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum AdventureOutcome {
    Victory,
    /// The party fell in encounter `encounter` (0-based).
    Defeat { encounter: usize },
}

/// One attempt at an adventure. Owns its party and monster copies for the
/// whole run; the session fields on them are thrown away with it.
pub struct AdventureRun<'r> {
    name: String,
    party: Vec<Character>,
    encounters: Vec<Vec<Monster>>,
    registry: &'r ClassRegistry,
    cleared: usize,
    outcome: Option<AdventureOutcome>,
}

impl<'r> AdventureRun<'r> {
    /// Copy the adventure's monsters and bring every combatant to full HP.
    pub fn new(adventure: &Adventure, party: Party, registry: &'r ClassRegistry) -> Self {
        let mut encounters: Vec<Vec<Monster>> = adventure
            .encounters()
            .iter()
            .map(|e| e.monsters.clone())
            .collect();
        for monster in encounters.iter_mut().flatten() {
            monster.init_hp();
        }
        let mut party = party.into_members();
        for character in party.iter_mut() {
            character.init_hp();
        }
        Self {
            name: adventure.name().to_string(),
            party,
            encounters,
            registry,
            cleared: 0,
            outcome: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn party(&self) -> &[Character] {
        &self.party
    }

    pub fn encounters_cleared(&self) -> usize {
        self.cleared
    }

    /// Set once `play` has reached victory or defeat.
    pub fn outcome(&self) -> Option<AdventureOutcome> {
        self.outcome
    }

    pub fn into_party(self) -> Vec<Character> {
        self.party
    }

    /// Play every encounter in order until the party wins them all or falls.
    /// A finished run returns its outcome again without emitting events.
    pub fn play(&mut self, dice: &mut Dice, mut observe: impl FnMut(&Event)) -> AdventureOutcome {
        if let Some(outcome) = self.outcome {
            return outcome;
        }
        let total = self.encounters.len();
        for index in self.cleared..total {
            let monsters = &mut self.encounters[index];
            // Awarded from the roster as it entered the fight.
            let xp = total_experience(monsters);
            observe(&Event::EncounterStarted {
                index,
                total,
                monsters: summarize(monsters),
            });

            for character in self.party.iter_mut() {
                self.registry.actions(&character.class).prepare(character);
                observe(&Event::Prepared {
                    name: character.name.clone(),
                    spirit: character.spirit,
                });
            }

            schedule(&mut self.party, monsters, self.registry, dice);
            observe(&Event::TurnOrder {
                order: turn_order(&self.party, monsters),
            });

            let status = Battle::new(&mut self.party, monsters, self.registry).run(dice, &mut observe);
            if status == CombatStatus::PartyDefeated {
                info!(adventure = %self.name, encounter = index, "party defeated");
                observe(&Event::PartyDefeated { index });
                let outcome = AdventureOutcome::Defeat { encounter: index };
                self.outcome = Some(outcome);
                return outcome;
            }

            self.cleared += 1;
            info!(adventure = %self.name, encounter = index, xp, "encounter won");
            observe(&Event::EncounterWon { index, xp });

            for character in self.party.iter_mut() {
                let actions = self.registry.actions(&character.class);
                let leveled_up = character.gain_xp(xp);
                observe(&Event::ExperienceGained {
                    name: character.name.clone(),
                    gained: xp,
                    total_xp: character.xp,
                    level: character.level(),
                    leveled_up,
                });
                let healed = short_rest(character, actions, leveled_up, dice);
                observe(&Event::ShortRest {
                    name: character.name.clone(),
                    healed,
                    current_hp: character.current_hp(),
                    max_hp: character.max_hp(),
                });
                actions.reverse_prepare(character);
            }
        }

        info!(adventure = %self.name, "adventure complete");
        observe(&Event::AdventureWon {
            name: self.name.clone(),
        });
        self.outcome = Some(AdventureOutcome::Victory);
        AdventureOutcome::Victory
    }
}

/// A level-up resets HP first; only a conscious character heals. Returns the
/// HP actually restored.
fn short_rest(
    character: &mut Character,
    actions: &ClassActions,
    leveled_up: bool,
    dice: &mut Dice,
) -> i32 {
    if leveled_up {
        character.init_hp();
    }
    if !character.is_conscious() {
        return 0;
    }
    match actions.roll_healing(character, dice) {
        Some(amount) => character.vitals.heal(amount),
        None => 0,
    }
}

fn turn_order(party: &[Character], monsters: &[Monster]) -> Vec<CombatantView> {
    let mut order: Vec<CombatantView> = party
        .iter()
        .map(|c| CombatantView::of(Side::Party, c))
        .chain(monsters.iter().map(|m| CombatantView::of(Side::Monsters, m)))
        .collect();
    order.sort_by_key(|v| v.turn_slot);
    order
}

#[derive(Debug, Clone, Serialize)]
pub struct AdventureReport {
    pub outcome: AdventureOutcome,
    pub encounters_cleared: usize,
    /// Party as it ended the run, session fields included.
    pub party: Vec<Character>,
}

/// Load an adventure and party from `store`, play it, and on victory write
/// back each member's experience.
///
/// Only `xp` is written: the stored record is re-read and updated, so stat
/// changes made during play never reach storage. A failed write is returned
/// after the outcome has already been reported to `observe`.
pub fn play_adventure<S>(
    store: &mut S,
    adventure: &str,
    party_names: &[String],
    registry: &ClassRegistry,
    dice: &mut Dice,
    observe: impl FnMut(&Event),
) -> Result<AdventureReport, AdventureError>
where
    S: CharacterStore + AdventureStore,
{
    let adventure = store.adventure(adventure)?;
    let members = party_names
        .iter()
        .map(|name| store.character(name))
        .collect::<Result<Vec<_>, _>>()?;
    let party = Party::assemble(members)?;

    let mut run = AdventureRun::new(&adventure, party, registry);
    let outcome = run.play(dice, observe);
    let encounters_cleared = run.encounters_cleared();
    let party = run.into_party();

    if outcome == AdventureOutcome::Victory {
        for member in &party {
            commit_experience(store, member).inspect_err(|err| {
                warn!(character = %member.name, %err, "failed to save experience");
            })?;
        }
    }

    Ok(AdventureReport {
        outcome,
        encounters_cleared,
        party,
    })
}

fn commit_experience<S: CharacterStore>(store: &mut S, member: &Character) -> Result<(), StoreError> {
    let mut record = store.character(&member.name)?;
    record.xp = member.xp;
    store.update_character(&record)
}
