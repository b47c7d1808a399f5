pub mod actions;

use serde::Serialize;
use tracing::info;

pub use actions::{character_attack, lowest_hp_target, monster_attack, HitOutcome, HIT_DIE};

use crate::character::Character;
use crate::classes::ClassRegistry;
use crate::combatant::Combatant;
use crate::events::{ActionReport, CombatantView, Event, Side};
use crate::monster::Monster;
use crate::Dice;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatStatus {
    Active,
    /// Every party member is at 0 HP.
    PartyDefeated,
    /// No monster is left standing.
    MonstersDefeated,
}

/// One encounter's fight, from scheduled turn order to a terminal status.
///
/// The number of turn slots is fixed when the battle starts; slots that
/// belonged to a purged monster simply pass.
pub struct Battle<'a> {
    party: &'a mut [Character],
    monsters: &'a mut Vec<Monster>,
    registry: &'a ClassRegistry,
    slots: usize,
    round: u32,
}

impl<'a> Battle<'a> {
    pub fn new(
        party: &'a mut [Character],
        monsters: &'a mut Vec<Monster>,
        registry: &'a ClassRegistry,
    ) -> Self {
        assert!(!party.is_empty(), "battle needs at least one party member");
        assert!(!monsters.is_empty(), "battle needs at least one monster");
        let slots = party.len() + monsters.len();
        Self {
            party,
            monsters,
            registry,
            slots,
            round: 0,
        }
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    pub fn status(&self) -> CombatStatus {
        if self.party.iter().all(|c| c.current_hp() == 0) {
            CombatStatus::PartyDefeated
        } else if self.monsters.is_empty() {
            CombatStatus::MonstersDefeated
        } else {
            CombatStatus::Active
        }
    }

    pub fn snapshot(&self) -> Vec<CombatantView> {
        let party = self.party.iter().map(|c| CombatantView::of(Side::Party, c));
        let monsters = self.monsters.iter().map(|m| CombatantView::of(Side::Monsters, m));
        party.chain(monsters).collect()
    }

    /// Resolve every conscious combatant holding `slot`, then clear targeting
    /// marks and drop monsters at 0 HP.
    pub fn resolve_slot(&mut self, slot: usize, dice: &mut Dice) -> Vec<ActionReport> {
        let mut reports = Vec::new();
        let round = self.round;

        if let Some(attacker) = self
            .party
            .iter()
            .find(|c| c.turn_slot() == Some(slot) && c.is_conscious())
        {
            reports.extend(character_attack(
                attacker,
                self.monsters,
                self.registry,
                dice,
                round,
                slot,
            ));
        }

        for attacker in self
            .monsters
            .iter()
            .filter(|m| m.turn_slot() == Some(slot) && m.is_conscious())
        {
            if self.party.iter().any(|c| c.is_conscious()) {
                reports.push(monster_attack(attacker, self.party, dice, round, slot));
            }
        }

        for c in self.party.iter_mut() {
            c.set_targeted(false);
        }
        for m in self.monsters.iter_mut() {
            m.set_targeted(false);
        }
        self.monsters.retain(|m| m.is_conscious());

        reports
    }

    /// Play full passes over the turn slots until one side is down, checking
    /// after every slot.
    pub fn run(&mut self, dice: &mut Dice, mut observe: impl FnMut(&Event)) -> CombatStatus {
        loop {
            self.round += 1;
            observe(&Event::RoundStarted {
                round: self.round,
                combatants: self.snapshot(),
            });
            for slot in 0..self.slots {
                for report in self.resolve_slot(slot, dice) {
                    observe(&Event::Action(report));
                }
                let status = self.status();
                if status != CombatStatus::Active {
                    observe(&Event::RoundEnded { round: self.round });
                    info!(rounds = self.round, ?status, "battle over");
                    return status;
                }
            }
            observe(&Event::RoundEnded { round: self.round });
        }
    }
}
