//! Read-only snapshots handed to observers while a run plays out.
//!
//! Observers receive owned copies; nothing they do can feed back into the
//! simulation.

use serde::Serialize;

use crate::combat::HitOutcome;
use crate::combatant::Combatant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Party,
    Monsters,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CombatantView {
    pub name: String,
    pub side: Side,
    pub current_hp: i32,
    pub max_hp: i32,
    pub initiative: i32,
    pub turn_slot: Option<usize>,
}

impl CombatantView {
    pub fn of(side: Side, combatant: &impl Combatant) -> Self {
        Self {
            name: combatant.name().to_string(),
            side,
            current_hp: combatant.current_hp(),
            max_hp: combatant.max_hp(),
            initiative: combatant.initiative(),
            turn_slot: combatant.turn_slot(),
        }
    }
}

/// One resolved attack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionReport {
    pub round: u32,
    pub slot: usize,
    pub actor: String,
    pub side: Side,
    pub hit_die: u32,
    pub outcome: HitOutcome,
    /// Damage after the hit die was applied.
    pub damage: i32,
    pub damage_type: Option<String>,
    pub targets: Vec<String>,
    /// Targets this action dropped to 0 HP.
    pub felled: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    EncounterStarted {
        index: usize,
        total: usize,
        monsters: Vec<(String, usize)>,
    },
    Prepared {
        name: String,
        spirit: i32,
    },
    TurnOrder {
        order: Vec<CombatantView>,
    },
    RoundStarted {
        round: u32,
        combatants: Vec<CombatantView>,
    },
    Action(ActionReport),
    RoundEnded {
        round: u32,
    },
    EncounterWon {
        index: usize,
        xp: u32,
    },
    ExperienceGained {
        name: String,
        gained: u32,
        total_xp: u32,
        level: u32,
        leveled_up: bool,
    },
    ShortRest {
        name: String,
        healed: i32,
        current_hp: i32,
        max_hp: i32,
    },
    PartyDefeated {
        index: usize,
    },
    AdventureWon {
        name: String,
    },
}
