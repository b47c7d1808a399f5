use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::combatant::{Combatant, Vitals};
use crate::error::RosterError;

/// Experience needed to reach levels 1..=10.
pub const LEVEL_THRESHOLDS: [u32; 10] = [0, 100, 200, 300, 400, 500, 600, 700, 800, 900];
pub const MAX_LEVEL: u32 = LEVEL_THRESHOLDS.len() as u32;

pub const MIN_PARTY: usize = 3;
pub const MAX_PARTY: usize = 5;

/// Level derived from experience; never stored.
pub fn level_for_xp(xp: u32) -> u32 {
    LEVEL_THRESHOLDS.iter().filter(|&&t| xp >= t).count() as u32
}

/// Minimum experience for `level`, clamped to 1..=10.
pub fn xp_for_level(level: u32) -> u32 {
    LEVEL_THRESHOLDS[(level.clamp(1, MAX_LEVEL) - 1) as usize]
}

/// A party member. `body`, `mind` and `spirit` range over -1..=3.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub player: String,
    pub xp: u32,
    pub body: i32,
    pub mind: i32,
    pub spirit: i32,
    #[serde(rename = "class", alias = "class_")]
    pub class: String,
    #[serde(skip)]
    pub initiative: i32,
    #[serde(skip)]
    pub vitals: Vitals,
}

impl Character {
    pub fn new(
        name: impl Into<String>,
        player: impl Into<String>,
        xp: u32,
        [body, mind, spirit]: [i32; 3],
        class: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            player: player.into(),
            xp,
            body,
            mind,
            spirit,
            class: class.into(),
            initiative: 0,
            vitals: Vitals::default(),
        }
    }

    pub fn level(&self) -> u32 {
        level_for_xp(self.xp)
    }

    pub fn hit_point_maximum(&self) -> i32 {
        (10 + self.body) * self.level() as i32
    }

    /// Set max and current HP to `(10 + body) * level`.
    pub fn init_hp(&mut self) {
        let max = self.hit_point_maximum();
        self.vitals.reset(max);
    }

    /// Add experience. Returns true when the derived level went up.
    pub fn gain_xp(&mut self, amount: u32) -> bool {
        let before = self.level();
        self.xp = self.xp.saturating_add(amount);
        self.level() > before
    }
}

impl Combatant for Character {
    fn name(&self) -> &str {
        &self.name
    }

    fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    fn vitals_mut(&mut self) -> &mut Vitals {
        &mut self.vitals
    }

    fn initiative(&self) -> i32 {
        self.initiative
    }

    fn set_initiative(&mut self, initiative: i32) {
        self.initiative = initiative;
    }
}

/// Three to five distinct characters assembled for one adventure run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Party {
    members: Vec<Character>,
}

impl Party {
    pub fn assemble(members: Vec<Character>) -> Result<Self, RosterError> {
        if !(MIN_PARTY..=MAX_PARTY).contains(&members.len()) {
            return Err(RosterError::PartySize(members.len()));
        }
        let mut seen = HashSet::new();
        for member in &members {
            if !seen.insert(member.name.as_str()) {
                return Err(RosterError::DuplicateMember(member.name.clone()));
            }
        }
        Ok(Self { members })
    }

    pub fn members(&self) -> &[Character] {
        &self.members
    }

    pub fn into_members(self) -> Vec<Character> {
        self.members
    }
}
