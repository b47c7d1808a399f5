use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::combatant::{Combatant, Vitals};
use crate::error::RosterError;
use crate::DamageDice;

pub const MAX_ENCOUNTERS: usize = 4;

/// Challenge tier of a monster. A boss hits every conscious party member and
/// at most one may appear per encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ChallengeTier {
    #[default]
    Normal,
    Boss,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Monster {
    pub name: String,
    pub challenge: ChallengeTier,
    pub experience: u32,
    pub hit_points: i32,
    /// Base modifier until initiative is rolled, then the rolled value.
    pub initiative: i32,
    pub damage_dice: DamageDice,
    /// Display only.
    #[serde(default)]
    pub damage_type: String,
    #[serde(skip)]
    pub vitals: Vitals,
}

impl Monster {
    pub fn new(
        name: impl Into<String>,
        challenge: ChallengeTier,
        experience: u32,
        hit_points: i32,
        initiative: i32,
        damage_dice: DamageDice,
        damage_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            challenge,
            experience,
            hit_points,
            initiative,
            damage_dice,
            damage_type: damage_type.into(),
            vitals: Vitals::default(),
        }
    }

    pub fn is_boss(&self) -> bool {
        self.challenge == ChallengeTier::Boss
    }

    /// Bring the instance to full HP for a new run.
    pub fn init_hp(&mut self) {
        self.vitals.reset(self.hit_points);
    }
}

impl Combatant for Monster {
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

/// Ordered multiset of monster instances.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EncounterRecord")]
pub struct Encounter {
    pub monsters: Vec<Monster>,
}

impl Encounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_boss(&self) -> bool {
        self.monsters.iter().any(Monster::is_boss)
    }

    /// Append `quantity` copies of `monster`, keeping at most one boss.
    pub fn add_monster(&mut self, monster: &Monster, quantity: u32) -> Result<(), RosterError> {
        if quantity == 0 {
            return Err(RosterError::ZeroQuantity(monster.name.clone()));
        }
        if monster.is_boss() {
            if self.has_boss() {
                return Err(RosterError::SecondBoss(monster.name.clone()));
            }
            if quantity > 1 {
                return Err(RosterError::BossQuantity {
                    name: monster.name.clone(),
                    quantity,
                });
            }
        }
        self.monsters
            .extend((0..quantity).map(|_| monster.clone()));
        Ok(())
    }

    /// Remove every instance named `name`. Returns how many were removed.
    pub fn remove_monster(&mut self, name: &str) -> usize {
        let before = self.monsters.len();
        self.monsters.retain(|m| m.name != name);
        before - self.monsters.len()
    }

    pub fn count_of(&self, name: &str) -> usize {
        self.monsters.iter().filter(|m| m.name == name).count()
    }

    /// `(name, quantity)` pairs in first-appearance order.
    pub fn summary(&self) -> Vec<(String, usize)> {
        summarize(&self.monsters)
    }

    pub fn distinct_monsters(&self) -> usize {
        self.summary().len()
    }

    pub fn total_experience(&self) -> u32 {
        total_experience(&self.monsters)
    }

    /// The name of the second boss, if more than one is present.
    fn extra_boss(&self) -> Option<&str> {
        self.monsters
            .iter()
            .filter(|m| m.is_boss())
            .nth(1)
            .map(|m| m.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.monsters.is_empty()
    }
}

/// Experience summed over `monsters`, saturating at `u32::MAX`.
pub fn total_experience(monsters: &[Monster]) -> u32 {
    monsters
        .iter()
        .fold(0u32, |acc, m| acc.saturating_add(m.experience))
}

/// Stored encounter shape; rebuilt through [`Encounter::add_monster`].
#[derive(Deserialize)]
struct EncounterRecord {
    monsters: Vec<Monster>,
}

impl TryFrom<EncounterRecord> for Encounter {
    type Error = RosterError;

    fn try_from(record: EncounterRecord) -> Result<Self, Self::Error> {
        let mut encounter = Encounter::new();
        for monster in &record.monsters {
            encounter.add_monster(monster, 1)?;
        }
        Ok(encounter)
    }
}

/// Group instances by name, keeping first-appearance order.
pub fn summarize(monsters: &[Monster]) -> Vec<(String, usize)> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for m in monsters {
        *counts.entry(m.name.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(name, n)| (name.to_string(), n))
        .collect()
}

/// A named sequence of one to four encounters, fixed once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AdventureRecord")]
pub struct Adventure {
    name: String,
    encounters: Vec<Encounter>,
}

impl Adventure {
    pub fn new(name: impl Into<String>, encounters: Vec<Encounter>) -> Result<Self, RosterError> {
        let name = name.into();
        if encounters.is_empty() || encounters.len() > MAX_ENCOUNTERS {
            return Err(RosterError::EncounterCount {
                name,
                count: encounters.len(),
            });
        }
        if let Some(idx) = encounters.iter().position(Encounter::is_empty) {
            return Err(RosterError::EmptyEncounter(idx));
        }
        if let Some(boss) = encounters.iter().find_map(|e| e.extra_boss()) {
            return Err(RosterError::SecondBoss(boss.to_string()));
        }
        Ok(Self { name, encounters })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn encounters(&self) -> &[Encounter] {
        &self.encounters
    }
}

#[derive(Deserialize)]
struct AdventureRecord {
    name: String,
    encounters: Vec<Encounter>,
}

impl TryFrom<AdventureRecord> for Adventure {
    type Error = RosterError;

    fn try_from(record: AdventureRecord) -> Result<Self, Self::Error> {
        Adventure::new(record.name, record.encounters)
    }
}
