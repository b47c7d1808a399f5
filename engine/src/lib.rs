use std::{collections::VecDeque, fmt, str::FromStr};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

pub mod api;
pub mod character;
pub mod classes;
pub mod combat;
pub mod combatant;
pub mod config;
pub mod content;
pub mod error;
pub mod events;
pub mod initiative;
pub mod lifecycle;
pub mod monster;
pub mod store;

pub use character::{level_for_xp, xp_for_level, Character, Party};
pub use classes::{ClassActions, ClassRegistry, ADVENTURER};
pub use combat::{Battle, CombatStatus, HitOutcome};
pub use combatant::{Combatant, Vitals};
pub use error::{AdventureError, RosterError, StoreError};
pub use events::{ActionReport, CombatantView, Event, Side};
pub use lifecycle::{play_adventure, AdventureOutcome, AdventureRun};
pub use monster::{Adventure, ChallengeTier, Encounter, Monster};

/// Seed used once a scripted sequence runs dry.
const SCRIPT_FALLBACK_SEED: u64 = 0x5eed;

enum Source {
    Seeded(ChaCha8Rng),
    Scripted {
        faces: VecDeque<u32>,
        fallback: ChaCha8Rng,
    },
}

/// The single sequential random source threaded through a run.
pub struct Dice {
    source: Source,
}

impl Dice {
    pub fn from_seed(seed: u64) -> Self {
        Self { source: Source::Seeded(ChaCha8Rng::seed_from_u64(seed)) }
    }

    pub fn from_entropy() -> Self {
        Self::from_seed(rand::random())
    }

    /// Every roll consumes the next face in order. Faces outside the die are
    /// clamped into range; once the script is exhausted rolls continue from a
    /// fixed-seed stream.
    pub fn from_scripted(faces: Vec<u32>) -> Self {
        Self {
            source: Source::Scripted {
                faces: faces.into(),
                fallback: ChaCha8Rng::seed_from_u64(SCRIPT_FALLBACK_SEED),
            },
        }
    }

    /// Roll one die with `sides` faces, returning 1..=sides.
    pub fn roll(&mut self, sides: u32) -> u32 {
        let sides = sides.max(1);
        match &mut self.source {
            Source::Seeded(rng) => rng.gen_range(1..=sides),
            Source::Scripted { faces, fallback } => match faces.pop_front() {
                Some(face) => face.clamp(1, sides),
                None => fallback.gen_range(1..=sides),
            },
        }
    }

    pub fn d6(&mut self) -> u32 {
        self.roll(6)
    }

    pub fn d8(&mut self) -> u32 {
        self.roll(8)
    }

    pub fn d10(&mut self) -> u32 {
        self.roll(10)
    }

    pub fn d12(&mut self) -> u32 {
        self.roll(12)
    }

    /// Uniform index into a collection of `len` items.
    ///
    /// Panics if `len` does not fit in a `u32`.
    pub fn pick(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "pick from an empty collection");
        let sides = u32::try_from(len).expect("pick from more than u32::MAX items");
        (self.roll(sides) - 1) as usize
    }

    /// Sum of `dice.count` rolls of `dice.sides`.
    pub fn roll_damage(&mut self, dice: DamageDice) -> i32 {
        (0..dice.count).map(|_| self.roll(u32::from(dice.sides)) as i32).sum()
    }
}

/// Damage dice written `dY` or `XdY`, always with a +0 modifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DamageDice {
    pub count: u8,
    pub sides: u8,
}

impl DamageDice {
    pub const fn new(count: u8, sides: u8) -> Self {
        Self { count, sides }
    }

    pub fn max(&self) -> i32 {
        i32::from(self.count) * i32::from(self.sides)
    }
}

impl fmt::Display for DamageDice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 1 {
            write!(f, "d{}", self.sides)
        } else {
            write!(f, "{}d{}", self.count, self.sides)
        }
    }
}

impl FromStr for DamageDice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        let (count, sides) = lowered
            .split_once('d')
            .ok_or_else(|| format!("invalid damage dice (expected dY or XdY), got: {}", s))?;
        let count: u8 = if count.is_empty() {
            1
        } else {
            count.parse().map_err(|_| format!("invalid dice count in {}", s))?
        };
        let sides: u8 = sides
            .parse()
            .map_err(|_| format!("invalid dice sides in {}", s))?;
        if count == 0 || sides < 2 {
            return Err(format!("dice must be >= 1d2, got: {}", s));
        }
        Ok(Self::new(count, sides))
    }
}

impl TryFrom<String> for DamageDice {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DamageDice> for String {
    fn from(dice: DamageDice) -> Self {
        dice.to_string()
    }
}
