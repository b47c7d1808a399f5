use std::path::PathBuf;

use thiserror::Error;

/// Authoring and party-assembly invariants, checked before any combat runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RosterError {
    #[error("encounter already has a boss; '{0}' cannot be added")]
    SecondBoss(String),
    #[error("boss '{name}' can only be added once (requested {quantity})")]
    BossQuantity { name: String, quantity: u32 },
    #[error("quantity of '{0}' must be at least 1")]
    ZeroQuantity(String),
    #[error("encounter {0} has no monsters")]
    EmptyEncounter(usize),
    #[error("adventure '{name}' needs 1 to 4 encounters, got {count}")]
    EncounterCount { name: String, count: usize },
    #[error("a party needs 3 to 5 characters, got {0}")]
    PartySize(usize),
    #[error("'{0}' is already in the party")]
    DuplicateMember(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode {kind} records")]
    Encode {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{kind} '{name}' not found")]
    NotFound { kind: &'static str, name: String },
    #[error("{kind} '{name}' already exists")]
    Duplicate { kind: &'static str, name: String },
}

/// Failures surfaced by [`crate::play_adventure`].
#[derive(Debug, Error)]
pub enum AdventureError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Roster(#[from] RosterError),
}
