use anyhow::{Context, Result};

use crate::store::MemoryStore;

pub const BUILTIN_CHARACTERS: &str = include_str!("../content/characters.json");
pub const BUILTIN_MONSTERS: &str = include_str!("../content/monsters.json");
pub const BUILTIN_ADVENTURES: &str = include_str!("../content/adventures.json");

/// The bundled roster as an in-memory store.
pub fn builtin_store() -> Result<MemoryStore> {
    let characters = serde_json::from_str(BUILTIN_CHARACTERS)
        .context("failed to parse built-in characters")?;
    let monsters =
        serde_json::from_str(BUILTIN_MONSTERS).context("failed to parse built-in monsters")?;
    let adventures = serde_json::from_str(BUILTIN_ADVENTURES)
        .context("failed to parse built-in adventures")?;
    Ok(MemoryStore::new(characters, monsters, adventures))
}
