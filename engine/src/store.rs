//! Name-keyed record storage for characters, monsters and adventures.

use std::{
    fs,
    path::{Path, PathBuf},
};

use encoding_rs::Encoding;
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::character::Character;
use crate::error::StoreError;
use crate::monster::{Adventure, Monster};

pub const CHARACTERS_FILE: &str = "characters.json";
pub const MONSTERS_FILE: &str = "monsters.json";
pub const ADVENTURES_FILE: &str = "adventures.json";

pub trait CharacterStore {
    /// All characters when `player` is `None`, otherwise those whose owner
    /// contains `player` (case-insensitive).
    fn characters_by_owner(&self, player: Option<&str>) -> Result<Vec<Character>, StoreError>;
    fn character(&self, name: &str) -> Result<Character, StoreError>;
    fn save_character(&mut self, character: &Character) -> Result<(), StoreError>;
    fn update_character(&mut self, character: &Character) -> Result<(), StoreError>;
    fn delete_character(&mut self, name: &str) -> Result<(), StoreError>;
}

pub trait MonsterStore {
    fn monsters(&self) -> Result<Vec<Monster>, StoreError>;
}

pub trait AdventureStore {
    fn adventures(&self) -> Result<Vec<Adventure>, StoreError>;
    fn adventure(&self, name: &str) -> Result<Adventure, StoreError>;
    fn save_adventure(&mut self, adventure: &Adventure) -> Result<(), StoreError>;
}

fn owned_by(character: &Character, player: Option<&str>) -> bool {
    match player {
        None => true,
        Some(p) => character.player.to_lowercase().contains(&p.to_lowercase()),
    }
}

fn not_found(kind: &'static str, name: &str) -> StoreError {
    StoreError::NotFound {
        kind,
        name: name.to_string(),
    }
}

fn duplicate(kind: &'static str, name: &str) -> StoreError {
    StoreError::Duplicate {
        kind,
        name: name.to_string(),
    }
}

/// In-memory records, used for built-in content and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub characters: Vec<Character>,
    pub monsters: Vec<Monster>,
    pub adventures: Vec<Adventure>,
}

impl MemoryStore {
    pub fn new(characters: Vec<Character>, monsters: Vec<Monster>, adventures: Vec<Adventure>) -> Self {
        Self {
            characters,
            monsters,
            adventures,
        }
    }
}

impl CharacterStore for MemoryStore {
    fn characters_by_owner(&self, player: Option<&str>) -> Result<Vec<Character>, StoreError> {
        Ok(self
            .characters
            .iter()
            .filter(|c| owned_by(c, player))
            .cloned()
            .collect())
    }

    fn character(&self, name: &str) -> Result<Character, StoreError> {
        self.characters
            .iter()
            .find(|c| c.name == name)
            .cloned()
            .ok_or_else(|| not_found("character", name))
    }

    fn save_character(&mut self, character: &Character) -> Result<(), StoreError> {
        if self.characters.iter().any(|c| c.name == character.name) {
            return Err(duplicate("character", &character.name));
        }
        self.characters.push(character.clone());
        Ok(())
    }

    fn update_character(&mut self, character: &Character) -> Result<(), StoreError> {
        let slot = self
            .characters
            .iter_mut()
            .find(|c| c.name == character.name)
            .ok_or_else(|| not_found("character", &character.name))?;
        *slot = character.clone();
        Ok(())
    }

    fn delete_character(&mut self, name: &str) -> Result<(), StoreError> {
        let before = self.characters.len();
        self.characters.retain(|c| c.name != name);
        if self.characters.len() == before {
            return Err(not_found("character", name));
        }
        Ok(())
    }
}

impl MonsterStore for MemoryStore {
    fn monsters(&self) -> Result<Vec<Monster>, StoreError> {
        Ok(self.monsters.clone())
    }
}

impl AdventureStore for MemoryStore {
    fn adventures(&self) -> Result<Vec<Adventure>, StoreError> {
        Ok(self.adventures.clone())
    }

    fn adventure(&self, name: &str) -> Result<Adventure, StoreError> {
        self.adventures
            .iter()
            .find(|a| a.name() == name)
            .cloned()
            .ok_or_else(|| not_found("adventure", name))
    }

    fn save_adventure(&mut self, adventure: &Adventure) -> Result<(), StoreError> {
        if self.adventures.iter().any(|a| a.name() == adventure.name()) {
            return Err(duplicate("adventure", adventure.name()));
        }
        self.adventures.push(adventure.clone());
        Ok(())
    }
}

/// One JSON array file per record kind inside a data directory. A missing or
/// blank file holds no records.
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn load<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>, StoreError> {
        let path = self.dir.join(file);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let text = read_text_auto(&path)?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&text).map_err(|source| StoreError::Parse { path, source })
    }

    fn write<T: Serialize>(&self, file: &str, kind: &'static str, records: &[T]) -> Result<(), StoreError> {
        let path = self.dir.join(file);
        let text = serde_json::to_string_pretty(records)
            .map_err(|source| StoreError::Encode { kind, source })?;
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;
        fs::write(&path, text).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), records = records.len(), "wrote {kind} records");
        Ok(())
    }
}

impl CharacterStore for JsonStore {
    fn characters_by_owner(&self, player: Option<&str>) -> Result<Vec<Character>, StoreError> {
        let mut all: Vec<Character> = self.load(CHARACTERS_FILE)?;
        all.retain(|c| owned_by(c, player));
        Ok(all)
    }

    fn character(&self, name: &str) -> Result<Character, StoreError> {
        self.load::<Character>(CHARACTERS_FILE)?
            .into_iter()
            .find(|c| c.name == name)
            .ok_or_else(|| not_found("character", name))
    }

    fn save_character(&mut self, character: &Character) -> Result<(), StoreError> {
        let mut all: Vec<Character> = self.load(CHARACTERS_FILE)?;
        if all.iter().any(|c| c.name == character.name) {
            return Err(duplicate("character", &character.name));
        }
        all.push(character.clone());
        self.write(CHARACTERS_FILE, "character", &all)
    }

    fn update_character(&mut self, character: &Character) -> Result<(), StoreError> {
        let mut all: Vec<Character> = self.load(CHARACTERS_FILE)?;
        let slot = all
            .iter_mut()
            .find(|c| c.name == character.name)
            .ok_or_else(|| not_found("character", &character.name))?;
        *slot = character.clone();
        self.write(CHARACTERS_FILE, "character", &all)
    }

    fn delete_character(&mut self, name: &str) -> Result<(), StoreError> {
        let mut all: Vec<Character> = self.load(CHARACTERS_FILE)?;
        let before = all.len();
        all.retain(|c| c.name != name);
        if all.len() == before {
            return Err(not_found("character", name));
        }
        self.write(CHARACTERS_FILE, "character", &all)
    }
}

impl MonsterStore for JsonStore {
    fn monsters(&self) -> Result<Vec<Monster>, StoreError> {
        self.load(MONSTERS_FILE)
    }
}

impl AdventureStore for JsonStore {
    fn adventures(&self) -> Result<Vec<Adventure>, StoreError> {
        self.load(ADVENTURES_FILE)
    }

    fn adventure(&self, name: &str) -> Result<Adventure, StoreError> {
        self.adventures()?
            .into_iter()
            .find(|a| a.name() == name)
            .ok_or_else(|| not_found("adventure", name))
    }

    fn save_adventure(&mut self, adventure: &Adventure) -> Result<(), StoreError> {
        let mut all = self.adventures()?;
        if all.iter().any(|a| a.name() == adventure.name()) {
            return Err(duplicate("adventure", adventure.name()));
        }
        all.push(adventure.clone());
        self.write(ADVENTURES_FILE, "adventure", &all)
    }
}

/// Read a text file, honouring a UTF-8 or UTF-16 byte order mark.
pub fn read_text_auto(path: &Path) -> Result<String, StoreError> {
    let bytes = fs::read(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (text, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(text.into_owned())
    } else {
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
