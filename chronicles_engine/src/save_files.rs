//! Save-file encoding and on-disk save management.
//!
//! A save file is a sequence of `KEY: value` lines in a fixed order, one file per
//! character at `<save dir>/<name>_save.txt`. List fields are comma-joined with
//! no trailing delimiter; an empty list is an empty value. Ids must never
//! contain commas since no escaping is performed.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chronicles_data::Id;
use log::{info, warn};

use crate::character::{Character, CharacterClass};
use crate::error::GameError;

/// File name suffix identifying save files in the save directory.
pub const SAVE_SUFFIX: &str = "_save.txt";

const NAME: &str = "NAME";
const CLASS: &str = "CLASS";
const LEVEL: &str = "LEVEL";
const HEALTH: &str = "HEALTH";
const MAX_HEALTH: &str = "MAX_HEALTH";
const STRENGTH: &str = "STRENGTH";
const MAGIC: &str = "MAGIC";
const EXPERIENCE: &str = "EXPERIENCE";
const GOLD: &str = "GOLD";
const INVENTORY: &str = "INVENTORY";
const ACTIVE_QUESTS: &str = "ACTIVE_QUESTS";
const COMPLETED_QUESTS: &str = "COMPLETED_QUESTS";
const EQUIPPED_WEAPON: &str = "EQUIPPED_WEAPON";
const EQUIPPED_ARMOR: &str = "EQUIPPED_ARMOR";

/// Keys in the order they are written.
pub const FIELD_ORDER: [&str; 14] = [
    NAME,
    CLASS,
    LEVEL,
    HEALTH,
    MAX_HEALTH,
    STRENGTH,
    MAGIC,
    EXPERIENCE,
    GOLD,
    INVENTORY,
    ACTIVE_QUESTS,
    COMPLETED_QUESTS,
    EQUIPPED_WEAPON,
    EQUIPPED_ARMOR,
];

/// Render a character in save-file form, including the trailing newline.
pub fn encode(character: &Character) -> String {
    let slot = |item: &Option<Id>| item.clone().unwrap_or_default();
    let values = [
        character.name.clone(),
        character.class.to_string(),
        character.level.to_string(),
        character.health.to_string(),
        character.max_health.to_string(),
        character.strength.to_string(),
        character.magic.to_string(),
        character.experience.to_string(),
        character.gold.to_string(),
        character.inventory.join(","),
        character.active_quests.join(","),
        character.completed_quests.join(","),
        slot(&character.equipped_weapon),
        slot(&character.equipped_armor),
    ];

    let mut out = String::new();
    for (key, value) in FIELD_ORDER.iter().zip(values) {
        out.push_str(key);
        out.push_str(": ");
        out.push_str(&value);
        out.push('\n');
    }
    out
}

/// Parse save-file text back into a new `Character` and validate it.
///
/// The two equipment keys are optional so files without them still load.
///
/// # Errors
/// - `MalformedSave` if a non-blank line has no colon or a key appears twice
/// - `MissingField` if a required key is absent
/// - `InvalidNumericField` if a numeric value is not an integer
/// - `InvalidCharacterData` if the decoded character breaks an invariant
pub fn decode(text: &str) -> Result<Character, GameError> {
    let mut fields = SaveFields::parse(text)?;

    let class_name = fields.text(CLASS)?;
    let class = class_name
        .parse::<CharacterClass>()
        .map_err(|_| GameError::InvalidCharacterData(format!("unknown class '{class_name}'")))?;

    let character = Character {
        name: fields.text(NAME)?.to_string(),
        class,
        level: fields.number(LEVEL)?,
        health: fields.number(HEALTH)?,
        max_health: fields.number(MAX_HEALTH)?,
        strength: fields.number(STRENGTH)?,
        magic: fields.number(MAGIC)?,
        experience: fields.number(EXPERIENCE)?,
        gold: fields.number(GOLD)?,
        inventory: fields.list(INVENTORY)?,
        active_quests: fields.list(ACTIVE_QUESTS)?,
        completed_quests: fields.list(COMPLETED_QUESTS)?,
        equipped_weapon: fields.slot(EQUIPPED_WEAPON),
        equipped_armor: fields.slot(EQUIPPED_ARMOR),
    };
    fields.warn_unused();

    character.validate()?;
    Ok(character)
}

/// Raw `KEY: value` pairs from a save file.
struct SaveFields<'a> {
    values: HashMap<&'a str, &'a str>,
}

impl<'a> SaveFields<'a> {
    fn parse(text: &'a str) -> Result<Self, GameError> {
        let mut values = HashMap::new();
        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let malformed = || GameError::MalformedSave {
                line: idx + 1,
                text: line.to_string(),
            };
            let (key, value) = line.split_once(':').ok_or_else(malformed)?;
            if values.insert(key.trim(), value.trim()).is_some() {
                return Err(malformed());
            }
        }
        Ok(SaveFields { values })
    }

    fn text(&mut self, key: &'static str) -> Result<&'a str, GameError> {
        self.values.remove(key).ok_or(GameError::MissingField(key))
    }

    fn number(&mut self, key: &'static str) -> Result<i64, GameError> {
        let raw = self.text(key)?;
        raw.parse::<i64>().map_err(|_| GameError::InvalidNumericField {
            field: key,
            value: raw.to_string(),
        })
    }

    fn list(&mut self, key: &'static str) -> Result<Vec<Id>, GameError> {
        let raw = self.text(key)?;
        if raw.is_empty() {
            return Ok(Vec::new());
        }
        Ok(raw.split(',').map(str::to_string).collect())
    }

    fn slot(&mut self, key: &'static str) -> Option<Id> {
        self.values
            .remove(key)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    fn warn_unused(&self) {
        for key in self.values.keys() {
            warn!("ignoring unknown save field '{key}'");
        }
    }
}

/// Health of a save file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveFileStatus {
    Ready,
    Corrupted { message: String },
}

/// Descriptive entry for one save file in the save directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveFileEntry {
    pub name: String,
    pub path: PathBuf,
    pub modified: Option<SystemTime>,
    pub level: Option<i64>,
    pub class: Option<CharacterClass>,
    pub status: SaveFileStatus,
}

/// Reads and writes character save files under one directory.
#[derive(Debug, Clone)]
pub struct SaveStore {
    root: PathBuf,
}

impl SaveStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the save file for a character name.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}{SAVE_SUFFIX}"))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }

    /// Write `character` to its save file, replacing any previous save.
    ///
    /// # Errors
    /// - `InvalidCharacterData` if the character breaks an invariant (nothing is written)
    /// - `Io` if the directory or file cannot be written
    pub fn save(&self, character: &Character) -> Result<PathBuf, GameError> {
        character.validate()?;
        fs::create_dir_all(&self.root)?;
        let path = self.path_for(&character.name);
        fs::write(&path, encode(character))?;
        info!("saved '{}' to {}", character.name, path.display());
        Ok(path)
    }

    /// Load the character saved under `name`.
    ///
    /// # Errors
    /// - `CharacterNotFound` if there is no save file for `name`
    /// - `CorruptedSave` if the file exists but cannot be read as text
    /// - any [`decode`] error
    pub fn load(&self, name: &str) -> Result<Character, GameError> {
        let path = self.path_for(name);
        let text = read_save(&path, name)?;
        let character = decode(&text)?;
        if character.name != name {
            return Err(GameError::InvalidCharacterData(format!(
                "save file for '{name}' holds character '{}'",
                character.name
            )));
        }
        info!("loaded '{name}' from {}", path.display());
        Ok(character)
    }

    /// Names of all saved characters, sorted.
    ///
    /// # Errors
    /// - `Io` if the save directory exists but cannot be enumerated
    pub fn list(&self) -> Result<Vec<String>, GameError> {
        let mut names: Vec<String> = self.save_files()?.into_iter().map(|(name, _)| name).collect();
        names.sort();
        Ok(names)
    }

    /// Remove the save file for `name`.
    ///
    /// # Errors
    /// - `CharacterNotFound` if there is no such save
    /// - `Io` if the file cannot be removed
    pub fn delete(&self, name: &str) -> Result<(), GameError> {
        let path = self.path_for(name);
        match fs::remove_file(&path) {
            Ok(()) => {
                info!("deleted save for '{name}'");
                Ok(())
            },
            Err(err) if err.kind() == ErrorKind::NotFound => Err(GameError::CharacterNotFound(name.to_string())),
            Err(err) => Err(err.into()),
        }
    }

    /// Describe every save file, including ones that no longer decode.
    ///
    /// # Errors
    /// - `Io` if the save directory exists but cannot be enumerated
    pub fn entries(&self) -> Result<Vec<SaveFileEntry>, GameError> {
        let mut entries: Vec<SaveFileEntry> = self
            .save_files()?
            .into_iter()
            .map(|(name, path)| entry_for(name, path))
            .collect();
        entries.sort_by(|a, b| b.modified.cmp(&a.modified).then(a.name.cmp(&b.name)));
        Ok(entries)
    }

    fn save_files(&self) -> Result<Vec<(String, PathBuf)>, GameError> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let mut found = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| name.strip_suffix(SAVE_SUFFIX))
            else {
                continue;
            };
            if !name.is_empty() {
                found.push((name.to_string(), path.clone()));
            }
        }
        Ok(found)
    }
}

fn read_save(path: &Path, name: &str) -> Result<String, GameError> {
    fs::read_to_string(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => GameError::CharacterNotFound(name.to_string()),
        _ => GameError::CorruptedSave(format!("{}: {err}", path.display())),
    })
}

fn entry_for(name: String, path: PathBuf) -> SaveFileEntry {
    let modified = fs::metadata(&path).and_then(|meta| meta.modified()).ok();
    let (level, class, status) = match read_save(&path, &name).and_then(|text| decode(&text)) {
        Ok(character) => (Some(character.level), Some(character.class), SaveFileStatus::Ready),
        Err(err) => {
            warn!("save '{}' ({}) is unusable: {err}", name, path.display());
            (
                None,
                None,
                SaveFileStatus::Corrupted {
                    message: err.to_string(),
                },
            )
        },
    };
    SaveFileEntry {
        name,
        path,
        modified,
        level,
        class,
        status,
    }
}
