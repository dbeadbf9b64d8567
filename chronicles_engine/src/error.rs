//! Error kinds raised by the character, save, and engine modules.

use chronicles_data::{ItemKind, Stat};
use thiserror::Error;

/// Every way an engine operation or save-file access can fail.
///
/// Engine operations validate before mutating, so receiving one of these means
/// the `Character` is exactly as it was before the call.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid character class '{0}' (valid classes: Warrior, Mage, Rogue, Cleric)")]
    InvalidClass(String),
    #[error("invalid character name '{0}'")]
    InvalidName(String),
    #[error("no saved character named '{0}'")]
    CharacterNotFound(String),
    #[error("save file could not be read: {0}")]
    CorruptedSave(String),
    #[error("malformed save file at line {line}: '{text}'")]
    MalformedSave { line: usize, text: String },
    #[error("save file is missing field '{0}'")]
    MissingField(&'static str),
    #[error("save field '{field}' has non-integer value '{value}'")]
    InvalidNumericField { field: &'static str, value: String },
    #[error("invalid character data: {0}")]
    InvalidCharacterData(String),
    #[error("{0} is dead")]
    CharacterDead(String),
    #[error("inventory is full ({0} slots)")]
    InventoryFull(usize),
    #[error("item '{0}' not found")]
    ItemNotFound(String),
    #[error("item '{item_id}' is {actual}, {reason}")]
    ItemType {
        item_id: String,
        actual: ItemKind,
        reason: String,
    },
    #[error("applying {amount:+} {stat} would leave it out of range")]
    StatOutOfRange { stat: Stat, amount: i64 },
    #[error("amount {0} must not be negative")]
    NegativeAmount(i64),
    #[error("not enough gold: {cost} needed, {available} available")]
    InsufficientGold { cost: i64, available: i64 },
    #[error("quest '{0}' not found")]
    QuestNotFound(String),
    #[error("quest '{0}' is not active")]
    QuestNotActive(String),
    #[error("quest '{0}' is already active or completed")]
    QuestAlreadyCompleted(String),
    #[error("quest '{quest_id}' requires level {required} (current level {level})")]
    InsufficientLevel { quest_id: String, required: i64, level: i64 },
    #[error("quest '{quest_id}' requires '{prerequisite}' to be completed first")]
    QuestRequirementsNotMet { quest_id: String, prerequisite: String },
    #[error("quest '{quest_id}' has a cyclic prerequisite chain")]
    PrerequisiteCycle { quest_id: String },
    #[error("combat is not active")]
    CombatNotActive,
    #[error("unknown enemy type '{0}'")]
    UnknownEnemy(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
