//! Parser for the plain-text catalog format.
//!
//! Catalog files hold one record per block, blocks separated by blank lines.
//! Every line of a block is `KEY: value`; keys are case-insensitive.
//!
//! ```
//! use chronicles_data::parse_quests;
//!
//! let text = "QUEST_ID: first\nTITLE: First Steps\nDESCRIPTION: Begin.\n\
//!             REWARD_XP: 50\nREWARD_GOLD: 20\nREQUIRED_LEVEL: 1\nPREREQUISITE: NONE\n";
//! let quests = parse_quests(text).unwrap();
//! assert_eq!(quests[0].id, "first");
//! assert!(quests[0].prerequisite.is_none());
//! ```

use std::collections::HashMap;
use std::fmt;

use crate::defs::{Effect, ItemDef, ItemKind, NO_PREREQUISITE, QuestDef, is_valid_id};

const QUEST_FIELDS: &[&str] = &[
    "quest_id",
    "title",
    "description",
    "reward_xp",
    "reward_gold",
    "required_level",
    "prerequisite",
];

const ITEM_FIELDS: &[&str] = &["item_id", "name", "type", "effect", "cost", "description"];

/// Failure while reading a catalog file. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Empty,
    MalformedLine { line: usize, text: String },
    UnknownField { line: usize, key: String },
    DuplicateField { line: usize, key: String },
    MissingField { line: usize, key: &'static str },
    InvalidValue { line: usize, key: String, message: String },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Empty => write!(f, "catalog contains no records"),
            ParseError::MalformedLine { line, text } => {
                write!(f, "line {line}: expected 'KEY: value', found '{text}'")
            },
            ParseError::UnknownField { line, key } => write!(f, "line {line}: unknown field '{key}'"),
            ParseError::DuplicateField { line, key } => write!(f, "line {line}: duplicate field '{key}'"),
            ParseError::MissingField { line, key } => {
                write!(f, "record starting at line {line}: missing field '{key}'")
            },
            ParseError::InvalidValue { line, key, message } => {
                write!(f, "line {line}: invalid value for '{key}': {message}")
            },
        }
    }
}

impl std::error::Error for ParseError {}

/// One `KEY: value` block, keys lowercased.
struct Record {
    start_line: usize,
    fields: HashMap<String, (usize, String)>,
}

impl Record {
    fn take(&mut self, key: &'static str) -> Result<(usize, String), ParseError> {
        self.fields.remove(key).ok_or(ParseError::MissingField {
            line: self.start_line,
            key,
        })
    }

    fn take_str(&mut self, key: &'static str) -> Result<String, ParseError> {
        self.take(key).map(|(_, value)| value)
    }

    fn take_id(&mut self, key: &'static str) -> Result<String, ParseError> {
        let (line, value) = self.take(key)?;
        if !is_valid_id(&value) {
            return Err(ParseError::InvalidValue {
                line,
                key: key.to_string(),
                message: format!("'{value}' is not a valid id"),
            });
        }
        Ok(value)
    }

    fn take_int(&mut self, key: &'static str, min: i64) -> Result<i64, ParseError> {
        let (line, value) = self.take(key)?;
        let number = value.parse::<i64>().map_err(|_| ParseError::InvalidValue {
            line,
            key: key.to_string(),
            message: format!("'{value}' is not an integer"),
        })?;
        if number < min {
            return Err(ParseError::InvalidValue {
                line,
                key: key.to_string(),
                message: format!("{number} is below the minimum of {min}"),
            });
        }
        Ok(number)
    }

    fn take_parsed<T>(&mut self, key: &'static str) -> Result<T, ParseError>
    where
        T: std::str::FromStr<Err = String>,
    {
        let (line, value) = self.take(key)?;
        value.parse::<T>().map_err(|message| ParseError::InvalidValue {
            line,
            key: key.to_string(),
            message,
        })
    }
}

/// Parse every quest record in `text`.
///
/// # Errors
/// Returns the first structural or value error encountered.
pub fn parse_quests(text: &str) -> Result<Vec<QuestDef>, ParseError> {
    split_records(text, QUEST_FIELDS)?
        .into_iter()
        .map(|mut record| -> Result<QuestDef, ParseError> {
            let id = record.take_id("quest_id")?;
            let prerequisite = record.take_id("prerequisite")?;
            Ok(QuestDef {
                id,
                title: record.take_str("title")?,
                description: record.take_str("description")?,
                reward_xp: record.take_int("reward_xp", 0)?,
                reward_gold: record.take_int("reward_gold", 0)?,
                required_level: record.take_int("required_level", 1)?,
                prerequisite: (prerequisite != NO_PREREQUISITE).then_some(prerequisite),
            })
        })
        .collect()
}

/// Parse every item record in `text`.
///
/// # Errors
/// Returns the first structural or value error encountered.
pub fn parse_items(text: &str) -> Result<Vec<ItemDef>, ParseError> {
    split_records(text, ITEM_FIELDS)?
        .into_iter()
        .map(|mut record| -> Result<ItemDef, ParseError> {
            Ok(ItemDef {
                id: record.take_id("item_id")?,
                name: record.take_str("name")?,
                kind: record.take_parsed::<ItemKind>("type")?,
                effect: record.take_parsed::<Effect>("effect")?,
                cost: record.take_int("cost", 0)?,
                description: record.take_str("description")?,
            })
        })
        .collect()
}

fn split_records(text: &str, known: &[&str]) -> Result<Vec<Record>, ParseError> {
    let mut records = Vec::new();
    let mut current: Option<Record> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() {
            records.extend(current.take());
            continue;
        }
        let (key, value) = line.split_once(':').ok_or_else(|| ParseError::MalformedLine {
            line: line_no,
            text: line.to_string(),
        })?;
        let key = key.trim().to_ascii_lowercase();
        if !known.contains(&key.as_str()) {
            return Err(ParseError::UnknownField { line: line_no, key });
        }
        let record = current.get_or_insert_with(|| Record {
            start_line: line_no,
            fields: HashMap::new(),
        });
        if record.fields.contains_key(&key) {
            return Err(ParseError::DuplicateField { line: line_no, key });
        }
        record.fields.insert(key, (line_no, value.trim().to_string()));
    }
    records.extend(current);

    if records.is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::Stat;

    const QUESTS: &str = "\
QUEST_ID: rat_cellar
TITLE: Rats in the Cellar
DESCRIPTION: Clear out the tavern cellar.
REWARD_XP: 50
REWARD_GOLD: 20
REQUIRED_LEVEL: 1
PREREQUISITE: NONE


quest_id: wolf_pack
Title: The Wolf Pack
description: Drive off the wolves.
reward_xp: 120
reward_gold: 45
required_level: 2
prerequisite: rat_cellar
";

    #[test]
    fn parses_multiple_quest_records_with_mixed_case_keys() {
        let quests = parse_quests(QUESTS).unwrap();
        assert_eq!(quests.len(), 2);
        assert_eq!(quests[0].id, "rat_cellar");
        assert_eq!(quests[0].prerequisite, None);
        assert_eq!(quests[1].title, "The Wolf Pack");
        assert_eq!(quests[1].prerequisite.as_deref(), Some("rat_cellar"));
        assert_eq!(quests[1].reward_xp, 120);
    }

    #[test]
    fn parses_item_effects_and_kinds() {
        let text = "ITEM_ID: iron_sword\nNAME: Iron Sword\nTYPE: weapon\nEFFECT: strength:5\nCOST: 60\nDESCRIPTION: Sturdy.\n";
        let items = parse_items(text).unwrap();
        assert_eq!(items[0].kind, ItemKind::Weapon);
        assert_eq!(items[0].effect.stat, Stat::Strength);
        assert_eq!(items[0].effect.amount, 5);
    }

    #[test]
    fn reports_line_numbers_for_bad_numbers() {
        let text = "ITEM_ID: x\nNAME: X\nTYPE: armor\nEFFECT: max_health:10\nCOST: cheap\nDESCRIPTION: -\n";
        let err = parse_items(text).unwrap_err();
        assert!(matches!(err, ParseError::InvalidValue { line: 5, .. }), "{err}");
    }

    #[test]
    fn rejects_missing_unknown_and_duplicate_fields() {
        let missing = "ITEM_ID: x\nNAME: X\nTYPE: armor\nEFFECT: max_health:10\nCOST: 5\n";
        assert!(matches!(
            parse_items(missing),
            Err(ParseError::MissingField { key: "description", .. })
        ));

        let unknown = "ITEM_ID: x\nWEIGHT: 3\n";
        assert!(matches!(parse_items(unknown), Err(ParseError::UnknownField { line: 2, .. })));

        let duplicate = "ITEM_ID: x\nITEM_ID: y\n";
        assert!(matches!(parse_items(duplicate), Err(ParseError::DuplicateField { line: 2, .. })));
    }

    #[test]
    fn rejects_lines_without_separator_and_empty_files() {
        assert!(matches!(
            parse_quests("QUEST_ID first"),
            Err(ParseError::MalformedLine { line: 1, .. })
        ));
        assert_eq!(parse_quests("  \n\n"), Err(ParseError::Empty));
    }

    #[test]
    fn rejects_ids_that_cannot_be_saved() {
        let text = QUESTS.replace("QUEST_ID: rat_cellar", "QUEST_ID: a,b");
        assert!(matches!(
            parse_quests(&text),
            Err(ParseError::InvalidValue { line: 1, ref key, .. }) if key == "quest_id"
        ));

        let text = QUESTS.replace("prerequisite: rat_cellar", "prerequisite: rat,cellar");
        assert!(matches!(parse_quests(&text), Err(ParseError::InvalidValue { line: 16, .. })));

        let text = "ITEM_ID:\nNAME: X\nTYPE: armor\nEFFECT: max_health:10\nCOST: 5\nDESCRIPTION: -\n";
        assert!(matches!(
            parse_items(text),
            Err(ParseError::InvalidValue { line: 1, ref key, .. }) if key == "item_id"
        ));
    }

    #[test]
    fn rejects_level_below_one() {
        let text = QUESTS.replace("REQUIRED_LEVEL: 1", "REQUIRED_LEVEL: 0");
        assert!(matches!(parse_quests(&text), Err(ParseError::InvalidValue { line: 6, .. })));
    }
}
