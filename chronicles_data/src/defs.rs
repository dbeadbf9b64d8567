use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Stable identifier used for quests and items across the catalog and save files.
pub type Id = String;

/// Sentinel used in catalog files for "no prerequisite".
pub const NO_PREREQUISITE: &str = "NONE";

/// Ids are stored comma-joined in save files, so they may not be empty or padded,
/// and may not contain commas or control characters.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.trim() == id && !id.contains(',') && !id.chars().any(char::is_control)
}

/// A quest as defined in the catalog. Immutable for the life of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestDef {
    pub id: Id,
    pub title: String,
    pub description: String,
    pub reward_xp: i64,
    pub reward_gold: i64,
    pub required_level: i64,
    /// Quest that must be completed first, `None` if the quest is a chain root.
    pub prerequisite: Option<Id>,
}

/// Equipment slot / usage category of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Weapon,
    Armor,
    Consumable,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ItemKind::Weapon => "weapon",
            ItemKind::Armor => "armor",
            ItemKind::Consumable => "consumable",
        };
        f.write_str(label)
    }
}

impl FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weapon" => Ok(ItemKind::Weapon),
            "armor" => Ok(ItemKind::Armor),
            "consumable" => Ok(ItemKind::Consumable),
            other => Err(format!("unknown item type '{other}'")),
        }
    }
}

/// Character statistic an item effect can modify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Health,
    MaxHealth,
    Strength,
    Magic,
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stat::Health => "health",
            Stat::MaxHealth => "max_health",
            Stat::Strength => "strength",
            Stat::Magic => "magic",
        };
        f.write_str(label)
    }
}

impl FromStr for Stat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "health" => Ok(Stat::Health),
            "max_health" => Ok(Stat::MaxHealth),
            "strength" => Ok(Stat::Strength),
            "magic" => Ok(Stat::Magic),
            other => Err(format!("unknown stat '{other}'")),
        }
    }
}

/// A stat modification, written `stat:amount` in catalog files (e.g. `health:20`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effect {
    pub stat: Stat,
    pub amount: i64,
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.stat, self.amount)
    }
}

impl FromStr for Effect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (stat, amount) = s
            .split_once(':')
            .ok_or_else(|| format!("effect '{s}' is not in stat:amount form"))?;
        let stat = stat.parse::<Stat>()?;
        let amount = amount
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("effect '{s}' has a non-integer amount"))?;
        Ok(Effect { stat, amount })
    }
}

/// An item as defined in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: Id,
    pub name: String,
    pub kind: ItemKind,
    pub effect: Effect,
    pub cost: i64,
    pub description: String,
}

impl ItemDef {
    /// Gold received when selling this item back to a shop.
    pub fn sell_price(&self) -> i64 {
        self.cost / 2
    }
}

/// Read-only reference data loaded once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub quests: BTreeMap<Id, QuestDef>,
    pub items: BTreeMap<Id, ItemDef>,
}

impl Catalog {
    pub fn quest(&self, id: &str) -> Option<&QuestDef> {
        self.quests.get(id)
    }

    pub fn item(&self, id: &str) -> Option<&ItemDef> {
        self.items.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_parses_stat_and_amount() {
        let effect: Effect = "max_health:25".parse().unwrap();
        assert_eq!(effect.stat, Stat::MaxHealth);
        assert_eq!(effect.amount, 25);
        assert_eq!(effect.to_string(), "max_health:25");
    }

    #[test]
    fn effect_rejects_malformed_input() {
        assert!("health20".parse::<Effect>().is_err());
        assert!("luck:3".parse::<Effect>().is_err());
        assert!("magic:lots".parse::<Effect>().is_err());
    }

    #[test]
    fn item_kind_is_case_insensitive() {
        assert_eq!("Weapon".parse::<ItemKind>().unwrap(), ItemKind::Weapon);
        assert_eq!(" ARMOR ".parse::<ItemKind>().unwrap(), ItemKind::Armor);
        assert!("trinket".parse::<ItemKind>().is_err());
    }

    #[test]
    fn ids_must_fit_in_a_save_file() {
        assert!(is_valid_id("iron_sword"));
        assert!(is_valid_id("old map"));
        assert!(!is_valid_id(""));
        assert!(!is_valid_id(" padded"));
        assert!(!is_valid_id("a,b"));
        assert!(!is_valid_id("tab\there"));
    }

    #[test]
    fn sell_price_rounds_down() {
        let item = ItemDef {
            id: "dagger".into(),
            name: "Dagger".into(),
            kind: ItemKind::Weapon,
            effect: Effect {
                stat: Stat::Strength,
                amount: 3,
            },
            cost: 25,
            description: String::new(),
        };
        assert_eq!(item.sell_price(), 12);
    }
}
