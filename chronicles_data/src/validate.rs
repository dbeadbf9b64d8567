use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::*;

/// Validation error for duplicate ids or broken references in a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    DuplicateId { kind: &'static str, id: String },
    MissingReference { kind: &'static str, id: String, context: String },
    PrerequisiteCycle { quest_id: String, chain: Vec<String> },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::DuplicateId { kind, id } => {
                write!(f, "duplicate {kind} id '{id}'")
            },
            ValidationError::MissingReference { kind, id, context } => {
                write!(f, "missing {kind} '{id}' ({context})")
            },
            ValidationError::PrerequisiteCycle { quest_id, chain } => {
                write!(f, "quest '{quest_id}' has a cyclic prerequisite chain ({})", chain.join(" -> "))
            },
        }
    }
}

impl std::error::Error for ValidationError {}

impl Catalog {
    /// Build a catalog from parsed record lists.
    ///
    /// Later duplicates are dropped and reported; the first definition of an id wins.
    pub fn from_defs(quests: Vec<QuestDef>, items: Vec<ItemDef>) -> (Catalog, Vec<ValidationError>) {
        let mut errors = Vec::new();
        let quests = index_by_id("quest", quests, |q| &q.id, &mut errors);
        let items = index_by_id("item", items, |i| &i.id, &mut errors);
        (Catalog { quests, items }, errors)
    }
}

/// Validate prerequisite references and chains in a catalog.
///
/// ```
/// use chronicles_data::{Catalog, QuestDef, validate_catalog};
///
/// let quest = QuestDef {
///     id: "q1".into(),
///     title: "Q1".into(),
///     description: String::new(),
///     reward_xp: 10,
///     reward_gold: 5,
///     required_level: 1,
///     prerequisite: Some("missing".into()),
/// };
/// let (catalog, _) = Catalog::from_defs(vec![quest], Vec::new());
/// assert_eq!(validate_catalog(&catalog).len(), 1);
/// ```
pub fn validate_catalog(catalog: &Catalog) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for quest in catalog.quests.values() {
        if let Some(prereq) = &quest.prerequisite
            && !catalog.quests.contains_key(prereq)
        {
            errors.push(ValidationError::MissingReference {
                kind: "quest",
                id: prereq.clone(),
                context: format!("prerequisite of quest '{}'", quest.id),
            });
        }
    }

    // each cycle is reported once, from its smallest member
    let mut reported = HashSet::new();
    for quest in catalog.quests.values() {
        if let Some(cycle) = find_cycle(catalog, &quest.id) {
            let first = cycle.iter().min().cloned().unwrap_or_default();
            if reported.insert(first.clone()) {
                errors.push(ValidationError::PrerequisiteCycle {
                    quest_id: first,
                    chain: cycle,
                });
            }
        }
    }

    errors
}

/// Follow prerequisite pointers from `start`; returns the looping portion if the walk revisits a quest.
fn find_cycle(catalog: &Catalog, start: &str) -> Option<Vec<String>> {
    let mut path: Vec<String> = Vec::new();
    let mut current = start;
    loop {
        if let Some(pos) = path.iter().position(|id| id == current) {
            let mut cycle = path.split_off(pos);
            cycle.push(current.to_string());
            return Some(cycle);
        }
        path.push(current.to_string());
        let prereq = catalog.quests.get(current)?.prerequisite.as_deref()?;
        current = prereq;
    }
}

fn index_by_id<T>(
    kind: &'static str,
    defs: Vec<T>,
    id_of: impl Fn(&T) -> &Id,
    errors: &mut Vec<ValidationError>,
) -> BTreeMap<Id, T> {
    let mut map = BTreeMap::new();
    for def in defs {
        let id = id_of(&def).clone();
        if map.contains_key(&id) {
            errors.push(ValidationError::DuplicateId { kind, id });
            continue;
        }
        map.insert(id, def);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quest(id: &str, prereq: Option<&str>) -> QuestDef {
        QuestDef {
            id: id.to_string(),
            title: format!("Quest {id}"),
            description: "Test quest".into(),
            reward_xp: 10,
            reward_gold: 5,
            required_level: 1,
            prerequisite: prereq.map(str::to_string),
        }
    }

    fn potion(id: &str) -> ItemDef {
        ItemDef {
            id: id.to_string(),
            name: "Potion".into(),
            kind: ItemKind::Consumable,
            effect: Effect {
                stat: Stat::Health,
                amount: 20,
            },
            cost: 10,
            description: String::new(),
        }
    }

    #[test]
    fn valid_chain_has_no_errors() {
        let (catalog, dupes) = Catalog::from_defs(
            vec![quest("a", None), quest("b", Some("a")), quest("c", Some("b"))],
            vec![potion("p")],
        );
        assert!(dupes.is_empty());
        assert!(validate_catalog(&catalog).is_empty());
    }

    #[test]
    fn duplicate_ids_are_reported_and_first_wins() {
        let mut second = quest("a", None);
        second.title = "Second".into();
        let (catalog, errors) = Catalog::from_defs(vec![quest("a", None), second], vec![potion("p"), potion("p")]);
        assert_eq!(catalog.quests["a"].title, "Quest a");
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(&ValidationError::DuplicateId {
            kind: "item",
            id: "p".into()
        }));
    }

    #[test]
    fn missing_prerequisite_is_reported() {
        let (catalog, _) = Catalog::from_defs(vec![quest("b", Some("ghost"))], Vec::new());
        let errors = validate_catalog(&catalog);
        assert!(matches!(
            &errors[..],
            [ValidationError::MissingReference { id, .. }] if id == "ghost"
        ));
    }

    #[test]
    fn cycles_are_reported_once() {
        let (catalog, _) = Catalog::from_defs(
            vec![
                quest("x", Some("z")),
                quest("y", Some("x")),
                quest("z", Some("y")),
                quest("tail", Some("x")),
            ],
            Vec::new(),
        );
        let errors = validate_catalog(&catalog);
        assert_eq!(errors.len(), 1);
        match &errors[0] {
            ValidationError::PrerequisiteCycle { quest_id, chain } => {
                assert_eq!(quest_id, "x");
                assert_eq!(chain.first(), chain.last());
            },
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn self_prerequisite_is_a_cycle() {
        let (catalog, _) = Catalog::from_defs(vec![quest("loop", Some("loop"))], Vec::new());
        let errors = validate_catalog(&catalog);
        assert_eq!(
            errors,
            vec![ValidationError::PrerequisiteCycle {
                quest_id: "loop".into(),
                chain: vec!["loop".into(), "loop".into()],
            }]
        );
    }
}
