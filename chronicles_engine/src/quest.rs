//! Quest engine -- accepting, completing and abandoning catalog quests.
//!
//! Per character each quest is unseen, active (id in `active_quests`), or
//! completed (id in `completed_quests`). Abandoning returns an active quest to
//! unseen; completion is permanent.

use std::collections::HashSet;

use chronicles_data::{Catalog, Id, QuestDef};
use log::info;

use crate::character::Character;
use crate::error::GameError;
use crate::progression::{self, Rewards};

/// Sum of rewards over a character's completed quests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RewardTotals {
    pub xp: i64,
    pub gold: i64,
}

/// Start a quest.
///
/// # Errors
/// - `QuestNotFound` if the quest is not in the catalog
/// - `InsufficientLevel` if the character is below the required level
/// - `QuestRequirementsNotMet` if the prerequisite is not completed
/// - `QuestAlreadyCompleted` if the quest is already completed or already active
pub fn accept(character: &mut Character, quest_id: &str, catalog: &Catalog) -> Result<(), GameError> {
    let quest = catalog
        .quest(quest_id)
        .ok_or_else(|| GameError::QuestNotFound(quest_id.to_string()))?;
    if character.level < quest.required_level {
        return Err(GameError::InsufficientLevel {
            quest_id: quest_id.to_string(),
            required: quest.required_level,
            level: character.level,
        });
    }
    if let Some(prereq) = &quest.prerequisite
        && !is_completed(character, prereq)
    {
        return Err(GameError::QuestRequirementsNotMet {
            quest_id: quest_id.to_string(),
            prerequisite: prereq.clone(),
        });
    }
    if is_completed(character, quest_id) || is_active(character, quest_id) {
        return Err(GameError::QuestAlreadyCompleted(quest_id.to_string()));
    }

    character.active_quests.push(quest.id.clone());
    info!("{} accepted quest '{quest_id}'", character.name);
    Ok(())
}

/// Finish an active quest and pay out its rewards through the leveling rules.
///
/// # Errors
/// - `QuestNotFound` if the quest is not in the catalog
/// - `QuestNotActive` if the character has not accepted the quest
/// - `CharacterDead` if the character cannot receive rewards
pub fn complete(character: &mut Character, quest_id: &str, catalog: &Catalog) -> Result<Rewards, GameError> {
    let quest = catalog
        .quest(quest_id)
        .ok_or_else(|| GameError::QuestNotFound(quest_id.to_string()))?;
    if !is_active(character, quest_id) {
        return Err(GameError::QuestNotActive(quest_id.to_string()));
    }

    let rewards = progression::grant_rewards(character, quest.reward_xp, quest.reward_gold)?;
    character.active_quests.retain(|id| id != quest_id);
    character.completed_quests.push(quest.id.clone());
    info!(
        "{} completed quest '{quest_id}' (+{} xp, +{} gold)",
        character.name, rewards.xp, rewards.gold
    );
    Ok(rewards)
}

/// Drop an active quest without completing it.
///
/// # Errors
/// - `QuestNotActive` if the character has not accepted the quest
pub fn abandon(character: &mut Character, quest_id: &str) -> Result<(), GameError> {
    if !is_active(character, quest_id) {
        return Err(GameError::QuestNotActive(quest_id.to_string()));
    }
    character.active_quests.retain(|id| id != quest_id);
    info!("{} abandoned quest '{quest_id}'", character.name);
    Ok(())
}

pub fn is_active(character: &Character, quest_id: &str) -> bool {
    character.active_quests.iter().any(|id| id == quest_id)
}

pub fn is_completed(character: &Character, quest_id: &str) -> bool {
    character.completed_quests.iter().any(|id| id == quest_id)
}

/// Whether [`accept`] would succeed.
pub fn can_accept(character: &Character, quest_id: &str, catalog: &Catalog) -> bool {
    catalog
        .quest(quest_id)
        .is_some_and(|quest| is_available(character, quest))
}

/// Active quests resolved against the catalog; unknown ids are skipped.
pub fn active_quests<'a>(character: &Character, catalog: &'a Catalog) -> Vec<&'a QuestDef> {
    character.active_quests.iter().filter_map(|id| catalog.quest(id)).collect()
}

/// Completed quests resolved against the catalog; unknown ids are skipped.
pub fn completed_quests<'a>(character: &Character, catalog: &'a Catalog) -> Vec<&'a QuestDef> {
    character
        .completed_quests
        .iter()
        .filter_map(|id| catalog.quest(id))
        .collect()
}

/// Quests the character could accept right now, in catalog order.
pub fn available_quests<'a>(character: &Character, catalog: &'a Catalog) -> Vec<&'a QuestDef> {
    catalog
        .quests
        .values()
        .filter(|quest| is_available(character, quest))
        .collect()
}

/// Quests whose required level lies in `min_level..=max_level`.
pub fn quests_by_level(catalog: &Catalog, min_level: i64, max_level: i64) -> Vec<&QuestDef> {
    catalog
        .quests
        .values()
        .filter(|quest| (min_level..=max_level).contains(&quest.required_level))
        .collect()
}

fn is_available(character: &Character, quest: &QuestDef) -> bool {
    !is_completed(character, &quest.id)
        && !is_active(character, &quest.id)
        && character.level >= quest.required_level
        && quest
            .prerequisite
            .as_deref()
            .is_none_or(|prereq| is_completed(character, prereq))
}

/// Completed quests as a percentage of the catalog size, capped at 100; `0.0` for an empty catalog.
///
/// Every completed id counts, including quests no longer in the catalog.
#[allow(clippy::cast_precision_loss)]
pub fn completion_percentage(character: &Character, catalog: &Catalog) -> f64 {
    if catalog.quests.is_empty() {
        return 0.0;
    }
    let completed = character.completed_quests.len() as f64;
    (100.0 * completed / catalog.quests.len() as f64).min(100.0)
}

/// Rewards from every completed quest still present in the catalog.
pub fn total_rewards_earned(character: &Character, catalog: &Catalog) -> RewardTotals {
    completed_quests(character, catalog)
        .into_iter()
        .fold(RewardTotals::default(), |acc, quest| RewardTotals {
            xp: acc.xp + quest.reward_xp,
            gold: acc.gold + quest.reward_gold,
        })
}

/// The prerequisite chain ending at `quest_id`, root first.
///
/// # Errors
/// - `QuestNotFound` if `quest_id` or any quest on its chain is missing from the catalog
/// - `PrerequisiteCycle` if the chain loops back on itself
pub fn prerequisite_chain(quest_id: &str, catalog: &Catalog) -> Result<Vec<Id>, GameError> {
    let mut chain: Vec<Id> = Vec::new();
    let mut seen = HashSet::new();
    let mut current = quest_id;
    loop {
        let quest = catalog
            .quest(current)
            .ok_or_else(|| GameError::QuestNotFound(current.to_string()))?;
        if !seen.insert(current) {
            return Err(GameError::PrerequisiteCycle {
                quest_id: quest_id.to_string(),
            });
        }
        chain.push(quest.id.clone());
        match quest.prerequisite.as_deref() {
            Some(prereq) => current = prereq,
            None => break,
        }
    }
    chain.reverse();
    Ok(chain)
}

/// Check that every prerequisite names a catalog quest.
///
/// # Errors
/// - `QuestNotFound` naming the first missing prerequisite
pub fn validate_prerequisites(catalog: &Catalog) -> Result<(), GameError> {
    for quest in catalog.quests.values() {
        if let Some(prereq) = &quest.prerequisite
            && catalog.quest(prereq).is_none()
        {
            return Err(GameError::QuestNotFound(prereq.clone()));
        }
    }
    Ok(())
}
