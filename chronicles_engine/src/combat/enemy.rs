//! Enemy tiers and per-encounter enemy state.

use std::fmt;
use std::str::FromStr;

use crate::error::GameError;

/// Fixed enemy tiers, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Goblin,
    Orc,
    Dragon,
}

/// Static stats for an enemy tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyStats {
    pub health: i64,
    pub strength: i64,
    pub magic: i64,
    pub xp_reward: i64,
    pub gold_reward: i64,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Goblin, EnemyKind::Orc, EnemyKind::Dragon];

    pub fn stats(self) -> EnemyStats {
        let (health, strength, magic, xp_reward, gold_reward) = match self {
            EnemyKind::Goblin => (50, 8, 2, 25, 10),
            EnemyKind::Orc => (80, 12, 5, 50, 25),
            EnemyKind::Dragon => (200, 25, 15, 200, 100),
        };
        EnemyStats {
            health,
            strength,
            magic,
            xp_reward,
            gold_reward,
        }
    }

    /// Tier matched to a character level: goblins up to 2, orcs up to 5, dragons beyond.
    pub fn for_level(level: i64) -> EnemyKind {
        if level <= 2 {
            EnemyKind::Goblin
        } else if level <= 5 {
            EnemyKind::Orc
        } else {
            EnemyKind::Dragon
        }
    }
}

impl fmt::Display for EnemyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EnemyKind::Goblin => "Goblin",
            EnemyKind::Orc => "Orc",
            EnemyKind::Dragon => "Dragon",
        };
        f.write_str(label)
    }
}

impl FromStr for EnemyKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EnemyKind::ALL
            .into_iter()
            .find(|kind| kind.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GameError::UnknownEnemy(s.to_string()))
    }
}

/// One enemy for the length of a battle. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub name: String,
    pub health: i64,
    pub max_health: i64,
    pub strength: i64,
    pub magic: i64,
    pub xp_reward: i64,
    pub gold_reward: i64,
}

impl Enemy {
    pub fn new(kind: EnemyKind) -> Enemy {
        let stats = kind.stats();
        Enemy {
            kind,
            name: kind.to_string(),
            health: stats.health,
            max_health: stats.health,
            strength: stats.strength,
            magic: stats.magic,
            xp_reward: stats.xp_reward,
            gold_reward: stats.gold_reward,
        }
    }

    /// Create an enemy from its type name (`goblin`, `orc`, `dragon`).
    ///
    /// # Errors
    /// - `UnknownEnemy` if the name is not a known tier
    pub fn spawn(enemy_type: &str) -> Result<Enemy, GameError> {
        Ok(Enemy::new(enemy_type.parse()?))
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Reduce health, saturating at zero.
    pub fn take_damage(&mut self, amount: i64) {
        self.health = (self.health - amount.max(0)).max(0);
    }
}

/// Enemy suited to a character of `level`.
pub fn enemy_for_level(level: i64) -> Enemy {
    Enemy::new(EnemyKind::for_level(level))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_follow_level_bands() {
        assert_eq!(enemy_for_level(1).kind, EnemyKind::Goblin);
        assert_eq!(enemy_for_level(2).kind, EnemyKind::Goblin);
        assert_eq!(enemy_for_level(3).kind, EnemyKind::Orc);
        assert_eq!(enemy_for_level(5).kind, EnemyKind::Orc);
        assert_eq!(enemy_for_level(6).kind, EnemyKind::Dragon);
    }

    #[test]
    fn spawn_uses_the_fixed_table() {
        let orc = Enemy::spawn("ORC").unwrap();
        assert_eq!((orc.health, orc.max_health, orc.strength), (80, 80, 12));
        assert_eq!((orc.xp_reward, orc.gold_reward), (50, 25));
        assert!(matches!(Enemy::spawn("kobold"), Err(GameError::UnknownEnemy(name)) if name == "kobold"));
    }
}
