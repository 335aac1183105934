//! reward.rs -- `Reward` Module
//!
//! Reward definitions and the `RewardHolder` trait implemented by anything
//! that can receive them (players and player groups). Permanent rewards
//! (badges, achievements) append to an actor's award list; volatile rewards
//! accumulate balances or overwrite the actor's level.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::goal::FinishedGoal;

/// A level an actor can hold; granted by `RewardKind::Level`, overwriting
/// whatever the actor held before.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub index: u32,
    pub label: String,
}

/// Reward kinds an organisation can attach to goals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RewardKind {
    Badge {
        name: String,
        description: String,
        icon: String,
    },
    Achievement {
        name: String,
        description: String,
    },
    Points {
        amount: u64,
    },
    Coins {
        amount: u64,
    },
    Level {
        index: u32,
        label: String,
    },
}

impl RewardKind {
    /// Permanent rewards are collected; volatile rewards mutate balances
    /// or the level.
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::Badge { .. } | Self::Achievement { .. })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reward {
    pub id: Uuid,
    pub symbol: String,
    pub kind: RewardKind,
}

/// State-container capabilities shared by players and player groups.
///
/// `add_points`/`add_coins` saturate rather than wrap; grant functions are
/// side-effect-only and cannot fail.
pub trait RewardHolder {
    fn points(&self) -> u64;
    fn add_points(&mut self, amount: u64);
    fn add_coins(&mut self, amount: u64);
    fn set_level(&mut self, level: Level);
    fn add_award(&mut self, reward_id: Uuid);
    fn finished_goals(&self) -> &[FinishedGoal];
    fn push_finished_goal(&mut self, record: FinishedGoal);

    /// The holder's completion records for one specific goal.
    fn finished_goals_for(&self, goal_id: Uuid) -> Vec<FinishedGoal> {
        self.finished_goals()
            .iter()
            .filter(|fg| fg.goal_id == goal_id)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permanence_splits_the_variant_set() {
        let badge = RewardKind::Badge {
            name: "b".into(),
            description: String::new(),
            icon: String::new(),
        };
        let achievement = RewardKind::Achievement {
            name: "a".into(),
            description: String::new(),
        };
        assert!(badge.is_permanent());
        assert!(achievement.is_permanent());
        assert!(!RewardKind::Points { amount: 1 }.is_permanent());
        assert!(!RewardKind::Coins { amount: 1 }.is_permanent());
        assert!(
            !RewardKind::Level {
                index: 1,
                label: "Novice".into()
            }
            .is_permanent()
        );
    }
}
