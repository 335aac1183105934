//! PlayerGroup -- a set of players that can complete group goals together.
//!
//! Groups hold their own balances, awards, and finished-goal history. Their
//! finished-task history and role set are derived from the members; see
//! `Organisation::group_history` and `Organisation::actor_roles`.
use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::goal::FinishedGoal;
use crate::reward::{Level, RewardHolder};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerGroup {
    pub id: Uuid,
    pub symbol: String,
    pub name: String,
    pub members: HashSet<Uuid>,
    pub points: u64,
    pub coins: u64,
    pub level: Option<Level>,
    pub awards: Vec<Uuid>,
    pub finished_goals: Vec<FinishedGoal>,
}

impl PlayerGroup {
    pub fn contains(&self, player_id: Uuid) -> bool {
        self.members.contains(&player_id)
    }
}

impl RewardHolder for PlayerGroup {
    fn points(&self) -> u64 {
        self.points
    }

    fn add_points(&mut self, amount: u64) {
        self.points = self.points.saturating_add(amount);
    }

    fn add_coins(&mut self, amount: u64) {
        self.coins = self.coins.saturating_add(amount);
    }

    fn set_level(&mut self, level: Level) {
        self.level = Some(level);
    }

    fn add_award(&mut self, reward_id: Uuid) {
        self.awards.push(reward_id);
    }

    fn finished_goals(&self) -> &[FinishedGoal] {
        &self.finished_goals
    }

    fn push_finished_goal(&mut self, record: FinishedGoal) {
        self.finished_goals.push(record);
    }
}
