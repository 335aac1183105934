//! Player -- module for a player in Kudos
use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::goal::FinishedGoal;
use crate::reward::{Level, RewardHolder};
use crate::task::FinishedTask;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: Uuid,
    pub symbol: String,
    pub name: String,
    /// Inactive players may not complete tasks at all.
    pub active: bool,
    pub roles: HashSet<String>,
    pub points: u64,
    pub coins: u64,
    pub level: Option<Level>,
    /// Permanent rewards, in grant order. Repeats of a repeatable goal
    /// legitimately append the same reward id again.
    pub awards: Vec<Uuid>,
    pub finished_tasks: Vec<FinishedTask>,
    pub finished_goals: Vec<FinishedGoal>,
}

impl Default for Player {
    fn default() -> Player {
        Self {
            id: Uuid::new_v4(),
            symbol: "default".into(),
            name: "default".into(),
            active: true,
            roles: HashSet::default(),
            points: 0,
            coins: 0,
            level: None,
            awards: Vec::default(),
            finished_tasks: Vec::default(),
            finished_goals: Vec::default(),
        }
    }
}

impl Player {
    /// Append a completion event to the player's task history.
    pub fn record_finished_task(&mut self, record: FinishedTask) {
        self.finished_tasks.push(record);
    }
}

impl RewardHolder for Player {
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
