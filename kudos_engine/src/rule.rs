//! rule.rs -- `GoalRule` Module
//!
//! Implements the rule kinds a goal can be gated on: task-history rules
//! (`AllTasks`, `AnyTask`) and the balance-threshold `Points` rule. Rules
//! never error on business conditions; an unsatisfied rule is just `false`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::task::FinishedTask;

/// Condition kinds a [`GoalRule`] can carry.
///
/// Task lists are ordered and may reference the same task more than once;
/// for `AllTasks` a duplicated entry must be finished as many times as it
/// appears.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RuleKind {
    AllTasks { tasks: Vec<Uuid> },
    AnyTask { tasks: Vec<Uuid> },
    Points { threshold: u64 },
}

/// A named condition that gates goal completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalRule {
    pub id: Uuid,
    pub symbol: String,
    pub name: String,
    pub description: String,
    pub kind: RuleKind,
}

/// Completion progress of a rule: `done` out of `total` units.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleProgress {
    pub done: u64,
    pub total: u64,
}

impl GoalRule {
    /// True when this rule's condition currently holds for an actor with
    /// the given finished-task `history` and point balance.
    ///
    /// `cursor` restricts task-history rules to entries strictly after the
    /// given instant (used when re-evaluating repeatable goals); the
    /// `Points` kind ignores history and cursor entirely.
    pub fn is_satisfied(
        &self,
        history: &[FinishedTask],
        points: u64,
        cursor: Option<OffsetDateTime>,
    ) -> bool {
        match &self.kind {
            RuleKind::AllTasks { tasks } => {
                let finished = count_by_task(tasks, history, cursor);
                count_required(tasks)
                    .iter()
                    .all(|(task_id, needed)| finished.get(task_id).copied().unwrap_or(0) >= *needed)
            },
            RuleKind::AnyTask { tasks } => !count_by_task(tasks, history, cursor).is_empty(),
            RuleKind::Points { threshold } => points >= *threshold,
        }
    }

    /// Progress toward satisfaction, as `(done, total)` units.
    ///
    /// For task rules a unit is one *distinct* referenced task with at
    /// least one matching history entry; duplicates in the required list
    /// do not widen the denominator. For `Points` the units are points,
    /// clamped at the threshold.
    pub fn progress(
        &self,
        history: &[FinishedTask],
        points: u64,
        cursor: Option<OffsetDateTime>,
    ) -> RuleProgress {
        match &self.kind {
            RuleKind::AllTasks { tasks } | RuleKind::AnyTask { tasks } => {
                let finished = count_by_task(tasks, history, cursor);
                let required = count_required(tasks);
                RuleProgress {
                    done: required.keys().filter(|id| finished.contains_key(id)).count() as u64,
                    total: required.len() as u64,
                }
            },
            RuleKind::Points { threshold } => RuleProgress {
                done: points.min(*threshold),
                total: *threshold,
            },
        }
    }

    /// True when the rule is a task rule referencing `task_id`.
    pub fn references_task(&self, task_id: Uuid) -> bool {
        match &self.kind {
            RuleKind::AllTasks { tasks } | RuleKind::AnyTask { tasks } => tasks.contains(&task_id),
            RuleKind::Points { .. } => false,
        }
    }

    /// The threshold for `Points` rules, `None` for task rules.
    pub fn points_threshold(&self) -> Option<u64> {
        match self.kind {
            RuleKind::Points { threshold } => Some(threshold),
            _ => None,
        }
    }
}

/// Occurrences per referenced task in `history`, restricted to entries
/// strictly after `cursor` when one is given.
fn count_by_task(
    tasks: &[Uuid],
    history: &[FinishedTask],
    cursor: Option<OffsetDateTime>,
) -> HashMap<Uuid, usize> {
    let mut counts = HashMap::new();
    for entry in history {
        if !tasks.contains(&entry.task_id) {
            continue;
        }
        if cursor.is_some_and(|c| entry.finished_at <= c) {
            continue;
        }
        *counts.entry(entry.task_id).or_insert(0) += 1;
    }
    counts
}

/// Required occurrences per task id; duplicates in the list accumulate.
fn count_required(tasks: &[Uuid]) -> HashMap<Uuid, usize> {
    let mut counts = HashMap::new();
    for task_id in tasks {
        *counts.entry(*task_id).or_insert(0) += 1;
    }
    counts
}
