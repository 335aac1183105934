//! module: task
//!

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Something a player can do and be rewarded for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub symbol: String,
    /// Per-organisation shorthand used by task expressions (`kudos_expr`).
    pub number: u64,
    pub name: String,
    pub description: String,
    pub tradeable: bool,
    /// Roles allowed to perform the task; empty = anyone.
    pub roles: HashSet<String>,
}

impl Task {
    /// True when `roles` allows an actor holding `held` to perform the task.
    pub fn performable_with(&self, held: &HashSet<String>) -> bool {
        self.roles.is_empty() || !self.roles.is_disjoint(held)
    }
}

/// One completion event for a task. Append-only; never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinishedTask {
    pub id: Uuid,
    pub task_id: Uuid,
    pub finished_at: OffsetDateTime,
}

impl FinishedTask {
    pub fn new(task_id: Uuid, finished_at: OffsetDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            task_id,
            finished_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task_with_roles(roles: &[&str]) -> Task {
        Task {
            id: Uuid::new_v4(),
            symbol: "t".into(),
            number: 1,
            name: "Task".into(),
            description: String::new(),
            tradeable: false,
            roles: roles.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn unrestricted_task_is_performable_by_anyone() {
        let task = task_with_roles(&[]);
        assert!(task.performable_with(&HashSet::new()));
    }

    #[test]
    fn restricted_task_requires_a_shared_role() {
        let task = task_with_roles(&["clerk"]);
        assert!(!task.performable_with(&HashSet::new()));
        assert!(!task.performable_with(&HashSet::from(["manager".to_string()])));
        assert!(task.performable_with(&HashSet::from(["clerk".to_string(), "manager".to_string()])));
    }
}
