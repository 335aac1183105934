//! module: goal
//!
//! A goal pairs a rule with rewards. Completion is decided by the pure
//! [`try_complete`] state machine; persistence of the produced record and
//! reward application happen in the engine.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::rule::GoalRule;
use crate::task::FinishedTask;

/// A goal an actor can complete to earn rewards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub symbol: String,
    pub name: String,
    /// The rule gating completion.
    pub rule: Uuid,
    /// A repeatable goal can be completed again once its rule holds for
    /// history recorded after the previous completion.
    pub repeatable: bool,
    /// Whether player groups can complete this goal.
    pub group_completable: bool,
    /// Roles permitted to complete the goal; empty = no restriction.
    pub roles: HashSet<String>,
    /// Rewards granted on completion, in grant order.
    pub rewards: Vec<Uuid>,
}

impl Goal {
    /// Role gate: a goal with a role set applies only to actors holding at
    /// least one of those roles.
    pub fn applies_to(&self, held: &HashSet<String>) -> bool {
        self.roles.is_empty() || !self.roles.is_disjoint(held)
    }
}

/// One completion record for a goal. Append-only per actor; a
/// non-repeatable goal has at most one per actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinishedGoal {
    pub id: Uuid,
    pub goal_id: Uuid,
    pub finished_at: OffsetDateTime,
}

impl FinishedGoal {
    pub fn new(goal_id: Uuid, finished_at: OffsetDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            goal_id,
            finished_at,
        }
    }
}

/// Decide whether `goal` has just been (re-)completed by an actor.
///
/// `prior` holds the actor's existing completion records for this goal,
/// `history` and `points` the actor's finished-task history and point
/// balance. The decision:
///
/// - prior records and not repeatable → `None`, without re-evaluation
/// - prior records and repeatable → evaluate with the latest prior record's
///   timestamp as cursor
/// - no prior records → evaluate without a cursor
/// - rule satisfied → a fresh candidate [`FinishedGoal`] stamped `now`
///
/// The function only constructs the candidate record; the caller appends it
/// and grants rewards. It mutates nothing, so it can be run once per player
/// and once per containing group within the same event.
pub fn try_complete(
    goal: &Goal,
    rule: &GoalRule,
    prior: &[FinishedGoal],
    history: &[FinishedTask],
    points: u64,
    now: OffsetDateTime,
) -> Option<FinishedGoal> {
    let cursor = match prior.iter().map(|fg| fg.finished_at).max() {
        Some(_) if !goal.repeatable => return None,
        Some(latest) => Some(latest),
        None => None,
    };
    if rule.is_satisfied(history, points, cursor) {
        Some(FinishedGoal::new(goal.id, now))
    } else {
        None
    }
}
