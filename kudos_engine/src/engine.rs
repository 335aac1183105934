//! Engine module --
//!
//! The task-completion pipeline. One call to [`complete_task`] runs the
//! whole event on the calling thread: record the finished task, evaluate
//! every rule referencing it (for the player and for each group containing
//! the player), complete newly satisfied goals, and grant their rewards.
//! Points grants re-scan the organisation's points rules and can cascade
//! into further completions within the same event.

use std::collections::HashSet;

use log::{debug, info};
use time::OffsetDateTime;
use uuid::Uuid;

use kudos_expr::{BindTask, ExprNode};

use crate::error::EngineError;
use crate::goal::try_complete;
use crate::reward::{Level, RewardKind};
use crate::task::FinishedTask;
use crate::world::{ActorId, Organisation};

/// One goal completion within a [`CompletionReport`].
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedGoal {
    pub actor: ActorId,
    pub goal_id: Uuid,
    pub record_id: Uuid,
    pub finished_at: OffsetDateTime,
}

/// One reward grant within a [`CompletionReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrantedReward {
    pub actor: ActorId,
    pub reward_id: Uuid,
}

/// What one task-completion event did, in grant order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionReport {
    /// Id of the appended [`FinishedTask`] record.
    pub finished_task: Option<Uuid>,
    pub completed: Vec<CompletedGoal>,
    pub granted: Vec<GrantedReward>,
}

/// (actor id, goal id) pairs already completed within one top-level event.
/// Guards the points cascade against re-granting; a repeatable points goal
/// would otherwise fire again every time its own reward raises the balance.
type Visited = HashSet<(Uuid, Uuid)>;

/// Record that `player_id` finished `task_id` and run the full
/// rule → goal → reward cascade for the player and every group containing
/// the player.
///
/// `at` defaults to the current instant. Goals and rules are visited in
/// stable id order, so grant order is reproducible.
///
/// # Errors
/// - [`EngineError::Forbidden`] if the player is inactive or lacks a role
///   the task requires; the event aborts before any mutation
/// - [`EngineError::NotFound`] on a dangling task/player reference
pub fn complete_task(
    org: &mut Organisation,
    player_id: Uuid,
    task_id: Uuid,
    at: Option<OffsetDateTime>,
) -> Result<CompletionReport, EngineError> {
    let now = at.unwrap_or_else(OffsetDateTime::now_utc);

    // Both forbidden checks run before the first mutation, so a rejected
    // event leaves no partial state behind.
    let task = org.task_ref(task_id)?;
    let player = org.player_ref(player_id)?;
    if !player.active {
        return Err(EngineError::forbidden(format!(
            "inactive player '{}' may not complete tasks",
            player.symbol
        )));
    }
    if !task.performable_with(&player.roles) {
        return Err(EngineError::forbidden(format!(
            "player '{}' lacks a role required for task '{}'",
            player.symbol, task.symbol
        )));
    }
    let task_symbol = task.symbol.clone();

    let record = FinishedTask::new(task_id, now);
    let mut report = CompletionReport {
        finished_task: Some(record.id),
        ..CompletionReport::default()
    };
    org.player_mut(player_id)?.record_finished_task(record);
    info!("task '{task_symbol}' finished by player {player_id}");

    let candidates = goals_gated_on_task(org, task_id);
    debug!("{} goal(s) gated on task '{task_symbol}'", candidates.len());

    let mut visited = Visited::new();
    for &goal_id in &candidates {
        attempt_goal(org, ActorId::Player(player_id), goal_id, now, &mut visited, &mut report)?;
    }
    for group_id in org.groups_containing(player_id) {
        for &goal_id in &candidates {
            attempt_goal(org, ActorId::Group(group_id), goal_id, now, &mut visited, &mut report)?;
        }
    }

    Ok(report)
}

/// Parse `source` and evaluate it against a finished-task history: a
/// constant is bound (true) when a task with that number appears in the
/// history.
///
/// # Errors
/// - [`EngineError::Expression`] when the source does not parse
pub fn evaluate_expression(
    org: &Organisation,
    source: &str,
    history: &[FinishedTask],
) -> Result<bool, EngineError> {
    let mut tree: ExprNode = kudos_expr::parse(source)?;
    for entry in history {
        if let Some(task) = org.tasks.get(&entry.task_id) {
            tree.accept(&mut BindTask {
                number: task.number,
                task: task.id,
            });
        }
    }
    Ok(tree.evaluate())
}

/// Ids of all goals whose rule references `task_id`, sorted for
/// deterministic evaluation order.
fn goals_gated_on_task(org: &Organisation, task_id: Uuid) -> Vec<Uuid> {
    let rules: HashSet<Uuid> = org.rules_referencing_task(task_id).iter().map(|r| r.id).collect();
    let mut ids: Vec<Uuid> = org
        .goals
        .values()
        .filter(|g| rules.contains(&g.rule))
        .map(|g| g.id)
        .collect();
    ids.sort_unstable();
    ids
}

/// Run the completion state machine for one (actor, goal) pair and, on
/// completion, grant the goal's rewards.
///
/// Skips silently when the pair was already completed this event, when the
/// goal is group-gated or role-gated away from this actor, or when the rule
/// does not hold. Only `NotFound`-class problems error.
fn attempt_goal(
    org: &mut Organisation,
    actor: ActorId,
    goal_id: Uuid,
    now: OffsetDateTime,
    visited: &mut Visited,
    report: &mut CompletionReport,
) -> Result<(), EngineError> {
    if visited.contains(&(actor.uuid(), goal_id)) {
        return Ok(());
    }
    let goal = org.goal_ref(goal_id)?.clone();
    if matches!(actor, ActorId::Group(_)) && !goal.group_completable {
        return Ok(());
    }
    let roles = org.actor_roles(actor)?;
    if !goal.applies_to(&roles) {
        debug!("goal '{}' not applicable to {actor:?} (role gate)", goal.symbol);
        return Ok(());
    }

    let rule = org.rule_ref(goal.rule)?.clone();
    let history = org.actor_history(actor)?;
    let prior = org.finished_goals_for(actor, goal_id)?;
    let points = org.actor_ref(actor)?.points();

    let Some(record) = try_complete(&goal, &rule, &prior, &history, points, now) else {
        return Ok(());
    };
    info!("goal '{}' completed by {actor:?}", goal.symbol);
    visited.insert((actor.uuid(), goal_id));
    report.completed.push(CompletedGoal {
        actor,
        goal_id,
        record_id: record.id,
        finished_at: record.finished_at,
    });
    org.actor_mut(actor)?.push_finished_goal(record);

    for reward_id in goal.rewards {
        grant(org, actor, reward_id, now, visited, report)?;
    }
    Ok(())
}

/// Apply one reward to an actor. Points grants additionally run the
/// cascade over the organisation's points rules.
fn grant(
    org: &mut Organisation,
    actor: ActorId,
    reward_id: Uuid,
    now: OffsetDateTime,
    visited: &mut Visited,
    report: &mut CompletionReport,
) -> Result<(), EngineError> {
    let reward = org.reward_ref(reward_id)?.clone();
    let holder = org.actor_mut(actor)?;
    match &reward.kind {
        RewardKind::Badge { name, .. } | RewardKind::Achievement { name, .. } => {
            holder.add_award(reward_id);
            info!("└─ grant: {} '{name}' to {actor:?}", kind_label(&reward.kind));
        },
        RewardKind::Points { amount } => {
            holder.add_points(*amount);
            info!("└─ grant: Points({amount}) to {actor:?}");
        },
        RewardKind::Coins { amount } => {
            holder.add_coins(*amount);
            info!("└─ grant: Coins({amount}) to {actor:?}");
        },
        RewardKind::Level { index, label } => {
            holder.set_level(Level {
                index: *index,
                label: label.clone(),
            });
            info!("└─ grant: Level({index}, '{label}') to {actor:?}");
        },
    }
    report.granted.push(GrantedReward { actor, reward_id });

    // A points grant may have pushed the actor over further thresholds.
    if matches!(reward.kind, RewardKind::Points { .. }) {
        cascade_points_rules(org, actor, now, visited, report)?;
    }
    Ok(())
}

/// Re-scan the organisation's points rules for `actor` and attempt every
/// goal gated on a now-satisfied rule. Recurses through `attempt_goal` →
/// `grant`; the visited set bounds the recursion.
fn cascade_points_rules(
    org: &mut Organisation,
    actor: ActorId,
    now: OffsetDateTime,
    visited: &mut Visited,
    report: &mut CompletionReport,
) -> Result<(), EngineError> {
    let points = org.actor_ref(actor)?.points();
    let satisfied: Vec<Uuid> = org
        .points_rules()
        .iter()
        .filter(|rule| rule.points_threshold().is_some_and(|t| points >= t))
        .map(|rule| rule.id)
        .collect();
    for rule_id in satisfied {
        let goal_ids: Vec<Uuid> = org
            .goals_referencing_rule(rule_id)
            .iter()
            .map(|g| g.id)
            .collect();
        for goal_id in goal_ids {
            attempt_goal(org, actor, goal_id, now, visited, report)?;
        }
    }
    Ok(())
}

fn kind_label(kind: &RewardKind) -> &'static str {
    match kind {
        RewardKind::Badge { .. } => "Badge",
        RewardKind::Achievement { .. } => "Achievement",
        RewardKind::Points { .. } => "Points",
        RewardKind::Coins { .. } => "Coins",
        RewardKind::Level { .. } => "Level",
    }
}
