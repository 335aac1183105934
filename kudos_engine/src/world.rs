//! The per-tenant entity arenas and their query surface.
//!
//! This module defines [`Organisation`], the state container every engine
//! call operates on. Entities reference each other by id only; the maps
//! here are the single owner of all definitions and actor state.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;
use crate::goal::{FinishedGoal, Goal};
use crate::group::PlayerGroup;
use crate::player::Player;
use crate::reward::{Reward, RewardHolder};
use crate::rule::GoalRule;
use crate::task::{FinishedTask, Task};

/// Addresses an actor inside an organisation: a player or a player group.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ActorId {
    Player(Uuid),
    Group(Uuid),
}

impl ActorId {
    /// The underlying entity id, regardless of actor kind.
    pub fn uuid(&self) -> Uuid {
        match self {
            Self::Player(id) | Self::Group(id) => *id,
        }
    }
}

/// One tenant: every definition and every actor belonging to it.
///
/// Created by the loader and then mutated by the engine as players
/// complete tasks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Organisation {
    pub id: Uuid,
    pub name: String,
    pub tasks: HashMap<Uuid, Task>,
    pub rules: HashMap<Uuid, GoalRule>,
    pub goals: HashMap<Uuid, Goal>,
    pub rewards: HashMap<Uuid, Reward>,
    pub players: HashMap<Uuid, Player>,
    pub groups: HashMap<Uuid, PlayerGroup>,
}

impl Organisation {
    /// Create a new empty organisation with a random id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// # Errors
    /// - if the task id is not in this organisation
    pub fn task_ref(&self, id: Uuid) -> Result<&Task, EngineError> {
        self.tasks.get(&id).ok_or(EngineError::not_found("task", id))
    }

    /// # Errors
    /// - if the rule id is not in this organisation
    pub fn rule_ref(&self, id: Uuid) -> Result<&GoalRule, EngineError> {
        self.rules.get(&id).ok_or(EngineError::not_found("rule", id))
    }

    /// # Errors
    /// - if the goal id is not in this organisation
    pub fn goal_ref(&self, id: Uuid) -> Result<&Goal, EngineError> {
        self.goals.get(&id).ok_or(EngineError::not_found("goal", id))
    }

    /// # Errors
    /// - if the reward id is not in this organisation
    pub fn reward_ref(&self, id: Uuid) -> Result<&Reward, EngineError> {
        self.rewards.get(&id).ok_or(EngineError::not_found("reward", id))
    }

    /// # Errors
    /// - if the player id is not in this organisation
    pub fn player_ref(&self, id: Uuid) -> Result<&Player, EngineError> {
        self.players.get(&id).ok_or(EngineError::not_found("player", id))
    }

    /// # Errors
    /// - if the player id is not in this organisation
    pub fn player_mut(&mut self, id: Uuid) -> Result<&mut Player, EngineError> {
        self.players.get_mut(&id).ok_or(EngineError::not_found("player", id))
    }

    /// # Errors
    /// - if the group id is not in this organisation
    pub fn group_ref(&self, id: Uuid) -> Result<&PlayerGroup, EngineError> {
        self.groups.get(&id).ok_or(EngineError::not_found("group", id))
    }

    /// # Errors
    /// - if the group id is not in this organisation
    pub fn group_mut(&mut self, id: Uuid) -> Result<&mut PlayerGroup, EngineError> {
        self.groups.get_mut(&id).ok_or(EngineError::not_found("group", id))
    }

    /// The reward-holding view of an actor.
    ///
    /// # Errors
    /// - if the actor id is not in this organisation
    pub fn actor_ref(&self, actor: ActorId) -> Result<&dyn RewardHolder, EngineError> {
        match actor {
            ActorId::Player(id) => Ok(self.player_ref(id)?),
            ActorId::Group(id) => Ok(self.group_ref(id)?),
        }
    }

    /// The mutable reward-holding view of an actor.
    ///
    /// # Errors
    /// - if the actor id is not in this organisation
    pub fn actor_mut(&mut self, actor: ActorId) -> Result<&mut dyn RewardHolder, EngineError> {
        match actor {
            ActorId::Player(id) => Ok(self.player_mut(id)?),
            ActorId::Group(id) => Ok(self.group_mut(id)?),
        }
    }

    /// The roles an actor holds: a player's own roles, or the union of a
    /// group's members' roles.
    ///
    /// # Errors
    /// - if the actor id is not in this organisation
    pub fn actor_roles(&self, actor: ActorId) -> Result<HashSet<String>, EngineError> {
        match actor {
            ActorId::Player(id) => Ok(self.player_ref(id)?.roles.clone()),
            ActorId::Group(id) => {
                let group = self.group_ref(id)?;
                let mut roles = HashSet::new();
                for member in &group.members {
                    if let Some(player) = self.players.get(member) {
                        roles.extend(player.roles.iter().cloned());
                    }
                }
                Ok(roles)
            },
        }
    }

    /// A fresh snapshot of an actor's finished-task history, in timestamp
    /// order. A group's history is the union of its members' histories.
    ///
    /// # Errors
    /// - if the actor id is not in this organisation
    pub fn actor_history(&self, actor: ActorId) -> Result<Vec<FinishedTask>, EngineError> {
        match actor {
            ActorId::Player(id) => Ok(self.player_ref(id)?.finished_tasks.clone()),
            ActorId::Group(id) => self.group_history(id),
        }
    }

    /// The union of a group's members' finished-task histories, merged in
    /// timestamp order.
    ///
    /// # Errors
    /// - if the group id is not in this organisation
    pub fn group_history(&self, group_id: Uuid) -> Result<Vec<FinishedTask>, EngineError> {
        let group = self.group_ref(group_id)?;
        let mut history: Vec<FinishedTask> = group
            .members
            .iter()
            .filter_map(|member| self.players.get(member))
            .flat_map(|player| player.finished_tasks.iter().cloned())
            .collect();
        history.sort_by_key(|ft| ft.finished_at);
        Ok(history)
    }

    /// An actor's completion records for one goal.
    ///
    /// # Errors
    /// - if the actor id is not in this organisation
    pub fn finished_goals_for(&self, actor: ActorId, goal_id: Uuid) -> Result<Vec<FinishedGoal>, EngineError> {
        Ok(self.actor_ref(actor)?.finished_goals_for(goal_id))
    }

    /// All goals whose rule is `rule_id`, sorted by goal id for
    /// reproducible evaluation order.
    pub fn goals_referencing_rule(&self, rule_id: Uuid) -> Vec<&Goal> {
        let mut goals: Vec<&Goal> = self.goals.values().filter(|g| g.rule == rule_id).collect();
        goals.sort_by_key(|g| g.id);
        goals
    }

    /// All task rules referencing `task_id`, sorted by rule id.
    pub fn rules_referencing_task(&self, task_id: Uuid) -> Vec<&GoalRule> {
        let mut rules: Vec<&GoalRule> = self
            .rules
            .values()
            .filter(|r| r.references_task(task_id))
            .collect();
        rules.sort_by_key(|r| r.id);
        rules
    }

    /// All points rules of the organisation, sorted by rule id.
    pub fn points_rules(&self) -> Vec<&GoalRule> {
        let mut rules: Vec<&GoalRule> = self
            .rules
            .values()
            .filter(|r| r.points_threshold().is_some())
            .collect();
        rules.sort_by_key(|r| r.id);
        rules
    }

    /// Ids of all groups containing `player_id`, sorted.
    pub fn groups_containing(&self, player_id: Uuid) -> Vec<Uuid> {
        let mut ids: Vec<Uuid> = self
            .groups
            .values()
            .filter(|g| g.contains(player_id))
            .map(|g| g.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Look a task up by its expression shorthand number.
    pub fn task_by_number(&self, number: u64) -> Option<&Task> {
        self.tasks.values().find(|t| t.number == number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn at(unix: i64) -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(unix).unwrap()
    }

    fn player_with_roles(symbol: &str, roles: &[&str]) -> Player {
        Player {
            symbol: symbol.into(),
            roles: roles.iter().map(ToString::to_string).collect(),
            ..Player::default()
        }
    }

    #[test]
    fn accessors_report_missing_ids() {
        let org = Organisation::new("Acme");
        let missing = Uuid::new_v4();
        assert!(matches!(
            org.player_ref(missing),
            Err(EngineError::NotFound { kind: "player", .. })
        ));
        assert!(matches!(
            org.actor_ref(ActorId::Group(missing)),
            Err(EngineError::NotFound { kind: "group", .. })
        ));
    }

    #[test]
    fn group_roles_are_the_union_of_member_roles() {
        let mut org = Organisation::new("Acme");
        let alice = player_with_roles("alice", &["clerk"]);
        let bob = player_with_roles("bob", &["manager"]);
        let (alice_id, bob_id) = (alice.id, bob.id);
        org.players.insert(alice_id, alice);
        org.players.insert(bob_id, bob);
        let group = PlayerGroup {
            id: Uuid::new_v4(),
            symbol: "team".into(),
            name: "Team".into(),
            members: HashSet::from([alice_id, bob_id]),
            points: 0,
            coins: 0,
            level: None,
            awards: Vec::new(),
            finished_goals: Vec::new(),
        };
        let group_id = group.id;
        org.groups.insert(group_id, group);

        let roles = org.actor_roles(ActorId::Group(group_id)).unwrap();
        assert_eq!(
            roles,
            HashSet::from(["clerk".to_string(), "manager".to_string()])
        );
    }

    #[test]
    fn group_history_merges_member_histories_in_time_order() {
        let mut org = Organisation::new("Acme");
        let task = Uuid::new_v4();
        let mut alice = player_with_roles("alice", &[]);
        let mut bob = player_with_roles("bob", &[]);
        alice.record_finished_task(FinishedTask::new(task, at(30)));
        bob.record_finished_task(FinishedTask::new(task, at(10)));
        alice.record_finished_task(FinishedTask::new(task, at(20)));
        let (alice_id, bob_id) = (alice.id, bob.id);
        org.players.insert(alice_id, alice);
        org.players.insert(bob_id, bob);
        let group = PlayerGroup {
            id: Uuid::new_v4(),
            symbol: "team".into(),
            name: "Team".into(),
            members: HashSet::from([alice_id, bob_id]),
            points: 0,
            coins: 0,
            level: None,
            awards: Vec::new(),
            finished_goals: Vec::new(),
        };
        let group_id = group.id;
        org.groups.insert(group_id, group);

        let history = org.group_history(group_id).unwrap();
        let stamps: Vec<_> = history.iter().map(|ft| ft.finished_at).collect();
        assert_eq!(stamps, vec![at(10), at(20), at(30)]);
    }

    #[test]
    fn groups_containing_filters_by_membership() {
        let mut org = Organisation::new("Acme");
        let alice = player_with_roles("alice", &[]);
        let alice_id = alice.id;
        org.players.insert(alice_id, alice);
        let with_alice = PlayerGroup {
            id: Uuid::new_v4(),
            symbol: "a".into(),
            name: "A".into(),
            members: HashSet::from([alice_id]),
            points: 0,
            coins: 0,
            level: None,
            awards: Vec::new(),
            finished_goals: Vec::new(),
        };
        let without_alice = PlayerGroup {
            id: Uuid::new_v4(),
            symbol: "b".into(),
            name: "B".into(),
            members: HashSet::new(),
            points: 0,
            coins: 0,
            level: None,
            awards: Vec::new(),
            finished_goals: Vec::new(),
        };
        let with_id = with_alice.id;
        org.groups.insert(with_id, with_alice);
        org.groups.insert(without_alice.id, without_alice);
        assert_eq!(org.groups_containing(alice_id), vec![with_id]);
    }
}
