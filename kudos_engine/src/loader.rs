//! Loader utilities for building an [`Organisation`] from a TOML
//! definition file.
//!
//! Symbols (the `id` tokens in the file) resolve to deterministic v5 UUIDs
//! through the `idgen` namespaces, so reloading the same definition yields
//! the same entity ids. The whole definition is validated up front and all
//! problems are reported in one aggregated error.

pub mod goals;
pub mod players;
pub mod rewards;
pub mod rules;
pub mod tasks;

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use log::info;
use serde::Deserialize;
use uuid::Uuid;

use crate::idgen::{
    NAMESPACE_GOAL, NAMESPACE_GROUP, NAMESPACE_ORGANISATION, NAMESPACE_PLAYER, NAMESPACE_REWARD,
    NAMESPACE_RULE, NAMESPACE_TASK, uuid_from_token,
};
use crate::world::Organisation;

use goals::RawGoal;
use players::{RawGroup, RawPlayer};
use rewards::RawReward;
use rules::RawRule;
use tasks::RawTask;

/// A whole organisation definition as deserialized from TOML.
#[derive(Debug, Deserialize)]
pub struct OrgDef {
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<RawTask>,
    #[serde(default)]
    pub rules: Vec<RawRule>,
    #[serde(default)]
    pub rewards: Vec<RawReward>,
    #[serde(default)]
    pub goals: Vec<RawGoal>,
    #[serde(default)]
    pub players: Vec<RawPlayer>,
    #[serde(default)]
    pub groups: Vec<RawGroup>,
}

/// Maps definition symbols to the UUIDs the built entities will carry.
#[derive(Debug, Default)]
pub struct SymbolTable {
    pub tasks: HashMap<String, Uuid>,
    pub rules: HashMap<String, Uuid>,
    pub rewards: HashMap<String, Uuid>,
    pub goals: HashMap<String, Uuid>,
    pub players: HashMap<String, Uuid>,
    pub groups: HashMap<String, Uuid>,
}

impl SymbolTable {
    /// Register every symbol in `def`, reporting duplicates.
    fn from_def(def: &OrgDef, errors: &mut Vec<String>) -> Self {
        let mut table = Self::default();
        let mut register = |map: &mut HashMap<String, Uuid>, kind: &str, namespace: &Uuid, token: &str| {
            if map
                .insert(token.to_string(), uuid_from_token(namespace, token))
                .is_some()
            {
                errors.push(format!("duplicate {kind} symbol '{token}'"));
            }
        };
        for raw in &def.tasks {
            register(&mut table.tasks, "task", &NAMESPACE_TASK, &raw.id);
        }
        for raw in &def.rules {
            register(&mut table.rules, "rule", &NAMESPACE_RULE, &raw.id);
        }
        for raw in &def.rewards {
            register(&mut table.rewards, "reward", &NAMESPACE_REWARD, &raw.id);
        }
        for raw in &def.goals {
            register(&mut table.goals, "goal", &NAMESPACE_GOAL, &raw.id);
        }
        for raw in &def.players {
            register(&mut table.players, "player", &NAMESPACE_PLAYER, &raw.id);
        }
        for raw in &def.groups {
            register(&mut table.groups, "group", &NAMESPACE_GROUP, &raw.id);
        }
        table
    }
}

/// Build an [`Organisation`] from TOML source.
///
/// # Errors
/// - on TOML deserialization failure
/// - on any validation problem (unknown or duplicate symbols, empty rule
///   task lists, non-positive reward amounts, …); all problems are
///   aggregated into a single error
pub fn organisation_from_toml(source: &str) -> Result<Organisation> {
    let def: OrgDef = toml::from_str(source).context("while parsing organisation definition")?;

    let mut errors = Vec::new();
    let symbols = SymbolTable::from_def(&def, &mut errors);
    validate_def(&def, &symbols, &mut errors);
    if !errors.is_empty() {
        let details = errors
            .into_iter()
            .map(|err| format!("- {err}"))
            .collect::<Vec<_>>()
            .join("\n");
        bail!("organisation definition invalid:\n{details}");
    }

    let mut org = Organisation {
        id: uuid_from_token(&NAMESPACE_ORGANISATION, &def.name),
        name: def.name.clone(),
        ..Organisation::default()
    };
    for (index, raw) in def.tasks.iter().enumerate() {
        let task = tasks::build_task(raw, index as u64 + 1, &symbols)?;
        org.tasks.insert(task.id, task);
    }
    for raw in &def.rules {
        let rule = rules::build_rule(raw, &symbols)?;
        org.rules.insert(rule.id, rule);
    }
    for raw in &def.rewards {
        let reward = rewards::build_reward(raw, &symbols)?;
        org.rewards.insert(reward.id, reward);
    }
    for raw in &def.goals {
        let goal = goals::build_goal(raw, &symbols)?;
        org.goals.insert(goal.id, goal);
    }
    for raw in &def.players {
        let player = players::build_player(raw, &symbols)?;
        org.players.insert(player.id, player);
    }
    for raw in &def.groups {
        let group = players::build_group(raw, &symbols)?;
        org.groups.insert(group.id, group);
    }
    Ok(org)
}

/// Load an [`Organisation`] from a TOML definition file.
///
/// # Errors
/// Errors bubble up from file IO, deserialization, or validation.
pub fn load_organisation(toml_path: &Path) -> Result<Organisation> {
    let source = fs::read_to_string(toml_path)
        .with_context(|| format!("reading organisation definition from '{}'", toml_path.display()))?;
    let org = organisation_from_toml(&source)
        .with_context(|| format!("while building organisation from '{}'", toml_path.display()))?;
    info!("organisation '{}' loaded from '{}'", org.name, toml_path.display());
    info!("{} tasks added to Organisation", org.tasks.len());
    info!("{} rules added to Organisation", org.rules.len());
    info!("{} rewards added to Organisation", org.rewards.len());
    info!("{} goals added to Organisation", org.goals.len());
    info!("{} players added to Organisation", org.players.len());
    info!("{} groups added to Organisation", org.groups.len());
    Ok(org)
}

/// Collect every definition-level problem into `errors`.
fn validate_def(def: &OrgDef, symbols: &SymbolTable, errors: &mut Vec<String>) {
    for raw in &def.rules {
        rules::validate_rule(raw, symbols, errors);
    }
    for raw in &def.rewards {
        rewards::validate_reward(raw, errors);
    }
    for raw in &def.goals {
        goals::validate_goal(raw, symbols, errors);
    }
    for raw in &def.groups {
        players::validate_group(raw, symbols, errors);
    }
}
