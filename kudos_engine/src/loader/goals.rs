//! module `loader::goals`

use std::collections::HashSet;

use anyhow::{Result, bail};
use serde::Deserialize;

use crate::goal::Goal;
use crate::loader::SymbolTable;

/// The raw version of a [`Goal`] from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct RawGoal {
    pub id: String,
    pub name: String,
    /// Symbol of the rule gating this goal.
    pub rule: String,
    #[serde(default)]
    pub repeatable: bool,
    #[serde(default)]
    pub group_completable: bool,
    #[serde(default)]
    pub roles: HashSet<String>,
    #[serde(default)]
    pub rewards: Vec<String>,
}

/// Collect definition problems for one raw goal.
pub fn validate_goal(raw: &RawGoal, symbols: &SymbolTable, errors: &mut Vec<String>) {
    if !symbols.rules.contains_key(&raw.rule) {
        errors.push(format!("goal '{}': unknown rule symbol '{}'", raw.id, raw.rule));
    }
    for reward in &raw.rewards {
        if !symbols.rewards.contains_key(reward) {
            errors.push(format!("goal '{}': unknown reward symbol '{reward}'", raw.id));
        }
    }
}

/// Build a [`Goal`] from its raw form.
///
/// # Errors
/// - on failed symbol lookup
pub fn build_goal(raw: &RawGoal, symbols: &SymbolTable) -> Result<Goal> {
    let Some(id) = symbols.goals.get(&raw.id) else {
        bail!("building goal '{}': symbol not registered", raw.id);
    };
    let Some(rule) = symbols.rules.get(&raw.rule) else {
        bail!("building goal '{}': unknown rule symbol '{}'", raw.id, raw.rule);
    };
    let rewards = raw
        .rewards
        .iter()
        .map(|reward| {
            symbols.rewards.get(reward).copied().ok_or_else(|| {
                anyhow::anyhow!("building goal '{}': unknown reward symbol '{reward}'", raw.id)
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Goal {
        id: *id,
        symbol: raw.id.clone(),
        name: raw.name.clone(),
        rule: *rule,
        repeatable: raw.repeatable,
        group_completable: raw.group_completable,
        roles: raw.roles.clone(),
        rewards,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::idgen::{NAMESPACE_GOAL, NAMESPACE_REWARD, NAMESPACE_RULE, uuid_from_token};

    #[test]
    fn build_goal_resolves_rule_and_rewards_in_order() {
        let mut symbols = SymbolTable::default();
        symbols.goals.insert("g".into(), uuid_from_token(&NAMESPACE_GOAL, "g"));
        symbols.rules.insert("r".into(), uuid_from_token(&NAMESPACE_RULE, "r"));
        symbols
            .rewards
            .insert("first".into(), uuid_from_token(&NAMESPACE_REWARD, "first"));
        symbols
            .rewards
            .insert("second".into(), uuid_from_token(&NAMESPACE_REWARD, "second"));

        let raw = RawGoal {
            id: "g".into(),
            name: "G".into(),
            rule: "r".into(),
            repeatable: true,
            group_completable: true,
            roles: HashSet::new(),
            rewards: vec!["second".into(), "first".into()],
        };
        let goal = build_goal(&raw, &symbols).unwrap();
        assert!(goal.repeatable);
        assert!(goal.group_completable);
        // reward order from the definition is preserved
        assert_eq!(goal.rewards, vec![
            uuid_from_token(&NAMESPACE_REWARD, "second"),
            uuid_from_token(&NAMESPACE_REWARD, "first"),
        ]);
    }

    #[test]
    fn unknown_references_are_validation_errors() {
        let raw = RawGoal {
            id: "g".into(),
            name: "G".into(),
            rule: "ghost-rule".into(),
            repeatable: false,
            group_completable: false,
            roles: HashSet::new(),
            rewards: vec!["ghost-reward".into()],
        };
        let mut errors = Vec::new();
        validate_goal(&raw, &SymbolTable::default(), &mut errors);
        assert_eq!(errors.len(), 2);
    }
}
