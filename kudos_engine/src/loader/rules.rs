//! module `loader::rules`

use anyhow::{Result, bail};
use serde::Deserialize;
use uuid::Uuid;

use crate::loader::SymbolTable;
use crate::rule::{GoalRule, RuleKind};

/// The raw version of a [`GoalRule`] from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRule {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub kind: RawRuleKind,
}

/// The raw version of a [`RuleKind`]; task references are symbols.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RawRuleKind {
    AllTasks { tasks: Vec<String> },
    AnyTask { tasks: Vec<String> },
    Points { threshold: u64 },
}

/// Collect definition problems for one raw rule.
pub fn validate_rule(raw: &RawRule, symbols: &SymbolTable, errors: &mut Vec<String>) {
    match &raw.kind {
        RawRuleKind::AllTasks { tasks } | RawRuleKind::AnyTask { tasks } => {
            if tasks.is_empty() {
                errors.push(format!("rule '{}': task list is empty", raw.id));
            }
            for task in tasks {
                if !symbols.tasks.contains_key(task) {
                    errors.push(format!("rule '{}': unknown task symbol '{task}'", raw.id));
                }
            }
        },
        RawRuleKind::Points { threshold } => {
            if *threshold == 0 {
                errors.push(format!("rule '{}': points threshold must be positive", raw.id));
            }
        },
    }
}

/// Build a [`GoalRule`] from its raw form.
///
/// # Errors
/// - on failed symbol lookup
pub fn build_rule(raw: &RawRule, symbols: &SymbolTable) -> Result<GoalRule> {
    let Some(id) = symbols.rules.get(&raw.id) else {
        bail!("building rule '{}': symbol not registered", raw.id);
    };
    let kind = match &raw.kind {
        RawRuleKind::AllTasks { tasks } => RuleKind::AllTasks {
            tasks: resolve_tasks(&raw.id, tasks, symbols)?,
        },
        RawRuleKind::AnyTask { tasks } => RuleKind::AnyTask {
            tasks: resolve_tasks(&raw.id, tasks, symbols)?,
        },
        RawRuleKind::Points { threshold } => RuleKind::Points { threshold: *threshold },
    };
    Ok(GoalRule {
        id: *id,
        symbol: raw.id.clone(),
        name: raw.name.clone(),
        description: raw.description.clone(),
        kind,
    })
}

fn resolve_tasks(rule_id: &str, tasks: &[String], symbols: &SymbolTable) -> Result<Vec<Uuid>> {
    tasks
        .iter()
        .map(|task| {
            symbols
                .tasks
                .get(task)
                .copied()
                .ok_or_else(|| anyhow::anyhow!("building rule '{rule_id}': unknown task symbol '{task}'"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::idgen::{NAMESPACE_RULE, NAMESPACE_TASK, uuid_from_token};

    fn symbols_with_task(token: &str) -> SymbolTable {
        let mut symbols = SymbolTable::default();
        symbols
            .tasks
            .insert(token.to_string(), uuid_from_token(&NAMESPACE_TASK, token));
        symbols
    }

    #[test]
    fn duplicate_task_symbols_survive_resolution() {
        // a task required twice stays in the list twice
        let mut symbols = symbols_with_task("t");
        symbols.rules.insert("r".into(), uuid_from_token(&NAMESPACE_RULE, "r"));
        let raw = RawRule {
            id: "r".into(),
            name: "R".into(),
            description: String::new(),
            kind: RawRuleKind::AllTasks {
                tasks: vec!["t".into(), "t".into()],
            },
        };
        let rule = build_rule(&raw, &symbols).unwrap();
        assert!(matches!(&rule.kind, RuleKind::AllTasks { tasks } if tasks.len() == 2));
    }

    #[test]
    fn empty_task_list_is_a_validation_error() {
        let raw = RawRule {
            id: "r".into(),
            name: "R".into(),
            description: String::new(),
            kind: RawRuleKind::AnyTask { tasks: Vec::new() },
        };
        let mut errors = Vec::new();
        validate_rule(&raw, &SymbolTable::default(), &mut errors);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("empty"));
    }

    #[test]
    fn zero_threshold_is_a_validation_error() {
        let raw = RawRule {
            id: "r".into(),
            name: "R".into(),
            description: String::new(),
            kind: RawRuleKind::Points { threshold: 0 },
        };
        let mut errors = Vec::new();
        validate_rule(&raw, &SymbolTable::default(), &mut errors);
        assert_eq!(errors.len(), 1);
    }
}
