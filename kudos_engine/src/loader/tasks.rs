//! module `loader::tasks`

use std::collections::HashSet;

use anyhow::{Result, bail};
use serde::Deserialize;

use crate::loader::SymbolTable;
use crate::task::Task;

/// The raw version of a [`Task`] from TOML, with its symbol as `id`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTask {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tradeable: bool,
    #[serde(default)]
    pub roles: HashSet<String>,
}

/// Build a [`Task`] from its raw form. `number` is the task's expression
/// shorthand, assigned from declaration order by the loader.
///
/// # Errors
/// - on failed symbol lookup
pub fn build_task(raw: &RawTask, number: u64, symbols: &SymbolTable) -> Result<Task> {
    let Some(id) = symbols.tasks.get(&raw.id) else {
        bail!("building task '{}': symbol not registered", raw.id);
    };
    Ok(Task {
        id: *id,
        symbol: raw.id.clone(),
        number,
        name: raw.name.clone(),
        description: raw.description.clone(),
        tradeable: raw.tradeable,
        roles: raw.roles.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::idgen::{NAMESPACE_TASK, uuid_from_token};

    #[test]
    fn build_task_resolves_symbol_and_number() {
        let raw = RawTask {
            id: "write-report".into(),
            name: "Write a report".into(),
            description: String::new(),
            tradeable: true,
            roles: HashSet::from(["employee".to_string()]),
        };
        let mut symbols = SymbolTable::default();
        symbols
            .tasks
            .insert("write-report".into(), uuid_from_token(&NAMESPACE_TASK, "write-report"));

        let task = build_task(&raw, 3, &symbols).unwrap();
        assert_eq!(task.id, uuid_from_token(&NAMESPACE_TASK, "write-report"));
        assert_eq!(task.number, 3);
        assert!(task.tradeable);
        assert!(task.roles.contains("employee"));
    }

    #[test]
    fn build_task_fails_on_unregistered_symbol() {
        let raw = RawTask {
            id: "ghost".into(),
            name: "Ghost".into(),
            description: String::new(),
            tradeable: false,
            roles: HashSet::new(),
        };
        assert!(build_task(&raw, 1, &SymbolTable::default()).is_err());
    }
}
