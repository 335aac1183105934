//! ** idgen module **
//! Namespaces and helpers for generating stable v5 uuids for entities built
//! from organisation definition files. Runtime-created records
//! (`FinishedTask`, `FinishedGoal`) use v4 (random) UUIDs instead.
use uuid::Uuid;

pub const NAMESPACE_ORGANISATION: Uuid = uuid::uuid!("6f0cf380-16c2-4e3c-8a5f-8b0b1a5e1a01");

pub const NAMESPACE_TASK: Uuid = uuid::uuid!("b4a9bd03-86bc-4d12-9d7c-3f6d0c5b3e4a");

pub const NAMESPACE_RULE: Uuid = uuid::uuid!("eed0a2f1-5c3a-4c25-9b2e-7a1d9f64c8b2");

pub const NAMESPACE_GOAL: Uuid = uuid::uuid!("0c7de4e5-98ab-4a77-a9ea-52be4f1c6d93");

pub const NAMESPACE_REWARD: Uuid = uuid::uuid!("8d11bb7d-3c42-44a4-bd92-16febd4ac0e4");

pub const NAMESPACE_PLAYER: Uuid = uuid::uuid!("41b8aaf5-76ef-43bc-bfdf-90a9c10deaf5");

pub const NAMESPACE_GROUP: Uuid = uuid::uuid!("d9e2b1a6-0d3b-48c9-ae5d-63c2a7f4b810");

/// Generate a v5 UUID for a given symbol token from a definition file.
///
/// Uses the namespaces above to separate tasks / rules / goals / rewards /
/// players / groups.
pub fn uuid_from_token(namespace: &Uuid, token: &str) -> Uuid {
    Uuid::new_v5(namespace, token.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_token_same_namespace_is_deterministic() {
        let a = uuid_from_token(&NAMESPACE_TASK, "write-report");
        let b = uuid_from_token(&NAMESPACE_TASK, "write-report");
        assert_eq!(a, b);
    }

    #[test]
    fn namespaces_separate_identical_tokens() {
        let task = uuid_from_token(&NAMESPACE_TASK, "daily");
        let goal = uuid_from_token(&NAMESPACE_GOAL, "daily");
        assert_ne!(task, goal);
    }
}
