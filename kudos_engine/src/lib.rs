#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]

pub const KUDOS_VERSION: &str = env!("CARGO_PKG_VERSION");

// Core modules
pub mod engine;
pub mod error;
pub mod goal;
pub mod group;
pub mod idgen;
pub mod loader;
pub mod player;
pub mod reward;
pub mod rule;
pub mod task;
pub mod world;

// Re-exports for convenience
pub use engine::{CompletedGoal, CompletionReport, GrantedReward, complete_task, evaluate_expression};
pub use error::EngineError;
pub use goal::{FinishedGoal, Goal, try_complete};
pub use group::PlayerGroup;
pub use loader::{load_organisation, organisation_from_toml};
pub use player::Player;
pub use reward::{Level, Reward, RewardHolder, RewardKind};
pub use rule::{GoalRule, RuleKind, RuleProgress};
pub use task::{FinishedTask, Task};
pub use world::{ActorId, Organisation};
