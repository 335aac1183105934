//! module `loader::rewards`
//!
//! Reward amounts are validated here, at definition time; granting a built
//! reward can no longer fail.

use anyhow::{Result, bail};
use serde::Deserialize;

use crate::loader::SymbolTable;
use crate::reward::{Reward, RewardKind};

/// The raw version of a [`Reward`] from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct RawReward {
    pub id: String,
    pub kind: RawRewardKind,
}

/// The raw version of a [`RewardKind`]. Amounts deserialize signed so that
/// negative definitions are caught by validation instead of a cryptic
/// deserialization error.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RawRewardKind {
    Badge {
        name: String,
        #[serde(default)]
        description: String,
        #[serde(default)]
        icon: String,
    },
    Achievement {
        name: String,
        #[serde(default)]
        description: String,
    },
    Points {
        amount: i64,
    },
    Coins {
        amount: i64,
    },
    Level {
        index: u32,
        label: String,
    },
}

/// Collect definition problems for one raw reward.
pub fn validate_reward(raw: &RawReward, errors: &mut Vec<String>) {
    match &raw.kind {
        RawRewardKind::Points { amount } | RawRewardKind::Coins { amount } => {
            if *amount <= 0 {
                errors.push(format!("reward '{}': amount must be positive, got {amount}", raw.id));
            }
        },
        RawRewardKind::Level { label, .. } => {
            if label.trim().is_empty() {
                errors.push(format!("reward '{}': level label is empty", raw.id));
            }
        },
        RawRewardKind::Badge { name, .. } | RawRewardKind::Achievement { name, .. } => {
            if name.trim().is_empty() {
                errors.push(format!("reward '{}': name is empty", raw.id));
            }
        },
    }
}

/// Build a [`Reward`] from its raw form.
///
/// # Errors
/// - on failed symbol lookup
/// - on a non-positive amount (when called without prior validation)
pub fn build_reward(raw: &RawReward, symbols: &SymbolTable) -> Result<Reward> {
    let Some(id) = symbols.rewards.get(&raw.id) else {
        bail!("building reward '{}': symbol not registered", raw.id);
    };
    let kind = match &raw.kind {
        RawRewardKind::Badge {
            name,
            description,
            icon,
        } => RewardKind::Badge {
            name: name.clone(),
            description: description.clone(),
            icon: icon.clone(),
        },
        RawRewardKind::Achievement { name, description } => RewardKind::Achievement {
            name: name.clone(),
            description: description.clone(),
        },
        RawRewardKind::Points { amount } => RewardKind::Points {
            amount: positive_amount(&raw.id, *amount)?,
        },
        RawRewardKind::Coins { amount } => RewardKind::Coins {
            amount: positive_amount(&raw.id, *amount)?,
        },
        RawRewardKind::Level { index, label } => RewardKind::Level {
            index: *index,
            label: label.clone(),
        },
    };
    Ok(Reward {
        id: *id,
        symbol: raw.id.clone(),
        kind,
    })
}

fn positive_amount(reward_id: &str, amount: i64) -> Result<u64> {
    match u64::try_from(amount) {
        Ok(value) if value > 0 => Ok(value),
        _ => bail!("building reward '{reward_id}': amount must be positive, got {amount}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::idgen::{NAMESPACE_REWARD, uuid_from_token};

    fn registered(token: &str) -> SymbolTable {
        let mut symbols = SymbolTable::default();
        symbols
            .rewards
            .insert(token.to_string(), uuid_from_token(&NAMESPACE_REWARD, token));
        symbols
    }

    #[test]
    fn positive_amounts_build() {
        let raw = RawReward {
            id: "p".into(),
            kind: RawRewardKind::Points { amount: 10 },
        };
        let reward = build_reward(&raw, &registered("p")).unwrap();
        assert_eq!(reward.kind, RewardKind::Points { amount: 10 });
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let raw = RawReward {
            id: "p".into(),
            kind: RawRewardKind::Coins { amount: -5 },
        };
        let mut errors = Vec::new();
        validate_reward(&raw, &mut errors);
        assert_eq!(errors.len(), 1);
        assert!(build_reward(&raw, &registered("p")).is_err());
    }

    #[test]
    fn empty_level_label_is_a_validation_error() {
        let raw = RawReward {
            id: "l".into(),
            kind: RawRewardKind::Level {
                index: 1,
                label: "  ".into(),
            },
        };
        let mut errors = Vec::new();
        validate_reward(&raw, &mut errors);
        assert_eq!(errors.len(), 1);
    }
}
