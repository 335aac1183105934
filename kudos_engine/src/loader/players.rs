//! module `loader::players`
//!
//! Players and player groups share a file section family; groups reference
//! players by symbol.

use std::collections::HashSet;

use anyhow::{Result, bail};
use serde::Deserialize;

use crate::group::PlayerGroup;
use crate::loader::SymbolTable;
use crate::player::Player;

fn default_active() -> bool {
    true
}

/// The raw version of a [`Player`] from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPlayer {
    pub id: String,
    pub name: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub roles: HashSet<String>,
}

/// The raw version of a [`PlayerGroup`] from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct RawGroup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
}

/// Collect definition problems for one raw group.
pub fn validate_group(raw: &RawGroup, symbols: &SymbolTable, errors: &mut Vec<String>) {
    for member in &raw.members {
        if !symbols.players.contains_key(member) {
            errors.push(format!("group '{}': unknown player symbol '{member}'", raw.id));
        }
    }
}

/// Build a [`Player`] from its raw form. Balances and histories start
/// empty; runtime state is never defined in the file.
///
/// # Errors
/// - on failed symbol lookup
pub fn build_player(raw: &RawPlayer, symbols: &SymbolTable) -> Result<Player> {
    let Some(id) = symbols.players.get(&raw.id) else {
        bail!("building player '{}': symbol not registered", raw.id);
    };
    Ok(Player {
        id: *id,
        symbol: raw.id.clone(),
        name: raw.name.clone(),
        active: raw.active,
        roles: raw.roles.clone(),
        ..Player::default()
    })
}

/// Build a [`PlayerGroup`] from its raw form.
///
/// # Errors
/// - on failed symbol lookup
pub fn build_group(raw: &RawGroup, symbols: &SymbolTable) -> Result<PlayerGroup> {
    let Some(id) = symbols.groups.get(&raw.id) else {
        bail!("building group '{}': symbol not registered", raw.id);
    };
    let members = raw
        .members
        .iter()
        .map(|member| {
            symbols.players.get(member).copied().ok_or_else(|| {
                anyhow::anyhow!("building group '{}': unknown player symbol '{member}'", raw.id)
            })
        })
        .collect::<Result<HashSet<_>>>()?;
    Ok(PlayerGroup {
        id: *id,
        symbol: raw.id.clone(),
        name: raw.name.clone(),
        members,
        points: 0,
        coins: 0,
        level: None,
        awards: Vec::new(),
        finished_goals: Vec::new(),
    })
}
