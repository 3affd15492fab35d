//! The nickname map: which Discord member is which Risk player or diplomat.
//!
//! ```json
//! {
//!   "players":   {"<discord id>": {"reddit": "EpicWolverine", "prefix": "Mod"}},
//!   "exclude":   {"<discord id>": {"reddit": "owner", "reason": "server owner"}},
//!   "diplomats": {"<discord id>": {"nickname": "Larry Scott", "team": "NCAA"}}
//! }
//! ```

use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};

use crate::{cli::types::UserId, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlayerMapping {
    /// Risk (reddit) username; matched case-insensitively.
    pub reddit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl PlayerMapping {
    /// Prefix, if one is set and not blank.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Diplomat {
    pub nickname: String,
    pub team: String,
}

impl Diplomat {
    pub fn display_nickname(&self) -> String {
        format!("{} | {}", self.nickname, self.team)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct UsernameMap {
    #[serde(default)]
    pub players: BTreeMap<UserId, PlayerMapping>,
    #[serde(default)]
    pub exclude: BTreeMap<UserId, PlayerMapping>,
    #[serde(default)]
    pub diplomats: BTreeMap<UserId, Diplomat>,
}

impl UsernameMap {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn is_excluded(&self, id: &UserId) -> bool {
        self.exclude.contains_key(id)
    }
}
