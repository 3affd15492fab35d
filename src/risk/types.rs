//! Payloads returned by the College Football Risk API.
//!
//! Every key the tool reads is spelled out here. Keys the service may omit
//! are `Option` or defaulted, so one sparse record doesn't fail a whole batch.

use serde::{Deserialize, Serialize};


/// Star rating, 0 through 5.
pub type Stars = u8;

/// Season/day/stars of a player's most recent turn, as embedded in the roster.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LastTurn {
    pub season: u32,
    pub day: u32,
    pub stars: Stars,
}

/// Entry of `/players?team=`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RosterPlayer {
    pub team: String,
    pub player: String,
    #[serde(rename = "turnsPlayed", default)]
    pub turns_played: u32,
    #[serde(default)]
    pub mvps: u32,
    #[serde(rename = "lastTurn", default)]
    pub last_turn: Option<LastTurn>,
}

/// Entry of `/mercs?team=`. Mercenaries carry their rating inline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Mercenary {
    pub team: String,
    pub player: String,
    #[serde(rename = "turnsPlayed", default)]
    pub turns_played: u32,
    #[serde(default)]
    pub mvps: u32,
    pub stars: Stars,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TeamRef {
    pub name: String,
}

/// Per-category star ratings; `overall` is the player's star count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Ratings {
    pub overall: Stars,
    pub total_turns: Stars,
    pub game_turns: Stars,
    pub mvps: Stars,
    pub streak: Stars,
}

/// Raw counters behind the ratings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Stats {
    pub total_turns: u32,
    pub game_turns: u32,
    pub mvps: u32,
    pub streak: u32,
}

/// One turn in a player's history, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlayerTurn {
    pub season: u32,
    pub day: u32,
    #[serde(default)]
    pub stars: Stars,
    #[serde(default)]
    pub mvp: bool,
    #[serde(default)]
    pub territory: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
}

/// Detail record from `/player` and `/players/batch`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlayerInfo {
    pub name: String,
    #[serde(default)]
    pub team: Option<TeamRef>,
    #[serde(default)]
    pub ratings: Ratings,
    #[serde(default)]
    pub stats: Stats,
    #[serde(default)]
    pub turns: Vec<PlayerTurn>,
}

impl PlayerInfo {
    pub fn team_name(&self) -> &str {
        self.team.as_ref().map(|t| t.name.as_str()).unwrap_or("")
    }

    /// Most recent turn played, if any.
    pub fn last_turn(&self) -> Option<&PlayerTurn> {
        self.turns.first()
    }
}

/// Entry of `/turns`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Turn {
    pub id: u32,
    pub season: u32,
    pub day: u32,
    #[serde(default)]
    pub complete: bool,
    #[serde(default)]
    pub active: bool,
}

/// Star count for one player or mercenary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerStars {
    pub name: String,
    pub stars: Stars,
}
