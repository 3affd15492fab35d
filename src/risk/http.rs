//! Client for the College Football Risk stats API.

use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::{
    config::Settings,
    core::{build_client, http::json_headers, KeyedCache},
    error::StarsError,
    Result,
};

use super::types::{Mercenary, PlayerInfo, PlayerStars, RosterPlayer, Turn};

#[cfg(test)]
mod tests;

/// Most names sent to `/players/batch` in one request.
pub const MAX_BATCH_SIZE: usize = 400;

/// Team-scoped, caching reader for the stats API.
///
/// Roster, mercenary and turn lists are fetched at most once per client.
/// Player details are cached by name. Failures are returned as-is; this API
/// is not retried.
pub struct RiskClient {
    http: Client,
    base_url: String,
    team: String,
    players: OnceCell<Vec<RosterPlayer>>,
    mercenaries: OnceCell<Vec<Mercenary>>,
    turns: OnceCell<Vec<Turn>>,
    player_info: KeyedCache<String, PlayerInfo>,
}

impl RiskClient {
    pub fn new(http: Client, base_url: impl Into<String>, team: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            team: team.into(),
            players: OnceCell::new(),
            mercenaries: OnceCell::new(),
            turns: OnceCell::new(),
            player_info: KeyedCache::new(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let http = build_client(settings.request_timeout)?;
        Ok(Self::new(http, &settings.risk_base_url, &settings.team))
    }

    pub fn team(&self) -> &str {
        &self.team
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(%url, ?params, "GET");

        let res = self
            .http
            .get(&url)
            .headers(json_headers())
            .query(params)
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await?;

        Ok(res)
    }

    /// Roster of the configured team.
    pub async fn players(&self) -> Result<&[RosterPlayer]> {
        self.players
            .get_or_try_init(|| async {
                self.get_json("players", &[("team", self.team.as_str())])
                    .await
            })
            .await
            .map(Vec::as_slice)
    }

    /// Mercenaries playing for the configured team.
    pub async fn mercenaries(&self) -> Result<&[Mercenary]> {
        self.mercenaries
            .get_or_try_init(|| async {
                self.get_json("mercs", &[("team", self.team.as_str())])
                    .await
            })
            .await
            .map(Vec::as_slice)
    }

    /// Detail record for one player, from cache when possible.
    pub async fn player_info(&self, name: &str) -> Result<PlayerInfo> {
        if let Some(info) = self.player_info.get(name) {
            return Ok(info);
        }

        let info: PlayerInfo = self.get_json("player", &[("player", name)]).await?;
        self.player_info.insert(name.to_string(), info.clone());
        Ok(info)
    }

    /// Detail records for many players, [`MAX_BATCH_SIZE`] names per request.
    ///
    /// Every returned record is also stored in the per-name cache.
    pub async fn batch_player_info(&self, names: &[String]) -> Result<Vec<PlayerInfo>> {
        let mut all = Vec::with_capacity(names.len());

        for chunk in names.chunks(MAX_BATCH_SIZE) {
            let joined = chunk.join(",");
            debug!(count = chunk.len(), "Fetching player batch");
            let infos: Vec<PlayerInfo> = self
                .get_json("players/batch", &[("players", joined.as_str())])
                .await?;

            for info in &infos {
                self.player_info.insert(info.name.clone(), info.clone());
            }
            all.extend(infos);
        }

        Ok(all)
    }

    /// Overall rating of each named player, in the given order.
    pub async fn player_stars(&self, names: &[String]) -> Result<Vec<PlayerStars>> {
        let mut stars = Vec::with_capacity(names.len());
        for name in names {
            let info = self.player_info(name).await?;
            stars.push(PlayerStars {
                name: name.clone(),
                stars: info.ratings.overall,
            });
        }
        Ok(stars)
    }

    /// Star value embedded in each mercenary roster entry.
    pub fn mercenary_stars(&self, mercs: &[Mercenary]) -> Vec<PlayerStars> {
        mercs
            .iter()
            .map(|m| PlayerStars {
                name: m.player.clone(),
                stars: m.stars,
            })
            .collect()
    }

    /// All turns, sorted by id.
    pub async fn turns(&self) -> Result<&[Turn]> {
        self.turns
            .get_or_try_init(|| async {
                let mut turns: Vec<Turn> = self.get_json("turns", &[]).await?;
                turns.sort_by_key(|t| t.id);
                Ok::<_, StarsError>(turns)
            })
            .await
            .map(Vec::as_slice)
    }

    /// The most recently completed turn.
    ///
    /// Normally the last turn is the one in progress, so this is the
    /// second-to-last. If the last turn is already complete and not active
    /// (between seasons), that turn is returned instead.
    pub async fn previous_turn(&self) -> Result<Turn> {
        let turns = self.turns().await?;
        previous_completed_turn(turns)
            .cloned()
            .ok_or(StarsError::TurnHistoryTooShort { len: turns.len() })
    }
}

fn previous_completed_turn(turns: &[Turn]) -> Option<&Turn> {
    match turns {
        [] => None,
        [.., last] if last.complete && !last.active => Some(last),
        [.., previous, _] => Some(previous),
        [_] => None,
    }
}
