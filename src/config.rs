//! Settings and secrets loaded from `settings.json`.
//!
//! The file has two sections: `secrets` (tokens and Discord ids) and
//! `settings` (team name and tunables). Required keys are checked once at
//! startup and reported by their full path so a typo is easy to find.

use std::{path::Path, time::Duration};

use serde::Deserialize;

use crate::{
    cli::types::{GuildId, UserId},
    error::{Result, StarsError},
};


pub const DEFAULT_RISK_BASE_URL: &str = "https://collegefootballrisk.com/api";
pub const DEFAULT_DISCORD_BASE_URL: &str = "https://discord.com/api/v10";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_STAR_CHAR: &str = "⭐";
pub const DEFAULT_CSV_SUFFIX: &str = "Stars.csv";
pub const DEFAULT_USERNAME_MAP: &str = "username_map.json";
pub const DEFAULT_TEST_USERNAME_MAP: &str = "test_username_map.json";
pub const DEFAULT_TEST_PLAYER: &str = "EpicWolverine";

#[derive(Debug, Default, Deserialize)]
struct RawSettingsFile {
    #[serde(default)]
    secrets: RawSecrets,
    #[serde(default)]
    settings: RawSettings,
}

#[derive(Debug, Default, Deserialize)]
struct RawSecrets {
    bot_token: Option<String>,
    client_id: Option<String>,
    guild_id: Option<String>,
    test_guild_id: Option<String>,
    test_user_id: Option<String>,
    bot_exclusion_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    team: Option<String>,
    verified_role: Option<String>,
    risk_base_url: Option<String>,
    discord_base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    max_retries: Option<u32>,
    star_char: Option<String>,
    csv_suffix: Option<String>,
    username_map: Option<String>,
    test_username_map: Option<String>,
    test_player: Option<String>,
}

/// Discord credentials. Never logged.
#[derive(Clone)]
pub struct Secrets {
    pub bot_token: String,
    pub client_id: String,
    pub guild_id: GuildId,
    pub test_guild_id: GuildId,
    pub test_user_id: UserId,
    /// A member the bot must never rename (usually the server owner).
    pub bot_exclusion_id: UserId,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("bot_token", &"<redacted>")
            .field("client_id", &self.client_id)
            .field("guild_id", &self.guild_id)
            .field("test_guild_id", &self.test_guild_id)
            .field("test_user_id", &self.test_user_id)
            .field("bot_exclusion_id", &self.bot_exclusion_id)
            .finish()
    }
}

/// Everything the clients and commands need, validated.
#[derive(Debug, Clone)]
pub struct Settings {
    pub secrets: Secrets,
    pub team: String,
    pub verified_role: String,
    pub risk_base_url: String,
    pub discord_base_url: String,
    pub request_timeout: Duration,
    /// `None` retries rate-limited Discord calls forever.
    pub max_retries: Option<u32>,
    pub star_char: String,
    pub csv_suffix: String,
    pub username_map: String,
    pub test_username_map: String,
    /// Player name shown in the `test-nickname` command's nickname.
    pub test_player: String,
}

fn require(key: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(StarsError::MissingConfig {
            key: key.to_string(),
        }),
    }
}

impl Settings {
    /// Read and validate a settings file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse and validate settings from a JSON string.
    pub fn from_json(contents: &str) -> Result<Self> {
        let raw: RawSettingsFile = serde_json::from_str(contents)?;
        let RawSettingsFile { secrets, settings } = raw;

        let secrets = Secrets {
            bot_token: require("secrets.bot_token", secrets.bot_token)?,
            client_id: require("secrets.client_id", secrets.client_id)?,
            guild_id: GuildId::new(require("secrets.guild_id", secrets.guild_id)?),
            test_guild_id: GuildId::new(require("secrets.test_guild_id", secrets.test_guild_id)?),
            test_user_id: UserId::new(require("secrets.test_user_id", secrets.test_user_id)?),
            bot_exclusion_id: UserId::new(require(
                "secrets.bot_exclusion_id",
                secrets.bot_exclusion_id,
            )?),
        };

        Ok(Self {
            secrets,
            team: require("settings.team", settings.team)?,
            verified_role: require("settings.verified_role", settings.verified_role)?,
            risk_base_url: trim_base(
                settings
                    .risk_base_url
                    .unwrap_or_else(|| DEFAULT_RISK_BASE_URL.to_string()),
            ),
            discord_base_url: trim_base(
                settings
                    .discord_base_url
                    .unwrap_or_else(|| DEFAULT_DISCORD_BASE_URL.to_string()),
            ),
            request_timeout: timeout(settings.request_timeout_secs)?,
            max_retries: settings.max_retries,
            star_char: settings
                .star_char
                .unwrap_or_else(|| DEFAULT_STAR_CHAR.to_string()),
            csv_suffix: settings
                .csv_suffix
                .unwrap_or_else(|| DEFAULT_CSV_SUFFIX.to_string()),
            username_map: settings
                .username_map
                .unwrap_or_else(|| DEFAULT_USERNAME_MAP.to_string()),
            test_username_map: settings
                .test_username_map
                .unwrap_or_else(|| DEFAULT_TEST_USERNAME_MAP.to_string()),
            test_player: settings
                .test_player
                .unwrap_or_else(|| DEFAULT_TEST_PLAYER.to_string()),
        })
    }

    /// Guild the run targets: production only when asked for.
    pub fn guild_id(&self, prod: bool) -> &GuildId {
        if prod {
            &self.secrets.guild_id
        } else {
            &self.secrets.test_guild_id
        }
    }

    /// Nickname map file matching the selected guild.
    pub fn username_map_path(&self, prod: bool) -> &str {
        if prod {
            &self.username_map
        } else {
            &self.test_username_map
        }
    }
}

fn timeout(secs: Option<u64>) -> Result<Duration> {
    match secs.unwrap_or(DEFAULT_TIMEOUT_SECS) {
        0 => Err(StarsError::InvalidConfig {
            key: "settings.request_timeout_secs".to_string(),
            reason: "must be at least 1 second".to_string(),
        }),
        secs => Ok(Duration::from_secs(secs)),
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
