//! Error types for the Risk stars tool

use std::fmt;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

#[cfg(test)]
mod tests;

pub type Result<T> = std::result::Result<T, StarsError>;

/// Discord errors that mean the bot is misconfigured. Nothing useful can be
/// done until someone fixes the bot's setup, so these stop the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatalKind {
    /// "Unknown Guild": the bot has not been added to the guild.
    UnknownGuild,
    /// "Missing Permissions": the Manage Nicknames permission was removed.
    MissingPermissions,
    /// "Missing Access": the Server Members privileged intent is disabled.
    MissingAccess,
}

impl FatalKind {
    /// Classify a Discord error `message` field.
    pub fn from_message(message: &str) -> Option<Self> {
        match message {
            "Unknown Guild" => Some(Self::UnknownGuild),
            "Missing Permissions" => Some(Self::MissingPermissions),
            "Missing Access" => Some(Self::MissingAccess),
            _ => None,
        }
    }

    /// What the operator has to do about it.
    pub fn remedy(&self) -> &'static str {
        match self {
            Self::UnknownGuild => {
                "The bot is not authorized for this guild. Run `risk-stars auth` and add it."
            }
            Self::MissingPermissions => {
                "The bot lost the Manage Nicknames permission. Re-grant it in the guild settings."
            }
            Self::MissingAccess => {
                "The Server Members intent is disabled. Enable it in the Discord developer portal."
            }
        }
    }
}

impl fmt::Display for FatalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::UnknownGuild => "Unknown Guild",
            Self::MissingPermissions => "Missing Permissions",
            Self::MissingAccess => "Missing Access",
        };
        write!(f, "{message}")
    }
}

#[derive(Error, Debug)]
pub enum StarsError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Missing configuration key `{key}`")]
    MissingConfig { key: String },

    #[error("Invalid configuration value for `{key}`: {reason}")]
    InvalidConfig { key: String, reason: String },

    #[error("Discord configuration problem ({kind}): {}", .kind.remedy())]
    Fatal { kind: FatalKind },

    #[error("Discord API returned {status}: {body}")]
    Api { status: StatusCode, body: Value },

    #[error("Gave up after {attempts} rate-limited attempts")]
    RetriesExhausted { attempts: u32 },

    #[error("Turn history has {len} turn(s); need a completed turn")]
    TurnHistoryTooShort { len: usize },


    #[error("Role not found: {name}")]
    RoleNotFound { name: String },
}

impl StarsError {
    /// True for errors that must end the run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, StarsError::Fatal { .. })
    }
}
