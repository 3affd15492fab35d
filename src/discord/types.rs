//! Discord REST payloads used by the nickname updater.

use serde::{Deserialize, Serialize};

use crate::cli::types::{RoleId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DiscordUser {
    pub id: UserId,
    pub username: String,
    /// "0" for accounts migrated to unique usernames.
    #[serde(default)]
    pub discriminator: Option<String>,
}

impl DiscordUser {
    /// `name#1234`, or just `name` for migrated accounts.
    pub fn tag(&self) -> String {
        match self.discriminator.as_deref() {
            Some(d) if d != "0" => format!("{}#{}", self.username, d),
            _ => self.username.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GuildMember {
    pub user: DiscordUser,
    #[serde(default)]
    pub nick: Option<String>,
    #[serde(default)]
    pub roles: Vec<RoleId>,
}

impl GuildMember {
    pub fn id(&self) -> &UserId {
        &self.user.id
    }

    pub fn has_role(&self, role: &RoleId) -> bool {
        self.roles.contains(role)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
}

/// Body of a non-2xx Discord response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    /// Seconds to wait before repeating the request.
    #[serde(default)]
    pub retry_after: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<u64>,
    #[serde(default)]
    pub global: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_guild_member_deserialization() {
        let member: GuildMember = serde_json::from_value(json!({
            "user": {"id": "140174746485653504", "username": "EpicWolverine", "discriminator": "3742"},
            "nick": "EpicWolverine ⭐⭐⭐⭐",
            "roles": ["111", "222"],
            "joined_at": "2021-01-01T00:00:00+00:00"
        }))
        .unwrap();

        assert_eq!(member.id().as_str(), "140174746485653504");
        assert_eq!(member.user.tag(), "EpicWolverine#3742");
        assert!(member.has_role(&RoleId::new("222")));
        assert!(!member.has_role(&RoleId::new("333")));
    }

    #[test]
    fn test_member_without_nick_or_roles() {
        let member: GuildMember = serde_json::from_value(json!({
            "user": {"id": "1", "username": "newuser", "discriminator": "0"}
        }))
        .unwrap();

        assert_eq!(member.nick, None);
        assert!(member.roles.is_empty());
        assert_eq!(member.user.tag(), "newuser");
    }

    #[test]
    fn test_error_body_rate_limited() {
        let body: ErrorBody = serde_json::from_value(json!({
            "message": "You are being rate limited.",
            "retry_after": 1.2,
            "global": false
        }))
        .unwrap();

        assert_eq!(body.retry_after, Some(1.2));
        assert_eq!(body.global, Some(false));
    }

    #[test]
    fn test_error_body_fatal() {
        let body: ErrorBody =
            serde_json::from_value(json!({"message": "Missing Access", "code": 50001})).unwrap();

        assert_eq!(body.retry_after, None);
        assert_eq!(body.message.as_deref(), Some("Missing Access"));
        assert_eq!(body.code, Some(50001));
    }
}
