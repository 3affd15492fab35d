//! Nickname planning and the Discord update pass.

use tracing::{debug, error, info, warn};

use crate::{
    cli::types::UserId,
    config::Settings,
    discord::DiscordClient,
    error::StarsError,
    mapping::{PlayerMapping, UsernameMap},
    Result,
};

use super::stars_report::StarsTable;

/// Discord's nickname limit, in characters.
pub const NICKNAME_CHAR_LIMIT: usize = 32;

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// `"[prefix | ]name ⭐⭐⭐"`, or `None` when the player has no stars entry.
///
/// A prefix that would push the nickname past the limit is dropped.
pub fn player_nickname(
    mapping: &PlayerMapping,
    stars: &StarsTable,
    star_char: &str,
) -> Option<String> {
    let wanted = mapping.reddit.trim();
    let Some(entry) = stars.lookup(wanted) else {
        error!("Error: Reddit username \"{}\" is not in the star list.", wanted);
        return None;
    };

    let nickname = format!(
        "{} {}",
        entry.name,
        star_char.repeat(usize::from(entry.stars))
    );

    match mapping.prefix() {
        Some(prefix) => {
            let prefixed = format!("{} | {}", prefix, nickname);
            if char_len(&prefixed) <= NICKNAME_CHAR_LIMIT {
                Some(prefixed)
            } else {
                warn!(
                    "Warning: Prefixed nickname \"{}\" is >{} characters. Ignoring prefix.",
                    prefixed, NICKNAME_CHAR_LIMIT
                );
                Some(nickname)
            }
        }
        None => Some(nickname),
    }
}

/// What to do with every guild member.
#[derive(Debug, Default, PartialEq)]
pub struct NicknamePlan {
    pub updates: Vec<(UserId, String)>,
    /// Members with no entry in any section of the map.
    pub unmapped: Vec<UserId>,
    pub skipped: usize,
}

impl NicknamePlan {
    /// Decide each member's nickname. `never_rename` holds the bot itself and
    /// the configured exclusion id.
    pub fn build(
        member_ids: &[UserId],
        never_rename: &[&UserId],
        map: &UsernameMap,
        stars: &StarsTable,
        star_char: &str,
    ) -> Self {
        let mut plan = Self::default();

        for id in member_ids {
            if map.is_excluded(id) || never_rename.contains(&id) {
                plan.skipped += 1;
            } else if let Some(mapping) = map.players.get(id) {
                match player_nickname(mapping, stars, star_char) {
                    Some(nickname) => plan.updates.push((id.clone(), nickname)),
                    None => plan.skipped += 1,
                }
            } else if let Some(diplomat) = map.diplomats.get(id) {
                plan.updates.push((id.clone(), diplomat.display_nickname()));
            } else {
                plan.unmapped.push(id.clone());
            }
        }

        plan
    }
}

/// Send one nickname, unless it is over the limit. Returns whether it was sent.
pub async fn set_discord_nickname(
    discord: &DiscordClient,
    id: &UserId,
    nickname: &str,
) -> Result<bool> {
    if char_len(nickname) > NICKNAME_CHAR_LIMIT {
        warn!(
            "Warning: Nickname \"{}\" is >{} characters. Skipping.",
            nickname, NICKNAME_CHAR_LIMIT
        );
        return Ok(false);
    }
    discord.set_nickname(id, nickname).await?;
    Ok(true)
}

/// Apply the nickname map to every member of the guild.
///
/// A failed update is logged and the pass moves on; a fatal Discord error
/// aborts it.
pub async fn set_discord_nicknames(
    discord: &DiscordClient,
    stars: &StarsTable,
    map: &UsernameMap,
    settings: &Settings,
) -> Result<NicknamePlan> {
    info!("Setting Discord nicknames...");

    let member_ids = discord.guild_member_ids().await?;
    let bot_id = discord.bot_id().await?.clone();
    let never_rename = [&bot_id, &settings.secrets.bot_exclusion_id];
    let plan = NicknamePlan::build(
        &member_ids,
        &never_rename,
        map,
        stars,
        &settings.star_char,
    );

    for (id, nickname) in &plan.updates {
        match set_discord_nickname(discord, id, nickname).await {
            Ok(_) => {}
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => error!("Error: Could not set nickname of {}: {}", id, e),
        }
    }

    if !plan.unmapped.is_empty() {
        warn_unmapped(discord, &plan.unmapped, &settings.verified_role).await?;
    }

    info!("Done setting Discord nicknames.");
    Ok(plan)
}

/// Warn about verified members missing from the map; others are only
/// logged at debug level.
async fn warn_unmapped(discord: &DiscordClient, ids: &[UserId], verified_role: &str) -> Result<()> {
    let verified = match discord.role_id_by_name(verified_role).await {
        Ok(role) => Some(role),
        Err(StarsError::RoleNotFound { name }) => {
            warn!("Warning: Role \"{}\" not found; reporting every unmapped member.", name);
            None
        }
        Err(e) => return Err(e),
    };

    for id in ids {
        let member = discord.guild_member(id).await?;
        let username = member
            .as_ref()
            .map(|m| m.user.tag())
            .unwrap_or_else(|| "unknown".to_string());
        let is_verified = match (&verified, &member) {
            (Some(role), Some(m)) => m.has_role(role),
            (None, _) => true,
            (Some(_), None) => false,
        };

        if is_verified {
            warn!(
                "Warning: Discord ID {} (\"{}\") is not in the map file.",
                id, username
            );
        } else {
            debug!(%id, %username, "Unverified member not in the map file");
        }
    }

    Ok(())
}

/// Nickname used by the `test-nickname` command.
pub fn test_nickname(player: &str, star_char: &str) -> String {
    format!("test|{} {}", player, star_char.repeat(4))
}

/// Set the test user's nickname in the test guild.
pub async fn handle_test_nickname(discord: &DiscordClient, settings: &Settings) -> Result<()> {
    let nickname = test_nickname(&settings.test_player, &settings.star_char);
    set_discord_nickname(discord, &settings.secrets.test_user_id, &nickname).await?;
    Ok(())
}
