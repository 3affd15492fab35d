//! Command implementations for the Risk stars tool

pub mod nicknames;
pub mod stars_report;
pub mod username_map;


use std::path::Path;

use tracing::{info, warn};

use crate::{
    config::Settings,
    discord::{authorize_url, DiscordClient},
    mapping::UsernameMap,
    risk::RiskClient,
    Result,
};

use nicknames::set_discord_nicknames;
use stars_report::{write_report, StarsTable};

/// Handle the run command: CSV report (unless `nicknames_only`), then nicknames.
pub async fn handle_run(
    settings: &Settings,
    prod: bool,
    nicknames_only: bool,
    out_dir: &Path,
) -> Result<()> {
    let risk = RiskClient::from_settings(settings)?;
    let discord = DiscordClient::from_settings(settings, prod)?;
    info!(guild = %discord.guild_id(), team = risk.team(), prod, "Starting run");

    run_with_clients(
        &risk,
        &discord,
        settings,
        Path::new(settings.username_map_path(prod)),
        nicknames_only,
        out_dir,
    )
    .await
}

/// The run workflow against already-built clients.
pub async fn run_with_clients(
    risk: &RiskClient,
    discord: &DiscordClient,
    settings: &Settings,
    map_path: &Path,
    nicknames_only: bool,
    out_dir: &Path,
) -> Result<()> {
    let stars = StarsTable::collect(risk).await?;
    if stars.is_empty() {
        warn!(team = risk.team(), "No players or mercenaries found for the team");
    }

    if !nicknames_only {
        write_report(risk, &stars, out_dir, &settings.csv_suffix).await?;
    }

    let map = UsernameMap::load(map_path)?;
    set_discord_nicknames(discord, &stars, &map, settings).await?;
    Ok(())
}

/// Handle the auth command: print the bot authorization link.
pub fn handle_auth(settings: &Settings, prod: bool) -> String {
    let url = authorize_url(
        &settings.discord_base_url,
        &settings.secrets.client_id,
        settings.guild_id(prod),
    );
    info!("Open this link to add the bot to the guild: {}", url);
    url
}

/// Handle the test-nickname command.
pub async fn handle_test_nickname(settings: &Settings) -> Result<()> {
    let discord = DiscordClient::from_settings(settings, false)?;
    nicknames::handle_test_nickname(&discord, settings).await
}
