//! CLI argument definitions and parsing structures.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::SETTINGS_ENV_VAR;

/// Arguments shared by every command that talks to Discord.
#[derive(Debug, Args)]
pub struct GuildSelection {
    /// Use the production guild and `username_map.json` instead of the test guild.
    #[clap(long)]
    pub prod: bool,
}

#[derive(Debug, Parser)]
#[clap(
    name = "risk-stars",
    about = "Log College Football Risk stars and push them to Discord nicknames"
)]
pub struct RiskStars {
    /// Path to settings.json (or set `RISK_STARS_SETTINGS` env var).
    #[clap(long, global = true, env = SETTINGS_ENV_VAR, default_value = "settings.json")]
    pub settings: PathBuf,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write the stars CSV for the previous turn, then update Discord nicknames.
    Run {
        #[clap(flatten)]
        guild: GuildSelection,

        /// Skip the CSV and only update Discord nicknames.
        #[clap(long)]
        nicknames_only: bool,

        /// Directory the CSV report is written to.
        #[clap(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Print the link that adds the bot to the guild.
    Auth {
        #[clap(flatten)]
        guild: GuildSelection,
    },

    /// Set the test user's nickname in the test guild.
    TestNickname,

    /// Convert the tracking spreadsheet exports into a nickname map.
    BuildMap {
        /// Players sheet exported as CSV.
        #[clap(long)]
        players: PathBuf,

        /// Diplomats sheet exported as CSV.
        #[clap(long)]
        diplomats: PathBuf,

        /// Where to write the JSON map.
        #[clap(long, default_value = "username_map.json")]
        out: PathBuf,
    },
}
