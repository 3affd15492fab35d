//! Entry point: parse CLI, set up logging and dispatch to command handlers.

use std::{path::Path, process::ExitCode};

use anyhow::Context;
use clap::Parser;
use risk_stars::{
    cli::{Commands, RiskStars},
    commands::{handle_auth, handle_run, handle_test_nickname, username_map::handle_build_map},
    logging, Settings, StarsError,
};
use tracing::{error, info};

fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    Settings::load(path).with_context(|| format!("could not load settings from {}", path.display()))
}

async fn run(app: RiskStars) -> anyhow::Result<()> {
    match app.command {
        Commands::Run {
            guild,
            nicknames_only,
            out_dir,
        } => {
            let settings = load_settings(&app.settings)?;
            handle_run(&settings, guild.prod, nicknames_only, &out_dir).await?
        }

        Commands::Auth { guild } => {
            let settings = load_settings(&app.settings)?;
            println!("{}", handle_auth(&settings, guild.prod));
        }

        Commands::TestNickname => {
            let settings = load_settings(&app.settings)?;
            handle_test_nickname(&settings).await?
        }

        Commands::BuildMap {
            players,
            diplomats,
            out,
        } => {
            handle_build_map(&players, &diplomats, &out)?;
        }
    }

    Ok(())
}

/// Run the CLI.
#[tokio::main]
async fn main() -> ExitCode {
    let app = RiskStars::parse();
    let guard = logging::init(Path::new("."));
    info!("Script start.");

    let code = match run(app).await {
        Ok(()) => {
            info!("Script end.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            match e.downcast_ref::<StarsError>() {
                Some(StarsError::Fatal { kind }) => {
                    error!("Stopping: {}", kind.remedy());
                }
                _ => error!("{:#}", e),
            }
            ExitCode::FAILURE
        }
    };

    // Flush the log file before exiting.
    drop(guard);
    code
}
