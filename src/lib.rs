//! Risk Stars Library
//!
//! Keeps a College Football Risk team's Discord server in sync with the
//! game: every member's nickname shows their Risk name and star rating, and a
//! CSV of the team's stars is written after each turn.
//!
//! ## Features
//!
//! - **Risk API client**: cached roster, mercenary, player detail and turn
//!   lookups, with batched detail fetches
//! - **Discord API client**: paginated member lists, role lookups and
//!   nickname updates that honor Discord's rate limits and retry protocol
//! - **Stars report**: one CSV row per player for the previous turn
//! - **Nickname map**: built from the team's tracking spreadsheet
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use risk_stars::{commands::stars_report::StarsTable, risk::RiskClient, Settings};
//!
//! # async fn example() -> risk_stars::Result<()> {
//! let settings = Settings::load("settings.json".as_ref())?;
//! let risk = RiskClient::from_settings(&settings)?;
//!
//! let stars = StarsTable::collect(&risk).await?;
//! for entry in stars.iter() {
//!     println!("{}: {}", entry.name, entry.stars);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Configuration
//!
//! Point the CLI at a settings file other than `./settings.json`:
//! ```bash
//! export RISK_STARS_SETTINGS=/etc/risk-stars/settings.json
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod discord;
pub mod error;
pub mod logging;
pub mod mapping;
pub mod risk;

// Re-export commonly used types
pub use cli::types::{GuildId, RoleId, UserId};
pub use config::Settings;
pub use error::{FatalKind, Result, StarsError};

pub const SETTINGS_ENV_VAR: &str = "RISK_STARS_SETTINGS";
