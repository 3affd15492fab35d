//! Stars table and the per-turn CSV report.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::{
    risk::{PlayerStars, RiskClient},
    Result,
};

/// Column headers of the stars CSV.
pub const CSV_HEADER: [&str; 13] = [
    "Reddit Name",
    "Original Team",
    "Overall Stars",
    "Last Turn Played",
    "Last Turn Territory",
    "Total Turns",
    "Total Turns Stars",
    "Game Turns",
    "Game Turns Stars",
    "MVPs",
    "MVP Stars",
    "Streak",
    "Streak Stars",
];

/// Stars for every player and mercenary on the team, roster order first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StarsTable {
    entries: Vec<PlayerStars>,
}

impl StarsTable {
    /// Fetch rosters and player details and build the table.
    ///
    /// Details are batch-fetched up front so the per-player star lookups are
    /// all cache hits.
    pub async fn collect(risk: &RiskClient) -> Result<Self> {
        let player_names: Vec<String> = risk
            .players()
            .await?
            .iter()
            .map(|p| p.player.clone())
            .collect();
        let mercs = risk.mercenaries().await?;
        let merc_names: Vec<String> = mercs.iter().map(|m| m.player.clone()).collect();

        risk.batch_player_info(&player_names).await?;
        risk.batch_player_info(&merc_names).await?;

        let table: Self = risk
            .player_stars(&player_names)
            .await?
            .into_iter()
            .chain(risk.mercenary_stars(mercs))
            .collect();

        info!(
            players = player_names.len(),
            mercenaries = merc_names.len(),
            entries = table.len(),
            "Collected stars"
        );
        Ok(table)
    }

    /// Insert, or overwrite in place when the name is already present.
    pub fn upsert(&mut self, entry: PlayerStars) {
        match self.entries.iter_mut().find(|e| e.name == entry.name) {
            Some(existing) => existing.stars = entry.stars,
            None => self.entries.push(entry),
        }
    }

    /// Case-insensitive lookup; returns the entry with its canonical name.
    pub fn lookup(&self, name: &str) -> Option<&PlayerStars> {
        let wanted = name.trim().to_lowercase();
        self.entries.iter().find(|e| e.name.to_lowercase() == wanted)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerStars> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<PlayerStars> for StarsTable {
    fn from_iter<I: IntoIterator<Item = PlayerStars>>(iter: I) -> Self {
        let mut table = Self::default();
        for entry in iter {
            table.upsert(entry);
        }
        table
    }
}

/// Render the CSV, one row per table entry.
///
/// Fields are quoted by the `csv` writer when they contain a comma, quote or
/// newline.
pub async fn render_csv(risk: &RiskClient, table: &StarsTable) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for entry in table.iter() {
        let info = risk.player_info(&entry.name).await?;
        let (last_played, territory) = match info.last_turn() {
            Some(turn) => (
                format!("{}/{}", turn.season, turn.day),
                turn.territory.clone().unwrap_or_default(),
            ),
            None => (String::new(), String::new()),
        };

        writer.write_record([
            entry.name.clone(),
            info.team_name().to_string(),
            entry.stars.to_string(),
            last_played,
            territory,
            info.stats.total_turns.to_string(),
            info.ratings.total_turns.to_string(),
            info.stats.game_turns.to_string(),
            info.ratings.game_turns.to_string(),
            info.stats.mvps.to_string(),
            info.ratings.mvps.to_string(),
            info.stats.streak.to_string(),
            info.ratings.streak.to_string(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// `Season {season} Day {day} {suffix}` for the previous completed turn.
pub async fn report_file_name(risk: &RiskClient, suffix: &str) -> Result<String> {
    let turn = risk.previous_turn().await?;
    Ok(format!("Season {} Day {} {}", turn.season, turn.day, suffix))
}

/// Write the report into `out_dir` and return its path.
pub async fn write_report(
    risk: &RiskClient,
    table: &StarsTable,
    out_dir: &Path,
    suffix: &str,
) -> Result<PathBuf> {
    let path = out_dir.join(report_file_name(risk, suffix).await?);
    info!("Writing CSV file \"{}\"", path.display());

    let csv = render_csv(risk, table).await?;
    std::fs::write(&path, csv)?;

    info!("Done writing CSV file.");
    Ok(path)
}
