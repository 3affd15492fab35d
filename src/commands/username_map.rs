//! Build the nickname map from the tracking spreadsheet's CSV exports.

use std::{collections::HashMap, path::Path};

use tracing::info;

use crate::{
    cli::types::UserId,
    mapping::{Diplomat, PlayerMapping, UsernameMap},
    Result,
};

pub const DISCORD_ID_COLUMN: &str = "Discord ID";
pub const REDDIT_COLUMN: &str = "Reddit";
pub const PREFIX_COLUMN: &str = "Discord Nickname Prefix";
pub const UPDATE_COLUMN: &str = "Update Discord Nickname with Bot?";
pub const NOTES_COLUMN: &str = "Notes";
pub const NICKNAME_COLUMN: &str = "Discord Nickname";
pub const TEAM_COLUMN: &str = "Team";

pub type SheetRow = HashMap<String, String>;

/// Read a sheet export into header-keyed rows.
pub fn read_sheet(path: &Path) -> Result<Vec<SheetRow>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

fn cell<'a>(row: &'a SheetRow, column: &str) -> &'a str {
    row.get(column).map(|s| s.trim()).unwrap_or("")
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Split player rows into `players` (bot updates their nickname) and
/// `exclude`. Rows without both a Discord id and a reddit name are ignored.
pub fn extract_players(rows: &[SheetRow], map: &mut UsernameMap) {
    for row in rows {
        let id = cell(row, DISCORD_ID_COLUMN);
        let reddit = cell(row, REDDIT_COLUMN);
        if id.is_empty() || reddit.is_empty() {
            continue;
        }

        let mapping = PlayerMapping {
            reddit: reddit.to_string(),
            prefix: non_empty(cell(row, PREFIX_COLUMN)),
            reason: non_empty(cell(row, NOTES_COLUMN)),
        };

        if cell(row, UPDATE_COLUMN) == "Yes" {
            map.players.insert(UserId::new(id), mapping);
        } else {
            map.exclude.insert(UserId::new(id), mapping);
        }
    }
}

pub fn extract_diplomats(rows: &[SheetRow], map: &mut UsernameMap) {
    for row in rows {
        let id = cell(row, DISCORD_ID_COLUMN);
        if id.is_empty() {
            continue;
        }
        map.diplomats.insert(
            UserId::new(id),
            Diplomat {
                nickname: cell(row, NICKNAME_COLUMN).to_string(),
                team: cell(row, TEAM_COLUMN).to_string(),
            },
        );
    }
}

/// Handle the build-map command
pub fn handle_build_map(players_csv: &Path, diplomats_csv: &Path, out: &Path) -> Result<UsernameMap> {
    let mut map = UsernameMap::default();
    extract_players(&read_sheet(players_csv)?, &mut map);
    extract_diplomats(&read_sheet(diplomats_csv)?, &mut map);
    map.save(out)?;

    info!(
        players = map.players.len(),
        excluded = map.exclude.len(),
        diplomats = map.diplomats.len(),
        "Wrote nickname map to {}",
        out.display()
    );
    Ok(map)
}
