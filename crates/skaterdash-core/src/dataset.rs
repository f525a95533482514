// Dataset store: the season's per-player, per-situation skater table.
//
// Reads a MoneyPuck-format skaters CSV. Identity columns (playerId, name,
// team, position, situation) are typed; every other column is numeric and
// addressed by its header name. The table is read-only after load.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Situation tag for rows that cover all game states.
pub const ALL_SITUATIONS: &str = "all";

const COL_PLAYER_ID: &str = "playerId";
const COL_NAME: &str = "name";
const COL_TEAM: &str = "team";
const COL_POSITION: &str = "position";
const COL_SITUATION: &str = "situation";

const IDENTITY_COLUMNS: &[&str] = &[COL_PLAYER_ID, COL_NAME, COL_TEAM, COL_POSITION, COL_SITUATION];

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("data file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read data file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("data file contains no player rows")]
    Empty,

    #[error("missing required column `{column}`")]
    MissingColumn { column: String },

    #[error("line {line}: invalid value `{value}` in column `{column}`")]
    Malformed {
        line: u64,
        column: String,
        value: String,
    },

    #[error("line {line}: duplicate row for {player} ({team}, {situation})")]
    DuplicateRow {
        line: u64,
        player: String,
        team: String,
        situation: String,
    },
}

// ---------------------------------------------------------------------------
// Identity and position
// ---------------------------------------------------------------------------

/// A player across rows: MoneyPuck's numeric id plus the display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerIdentity {
    pub player_id: u64,
    pub name: String,
}

impl PlayerIdentity {
    pub fn new(player_id: u64, name: impl Into<String>) -> Self {
        PlayerIdentity {
            player_id,
            name: name.into(),
        }
    }
}

impl fmt::Display for PlayerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Skater positions. `AllSkaters` is the derived union of the other four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Center,
    LeftWing,
    RightWing,
    Defenseman,
    AllSkaters,
}

impl Position {
    /// The concrete positions a row can carry.
    pub const CONCRETE: [Position; 4] = [
        Position::Center,
        Position::LeftWing,
        Position::RightWing,
        Position::Defenseman,
    ];

    /// Parse the CSV position code (`C`, `L`, `R`, `D`).
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "C" => Some(Position::Center),
            "L" | "LW" => Some(Position::LeftWing),
            "R" | "RW" => Some(Position::RightWing),
            "D" => Some(Position::Defenseman),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Position::Center => "C",
            Position::LeftWing => "LW",
            Position::RightWing => "RW",
            Position::Defenseman => "D",
            Position::AllSkaters => "A",
        }
    }

    /// Plural heading used for tabs and chart titles.
    pub fn label(&self) -> &'static str {
        match self {
            Position::Center => "Centers",
            Position::LeftWing => "Left Wingers",
            Position::RightWing => "Right Wingers",
            Position::Defenseman => "Defenseman",
            Position::AllSkaters => "All Skaters",
        }
    }

    /// Whether a row at `row_position` belongs to this position's view.
    pub fn includes(&self, row_position: Position) -> bool {
        *self == Position::AllSkaters || *self == row_position
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// Header name to position in a row's value vector.
#[derive(Debug, Default)]
struct ColumnIndex {
    by_name: HashMap<String, usize>,
}

/// One CSV row. Unique per (player, team, situation).
#[derive(Debug, Clone)]
pub struct PlayerStatRow {
    pub identity: PlayerIdentity,
    pub team: String,
    pub position: Position,
    pub situation: String,
    values: Vec<f64>,
    columns: Arc<ColumnIndex>,
}

impl PlayerStatRow {
    /// Raw stored value for a numeric column.
    pub fn stat(&self, key: &str) -> Option<f64> {
        self.columns.by_name.get(key).map(|&i| self.values[i])
    }

    /// Raw value, treating a missing column as zero.
    pub fn stat_or_zero(&self, key: &str) -> f64 {
        self.stat(key).unwrap_or(0.0)
    }

    pub fn is_all_situations(&self) -> bool {
        self.situation == ALL_SITUATIONS
    }
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// The loaded skater table.
#[derive(Debug, Clone)]
pub struct Dataset {
    rows: Vec<PlayerStatRow>,
    columns: Arc<ColumnIndex>,
}

impl Dataset {
    /// Load the skater table from a CSV file.
    pub fn load(path: &Path) -> Result<Self, DataLoadError> {
        let file = std::fs::File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DataLoadError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                DataLoadError::Io {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;
        let dataset = Self::from_reader(file)?;
        info!(
            "Loaded {} rows ({} players) from {}",
            dataset.rows.len(),
            dataset.players().len(),
            path.display()
        );
        Ok(dataset)
    }

    /// Parse the skater table from any reader.
    pub fn from_reader<R: Read>(rdr: R) -> Result<Self, DataLoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(rdr);

        let headers = reader.headers()?.clone();
        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(DataLoadError::Empty);
        }

        let find = |name: &str| -> Result<usize, DataLoadError> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| DataLoadError::MissingColumn {
                    column: name.to_string(),
                })
        };
        let id_col = find(COL_PLAYER_ID)?;
        let name_col = find(COL_NAME)?;
        let team_col = find(COL_TEAM)?;
        let pos_col = find(COL_POSITION)?;
        let sit_col = find(COL_SITUATION)?;

        // Numeric columns are everything that is not an identity column.
        let numeric: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| !IDENTITY_COLUMNS.contains(h))
            .map(|(i, h)| (i, h.to_string()))
            .collect();

        let mut columns = ColumnIndex::default();
        for (slot, (_, name)) in numeric.iter().enumerate() {
            columns.by_name.insert(name.clone(), slot);
        }
        let columns = Arc::new(columns);

        let mut rows = Vec::new();
        let mut seen_keys: HashSet<(u64, String, String)> = HashSet::new();

        for result in reader.records() {
            let record = result?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let field = |i: usize| record.get(i).unwrap_or("");

            let malformed = |column: &str, value: &str| DataLoadError::Malformed {
                line,
                column: column.to_string(),
                value: value.to_string(),
            };

            let raw_id = field(id_col);
            let player_id: u64 = raw_id.parse().map_err(|_| malformed(COL_PLAYER_ID, raw_id))?;

            let name = field(name_col);
            if name.is_empty() {
                return Err(malformed(COL_NAME, name));
            }
            let team = field(team_col).to_uppercase();
            if team.is_empty() {
                return Err(malformed(COL_TEAM, &team));
            }
            let raw_pos = field(pos_col);
            let position = Position::from_code(raw_pos).ok_or_else(|| malformed(COL_POSITION, raw_pos))?;
            let situation = field(sit_col).to_string();
            if situation.is_empty() {
                return Err(malformed(COL_SITUATION, &situation));
            }

            let mut values = Vec::with_capacity(numeric.len());
            for (i, column) in &numeric {
                let raw = field(*i);
                // MoneyPuck leaves some rate columns blank for low-usage rows.
                let value = if raw.is_empty() {
                    0.0
                } else {
                    raw.parse::<f64>()
                        .ok()
                        .filter(|v| v.is_finite())
                        .ok_or_else(|| malformed(column, raw))?
                };
                values.push(value);
            }

            if !seen_keys.insert((player_id, team.clone(), situation.clone())) {
                return Err(DataLoadError::DuplicateRow {
                    line,
                    player: name.to_string(),
                    team,
                    situation,
                });
            }

            rows.push(PlayerStatRow {
                identity: PlayerIdentity::new(player_id, name),
                team,
                position,
                situation,
                values,
                columns: Arc::clone(&columns),
            });
        }

        if rows.is_empty() {
            return Err(DataLoadError::Empty);
        }

        debug!("Parsed {} numeric columns", numeric.len());
        Ok(Dataset { rows, columns })
    }

    /// Fail with `MissingColumn` for the first key the file does not carry.
    pub fn require_columns<'a, I>(&self, keys: I) -> Result<(), DataLoadError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for key in keys {
            if !self.has_column(key) {
                return Err(DataLoadError::MissingColumn {
                    column: key.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn has_column(&self, key: &str) -> bool {
        self.columns.by_name.contains_key(key)
    }

    pub fn rows(&self) -> &[PlayerStatRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows for a position tab, in file order. `AllSkaters` excludes nothing.
    pub fn filter_by_position(&self, position: Position) -> Vec<&PlayerStatRow> {
        self.rows
            .iter()
            .filter(|r| position.includes(r.position))
            .collect()
    }

    /// Rows carrying the given situation tag, in file order.
    pub fn filter_by_situation(&self, situation: &str) -> Vec<&PlayerStatRow> {
        self.rows
            .iter()
            .filter(|r| r.situation == situation)
            .collect()
    }

    /// All rows for one player, in file order.
    pub fn rows_for<'a>(
        &'a self,
        player: &'a PlayerIdentity,
    ) -> impl Iterator<Item = &'a PlayerStatRow> + 'a {
        self.rows.iter().filter(move |r| r.identity == *player)
    }

    /// Distinct team abbreviations, sorted.
    pub fn teams(&self) -> BTreeSet<&str> {
        self.rows.iter().map(|r| r.team.as_str()).collect()
    }

    /// Distinct players across the whole table, first-seen order.
    pub fn players(&self) -> Vec<PlayerIdentity> {
        distinct_players(self.rows.iter())
    }
}

/// Distinct player identities in first-seen order.
pub fn distinct_players<'a, I>(rows: I) -> Vec<PlayerIdentity>
where
    I: IntoIterator<Item = &'a PlayerStatRow>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for row in rows {
        if seen.insert(&row.identity) {
            out.push(row.identity.clone());
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
