// Statistic catalog and team color map.
//
// Both are total mappings: every selectable statistic key has a label and
// every team abbreviation in the dataset has a color. Totality is checked
// once at startup so render paths never see a lookup miss.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// A statistic key that is not in the fixed statistic list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown statistic `{key}`")]
pub struct UnknownStatisticError {
    pub key: String,
}

impl UnknownStatisticError {
    pub fn new(key: impl Into<String>) -> Self {
        UnknownStatisticError { key: key.into() }
    }
}

/// Label or color tables that do not cover what the dashboard needs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("statistic `{key}` has no display label")]
    MissingStatLabel { key: String },

    #[error("statistic `{key}` is listed more than once")]
    DuplicateStat { key: String },

    #[error("statistic list is empty")]
    EmptyStatList,

    #[error("team `{team}` has no display color")]
    MissingTeamColor { team: String },

    #[error("team `{team}` has an invalid color `{value}` (expected #RRGGBB)")]
    InvalidTeamColor { team: String, value: String },
}

// ---------------------------------------------------------------------------
// Statistic descriptors
// ---------------------------------------------------------------------------

/// How a statistic's raw value is stored in the source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatUnit {
    Count,
    /// Stored in seconds, displayed in whole minutes.
    Seconds,
}

impl StatUnit {
    /// Convert a stored value into the value shown on charts and in hover text.
    pub fn display_value(self, raw: f64) -> f64 {
        match self {
            StatUnit::Count => raw,
            StatUnit::Seconds => (raw / 60.0).round(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatDescriptor {
    pub key: String,
    pub label: String,
    pub unit: StatUnit,
}

/// Keys whose source values are seconds.
const SECONDS_STATS: &[&str] = &["icetime", "timeOnBench"];

/// The fixed list of selectable skater statistics, in dropdown order, with
/// their display labels.
const BUILTIN_STATS: &[(&str, &str)] = &[
    ("games_played", "Games Played"),
    ("icetime", "Icetime (minutes)"),
    ("shifts", "Shifts"),
    ("gameScore", "Game Score"),
    ("onIce_xGoalsPercentage", "On-Ice xGoals %"),
    ("offIce_xGoalsPercentage", "Off-Ice xGoals %"),
    ("onIce_corsiPercentage", "On-Ice Corsi %"),
    ("offIce_corsiPercentage", "Off-Ice Corsi %"),
    ("onIce_fenwickPercentage", "On-Ice Fenwick %"),
    ("offIce_fenwickPercentage", "Off-Ice Fenwick %"),
    ("iceTimeRank", "Icetime Rank"),
    ("I_F_xOnGoal", "Expected Shots On Goal"),
    ("I_F_xGoals", "Expected Goals"),
    ("I_F_xRebounds", "Expected Rebounds"),
    ("I_F_xFreeze", "Expected Freezes"),
    ("I_F_xPlayStopped", "Expected Play Stopped"),
    ("I_F_xPlayContinuedInZone", "Expected Play Continued In Zone"),
    ("I_F_xPlayContinuedOutsideZone", "Expected Play Continued Outside Zone"),
    ("I_F_flurryAdjustedxGoals", "Flurry Adjusted xGoals"),
    ("I_F_scoreVenueAdjustedxGoals", "Score/Venue Adjusted xGoals"),
    ("I_F_flurryScoreVenueAdjustedxGoals", "Flurry Score/Venue Adjusted xGoals"),
    ("I_F_primaryAssists", "Primary Assists"),
    ("I_F_secondaryAssists", "Secondary Assists"),
    ("I_F_shotsOnGoal", "Shots On Goal"),
    ("I_F_missedShots", "Missed Shots"),
    ("I_F_blockedShotAttempts", "Blocked Shot Attempts"),
    ("I_F_shotAttempts", "Shot Attempts"),
    ("I_F_points", "Points"),
    ("I_F_goals", "Goals"),
    ("I_F_rebounds", "Rebounds"),
    ("I_F_reboundGoals", "Rebound Goals"),
    ("I_F_freeze", "Freezes"),
    ("I_F_playStopped", "Play Stopped"),
    ("I_F_playContinuedInZone", "Play Continued In Zone"),
    ("I_F_playContinuedOutsideZone", "Play Continued Outside Zone"),
    ("I_F_savedShotsOnGoal", "Saved Shots On Goal"),
    ("I_F_savedUnblockedShotAttempts", "Saved Unblocked Shot Attempts"),
    ("penalties", "Penalties"),
    ("I_F_penalityMinutes", "Penalty Minutes (Individual)"),
    ("I_F_faceOffsWon", "Faceoffs Won (Individual)"),
    ("I_F_hits", "Hits"),
    ("I_F_takeaways", "Takeaways"),
    ("I_F_giveaways", "Giveaways"),
    ("I_F_lowDangerShots", "Low Danger Shots"),
    ("I_F_mediumDangerShots", "Medium Danger Shots"),
    ("I_F_highDangerShots", "High Danger Shots"),
    ("I_F_lowDangerxGoals", "Low Danger xGoals"),
    ("I_F_mediumDangerxGoals", "Medium Danger xGoals"),
    ("I_F_highDangerxGoals", "High Danger xGoals"),
    ("I_F_lowDangerGoals", "Low Danger Goals"),
    ("I_F_mediumDangerGoals", "Medium Danger Goals"),
    ("I_F_highDangerGoals", "High Danger Goals"),
    ("I_F_scoreAdjustedShotsAttempts", "Score Adjusted Shot Attempts"),
    ("I_F_unblockedShotAttempts", "Unblocked Shot Attempts"),
    ("I_F_scoreAdjustedUnblockedShotAttempts", "Score Adjusted Unblocked Shot Attempts"),
    ("I_F_dZoneGiveaways", "D-Zone Giveaways"),
    ("I_F_xGoalsFromxReboundsOfShots", "xGoals From xRebounds"),
    ("I_F_xGoalsFromActualReboundsOfShots", "xGoals From Actual Rebounds"),
    ("I_F_reboundxGoals", "Rebound xGoals"),
    ("I_F_xGoals_with_earned_rebounds", "xGoals With Earned Rebounds"),
    ("I_F_xGoals_with_earned_rebounds_scoreAdjusted", "xGoals With Earned Rebounds (Score Adj.)"),
    ("I_F_xGoals_with_earned_rebounds_scoreFlurryAdjusted", "xGoals With Earned Rebounds (Score/Flurry Adj.)"),
    ("I_F_shifts", "Shifts (Individual)"),
    ("I_F_oZoneShiftStarts", "O-Zone Shift Starts"),
    ("I_F_dZoneShiftStarts", "D-Zone Shift Starts"),
    ("I_F_neutralZoneShiftStarts", "Neutral Zone Shift Starts"),
    ("I_F_flyShiftStarts", "On-The-Fly Shift Starts"),
    ("I_F_oZoneShiftEnds", "O-Zone Shift Ends"),
    ("I_F_dZoneShiftEnds", "D-Zone Shift Ends"),
    ("I_F_neutralZoneShiftEnds", "Neutral Zone Shift Ends"),
    ("I_F_flyShiftEnds", "On-The-Fly Shift Ends"),
    ("faceoffsWon", "Faceoffs Won"),
    ("faceoffsLost", "Faceoffs Lost"),
    ("timeOnBench", "Time On Bench (minutes)"),
    ("penalityMinutes", "Penalty Minutes"),
    ("penalityMinutesDrawn", "Penalty Minutes Drawn"),
    ("penaltiesDrawn", "Penalties Drawn"),
    ("shotsBlockedByPlayer", "Shots Blocked"),
    ("OnIce_F_xOnGoal", "On-Ice For Expected Shots On Goal"),
    ("OnIce_F_xGoals", "On-Ice For xGoals"),
    ("OnIce_F_flurryAdjustedxGoals", "On-Ice For Flurry Adjusted xGoals"),
    ("OnIce_F_scoreVenueAdjustedxGoals", "On-Ice For Score/Venue Adjusted xGoals"),
    ("OnIce_F_flurryScoreVenueAdjustedxGoals", "On-Ice For Flurry Score/Venue Adjusted xGoals"),
    ("OnIce_F_shotsOnGoal", "On-Ice For Shots On Goal"),
    ("OnIce_F_missedShots", "On-Ice For Missed Shots"),
    ("OnIce_F_blockedShotAttempts", "On-Ice For Blocked Shot Attempts"),
    ("OnIce_F_shotAttempts", "On-Ice For Shot Attempts"),
    ("OnIce_F_goals", "On-Ice For Goals"),
    ("OnIce_F_rebounds", "On-Ice For Rebounds"),
    ("OnIce_F_reboundGoals", "On-Ice For Rebound Goals"),
    ("OnIce_F_lowDangerShots", "On-Ice For Low Danger Shots"),
    ("OnIce_F_mediumDangerShots", "On-Ice For Medium Danger Shots"),
    ("OnIce_F_highDangerShots", "On-Ice For High Danger Shots"),
    ("OnIce_F_lowDangerxGoals", "On-Ice For Low Danger xGoals"),
    ("OnIce_F_mediumDangerxGoals", "On-Ice For Medium Danger xGoals"),
    ("OnIce_F_highDangerxGoals", "On-Ice For High Danger xGoals"),
    ("OnIce_F_lowDangerGoals", "On-Ice For Low Danger Goals"),
    ("OnIce_F_mediumDangerGoals", "On-Ice For Medium Danger Goals"),
    ("OnIce_F_highDangerGoals", "On-Ice For High Danger Goals"),
    ("OnIce_F_scoreAdjustedShotsAttempts", "On-Ice For Score Adjusted Shot Attempts"),
    ("OnIce_F_unblockedShotAttempts", "On-Ice For Unblocked Shot Attempts"),
    ("OnIce_F_scoreAdjustedUnblockedShotAttempts", "On-Ice For Score Adjusted Unblocked Shot Attempts"),
    ("OnIce_F_xGoalsFromxReboundsOfShots", "On-Ice For xGoals From xRebounds"),
    ("OnIce_F_xGoalsFromActualReboundsOfShots", "On-Ice For xGoals From Actual Rebounds"),
    ("OnIce_F_reboundxGoals", "On-Ice For Rebound xGoals"),
    ("OnIce_F_xGoals_with_earned_rebounds", "On-Ice For xGoals With Earned Rebounds"),
    ("OnIce_F_xGoals_with_earned_rebounds_scoreAdjusted", "On-Ice For xGoals With Earned Rebounds (Score Adj.)"),
    ("OnIce_F_xGoals_with_earned_rebounds_scoreFlurryAdjusted", "On-Ice For xGoals With Earned Rebounds (Score/Flurry Adj.)"),
    ("OnIce_A_xOnGoal", "On-Ice Against Expected Shots On Goal"),
    ("OnIce_A_xGoals", "On-Ice Against xGoals"),
    ("OnIce_A_flurryAdjustedxGoals", "On-Ice Against Flurry Adjusted xGoals"),
    ("OnIce_A_scoreVenueAdjustedxGoals", "On-Ice Against Score/Venue Adjusted xGoals"),
    ("OnIce_A_flurryScoreVenueAdjustedxGoals", "On-Ice Against Flurry Score/Venue Adjusted xGoals"),
    ("OnIce_A_shotsOnGoal", "On-Ice Against Shots On Goal"),
    ("OnIce_A_missedShots", "On-Ice Against Missed Shots"),
    ("OnIce_A_blockedShotAttempts", "On-Ice Against Blocked Shot Attempts"),
    ("OnIce_A_shotAttempts", "On-Ice Against Shot Attempts"),
    ("OnIce_A_goals", "On-Ice Against Goals"),
    ("OnIce_A_rebounds", "On-Ice Against Rebounds"),
    ("OnIce_A_reboundGoals", "On-Ice Against Rebound Goals"),
    ("OnIce_A_lowDangerShots", "On-Ice Against Low Danger Shots"),
    ("OnIce_A_mediumDangerShots", "On-Ice Against Medium Danger Shots"),
    ("OnIce_A_highDangerShots", "On-Ice Against High Danger Shots"),
    ("OnIce_A_lowDangerxGoals", "On-Ice Against Low Danger xGoals"),
    ("OnIce_A_mediumDangerxGoals", "On-Ice Against Medium Danger xGoals"),
    ("OnIce_A_highDangerxGoals", "On-Ice Against High Danger xGoals"),
    ("OnIce_A_lowDangerGoals", "On-Ice Against Low Danger Goals"),
    ("OnIce_A_mediumDangerGoals", "On-Ice Against Medium Danger Goals"),
    ("OnIce_A_highDangerGoals", "On-Ice Against High Danger Goals"),
    ("OnIce_A_scoreAdjustedShotsAttempts", "On-Ice Against Score Adjusted Shot Attempts"),
    ("OnIce_A_unblockedShotAttempts", "On-Ice Against Unblocked Shot Attempts"),
    ("OnIce_A_scoreAdjustedUnblockedShotAttempts", "On-Ice Against Score Adjusted Unblocked Shot Attempts"),
    ("OnIce_A_xGoalsFromxReboundsOfShots", "On-Ice Against xGoals From xRebounds"),
    ("OnIce_A_xGoalsFromActualReboundsOfShots", "On-Ice Against xGoals From Actual Rebounds"),
    ("OnIce_A_reboundxGoals", "On-Ice Against Rebound xGoals"),
    ("OnIce_A_xGoals_with_earned_rebounds", "On-Ice Against xGoals With Earned Rebounds"),
    ("OnIce_A_xGoals_with_earned_rebounds_scoreAdjusted", "On-Ice Against xGoals With Earned Rebounds (Score Adj.)"),
    ("OnIce_A_xGoals_with_earned_rebounds_scoreFlurryAdjusted", "On-Ice Against xGoals With Earned Rebounds (Score/Flurry Adj.)"),
    ("OffIce_F_xGoals", "Off-Ice For xGoals"),
    ("OffIce_A_xGoals", "Off-Ice Against xGoals"),
    ("OffIce_F_shotAttempts", "Off-Ice For Shot Attempts"),
    ("OffIce_A_shotAttempts", "Off-Ice Against Shot Attempts"),
    ("xGoalsForAfterShifts", "xGoals For After Shifts"),
    ("xGoalsAgainstAfterShifts", "xGoals Against After Shifts"),
    ("corsiForAfterShifts", "Corsi For After Shifts"),
    ("corsiAgainstAfterShifts", "Corsi Against After Shifts"),
    ("fenwickForAfterShifts", "Fenwick For After Shifts"),
    ("fenwickAgainstAfterShifts", "Fenwick Against After Shifts"),
];

/// Primary color per team abbreviation (2023-24 league).
const BUILTIN_TEAM_COLORS: &[(&str, &str)] = &[
    ("ANA", "#F47A38"),
    ("ARI", "#8C2633"),
    ("BOS", "#FFB81C"),
    ("BUF", "#003087"),
    ("CGY", "#D2001C"),
    ("CAR", "#CE1126"),
    ("CHI", "#CF0A2C"),
    ("COL", "#6F263D"),
    ("CBJ", "#002654"),
    ("DAL", "#006847"),
    ("DET", "#CE1126"),
    ("EDM", "#041E42"),
    ("FLA", "#041E42"),
    ("LAK", "#111111"),
    ("MIN", "#154734"),
    ("MTL", "#AF1E2D"),
    ("NSH", "#FFB81C"),
    ("NJD", "#CE1126"),
    ("NYI", "#00539B"),
    ("NYR", "#0038A8"),
    ("OTT", "#DA1A32"),
    ("PHI", "#F74902"),
    ("PIT", "#FCB514"),
    ("STL", "#002F87"),
    ("SJS", "#006D75"),
    ("SEA", "#001628"),
    ("TBL", "#002868"),
    ("TOR", "#00205B"),
    ("VAN", "#00205B"),
    ("VGK", "#B4975A"),
    ("WSH", "#C8102E"),
    ("WPG", "#041E42"),
];

/// Marker color used when a team has no entry. Startup validation makes
/// this unreachable for loaded data.
pub const FALLBACK_TEAM_COLOR: &str = "#888888";

// ---------------------------------------------------------------------------
// StatCatalog
// ---------------------------------------------------------------------------

/// The ordered statistic list with a label for every key.
#[derive(Debug, Clone)]
pub struct StatCatalog {
    stats: Vec<StatDescriptor>,
    index: HashMap<String, usize>,
}

impl StatCatalog {
    /// The full skater statistic list with built-in labels.
    pub fn builtin() -> Self {
        let stats = BUILTIN_STATS
            .iter()
            .map(|(key, label)| StatDescriptor {
                key: (*key).to_string(),
                label: (*label).to_string(),
                unit: unit_for(key),
            })
            .collect();
        Self::from_descriptors(stats)
    }

    /// Labels for every built-in key, as a map callers can extend with overrides.
    pub fn builtin_labels() -> HashMap<String, String> {
        BUILTIN_STATS
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    /// The built-in key order.
    pub fn builtin_keys() -> Vec<String> {
        BUILTIN_STATS.iter().map(|(k, _)| (*k).to_string()).collect()
    }

    /// Build a catalog from an explicit key list and a label map.
    ///
    /// Fails if the list is empty, repeats a key, or contains a key with no
    /// label. Labels for keys not in the list are ignored.
    pub fn from_parts(
        keys: &[String],
        labels: &HashMap<String, String>,
    ) -> Result<Self, ConfigurationError> {
        if keys.is_empty() {
            return Err(ConfigurationError::EmptyStatList);
        }
        let mut seen = BTreeSet::new();
        let mut stats = Vec::with_capacity(keys.len());
        for key in keys {
            if !seen.insert(key.as_str()) {
                return Err(ConfigurationError::DuplicateStat { key: key.clone() });
            }
            let label = labels
                .get(key)
                .filter(|l| !l.trim().is_empty())
                .ok_or_else(|| ConfigurationError::MissingStatLabel { key: key.clone() })?;
            stats.push(StatDescriptor {
                key: key.clone(),
                label: label.clone(),
                unit: unit_for(key),
            });
        }
        Ok(Self::from_descriptors(stats))
    }

    fn from_descriptors(stats: Vec<StatDescriptor>) -> Self {
        let index = stats
            .iter()
            .enumerate()
            .map(|(i, s)| (s.key.clone(), i))
            .collect();
        StatCatalog { stats, index }
    }

    /// Human-readable label for a statistic key.
    pub fn format(&self, key: &str) -> Result<&str, UnknownStatisticError> {
        self.descriptor(key).map(|d| d.label.as_str())
    }

    pub fn descriptor(&self, key: &str) -> Result<&StatDescriptor, UnknownStatisticError> {
        self.index
            .get(key)
            .map(|&i| &self.stats[i])
            .ok_or_else(|| UnknownStatisticError::new(key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatDescriptor> {
        self.stats.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.stats.iter().map(|s| s.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}

fn unit_for(key: &str) -> StatUnit {
    if SECONDS_STATS.contains(&key) {
        StatUnit::Seconds
    } else {
        StatUnit::Count
    }
}

// ---------------------------------------------------------------------------
// TeamColors
// ---------------------------------------------------------------------------

/// Team abbreviation to `#RRGGBB` marker color.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamColors {
    colors: BTreeMap<String, String>,
}

impl TeamColors {
    pub fn builtin() -> Self {
        TeamColors {
            colors: BUILTIN_TEAM_COLORS
                .iter()
                .map(|(t, c)| ((*t).to_string(), (*c).to_string()))
                .collect(),
        }
    }

    /// Built-in colors with entries added or replaced from `overrides`.
    pub fn with_overrides(
        overrides: &HashMap<String, String>,
    ) -> Result<Self, ConfigurationError> {
        let mut colors = Self::builtin().colors;
        for (team, color) in overrides {
            if !is_hex_color(color) {
                return Err(ConfigurationError::InvalidTeamColor {
                    team: team.clone(),
                    value: color.clone(),
                });
            }
            colors.insert(team.trim().to_uppercase(), color.to_uppercase());
        }
        Ok(TeamColors { colors })
    }

    pub fn color(&self, team: &str) -> Option<&str> {
        self.colors.get(team).map(String::as_str)
    }

    /// Color for a team, or the neutral fallback.
    pub fn color_or_fallback(&self, team: &str) -> &str {
        self.color(team).unwrap_or(FALLBACK_TEAM_COLOR)
    }

    /// Check that every given team has a color.
    pub fn ensure_covers<'a, I>(&self, teams: I) -> Result<(), ConfigurationError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for team in teams {
            if !self.colors.contains_key(team) {
                return Err(ConfigurationError::MissingTeamColor {
                    team: team.to_string(),
                });
            }
        }
        Ok(())
    }
}

fn is_hex_color(value: &str) -> bool {
    let Some(hex) = value.strip_prefix('#') else {
        return false;
    };
    hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit())
}

/// Statistic labels and team colors, validated together at startup.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub stats: StatCatalog,
    pub teams: TeamColors,
}

impl Catalog {
    pub fn builtin() -> Self {
        Catalog {
            stats: StatCatalog::builtin(),
            teams: TeamColors::builtin(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
