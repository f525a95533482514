// Player profile resolver for the sidebar panel.
//
// A profile is rebuilt from the dataset on every click; nothing is cached.
// Traded players have one row per team, so the row used for headline stats
// is picked by a fixed rule (see `profile_row`).

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::dataset::{Dataset, PlayerIdentity, PlayerStatRow, Position};

/// Columns a profile reads, required in the data file regardless of the
/// configured statistic list.
pub const PROFILE_STATS: &[&str] = &[
    "games_played",
    "icetime",
    "I_F_goals",
    "I_F_primaryAssists",
    "I_F_secondaryAssists",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no rows for player {player} (id {player_id})")]
pub struct PlayerNotFoundError {
    pub player: String,
    pub player_id: u64,
}

// ---------------------------------------------------------------------------
// Asset templates
// ---------------------------------------------------------------------------

/// URL templates for the third-party asset host.
///
/// Placeholders: `{team}`, `{player_id}`, `{season}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetTemplates {
    pub player_image: String,
    pub team_logo: String,
    pub placeholder_image: String,
    /// Season segment used in image paths, e.g. `20232024`.
    pub season: String,
}

impl Default for AssetTemplates {
    fn default() -> Self {
        AssetTemplates {
            player_image: "https://assets.nhle.com/mugs/nhl/{season}/{team}/{player_id}.png".into(),
            team_logo: "https://assets.nhle.com/logos/nhl/svg/{team}_light.svg".into(),
            placeholder_image: "https://assets.nhle.com/mugs/nhl/default-skater.png".into(),
            season: "20232024".into(),
        }
    }
}

impl AssetTemplates {
    /// Headshot URL, or the placeholder when no usable id exists.
    pub fn player_image_url(&self, team: &str, player_id: u64) -> String {
        if player_id == 0 {
            return self.placeholder_image.clone();
        }
        let url = self
            .player_image
            .replace("{season}", &self.season)
            .replace("{team}", team)
            .replace("{player_id}", &player_id.to_string());
        self.or_placeholder(url)
    }

    pub fn team_logo_url(&self, team: &str) -> String {
        let url = self
            .team_logo
            .replace("{season}", &self.season)
            .replace("{team}", team);
        // Logos have no placeholder; an unresolved template is returned as-is.
        if has_unresolved_placeholder(&url) {
            debug!("team logo template left a placeholder: {}", url);
        }
        url
    }

    fn or_placeholder(&self, url: String) -> String {
        if has_unresolved_placeholder(&url) {
            debug!("image template left a placeholder, using default: {}", url);
            self.placeholder_image.clone()
        } else {
            url
        }
    }
}

fn has_unresolved_placeholder(url: &str) -> bool {
    match url.find('{') {
        Some(open) => url[open..].contains('}'),
        None => false,
    }
}

// ---------------------------------------------------------------------------
// ProfileSummary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub player: PlayerIdentity,
    pub team: String,
    pub position: Position,
    /// Situation tag of the row the numbers come from.
    pub situation: String,
    pub games_played: u32,
    pub goals: u32,
    pub primary_assists: u32,
    pub secondary_assists: u32,
    pub assists: u32,
    pub points: u32,
    pub icetime_minutes: u32,
    pub team_logo_url: String,
    pub player_image_url: String,
    pub headline: String,
}

/// Pick the row a profile is built from.
///
/// The first all-situations row in file order; when the player has none, the
/// first row of any situation.
pub fn profile_row<'a>(
    player: &PlayerIdentity,
    dataset: &'a Dataset,
) -> Option<&'a PlayerStatRow> {
    let mut fallback = None;
    for row in dataset.rows().iter().filter(|r| r.identity == *player) {
        if row.is_all_situations() {
            return Some(row);
        }
        if fallback.is_none() {
            fallback = Some(row);
        }
    }
    fallback
}

/// Build the sidebar profile for a player.
pub fn resolve(
    player: &PlayerIdentity,
    dataset: &Dataset,
    assets: &AssetTemplates,
) -> Result<ProfileSummary, PlayerNotFoundError> {
    let row = profile_row(player, dataset).ok_or_else(|| PlayerNotFoundError {
        player: player.name.clone(),
        player_id: player.player_id,
    })?;

    let count = |key: &str| row.stat_or_zero(key).max(0.0).round() as u32;

    let games_played = count("games_played");
    let goals = count("I_F_goals");
    let primary_assists = count("I_F_primaryAssists");
    let secondary_assists = count("I_F_secondaryAssists");
    let assists = primary_assists + secondary_assists;
    let points = goals + assists;
    let icetime_minutes = (row.stat_or_zero("icetime").max(0.0) / 60.0).round() as u32;

    let headline = format!(
        "{} | {} | {} GP | {} G | {} A | {} PTS",
        row.team,
        row.position.code(),
        games_played,
        goals,
        assists,
        points
    );

    Ok(ProfileSummary {
        player: row.identity.clone(),
        team: row.team.clone(),
        position: row.position,
        situation: row.situation.clone(),
        games_played,
        goals,
        primary_assists,
        secondary_assists,
        assists,
        points,
        icetime_minutes,
        team_logo_url: assets.team_logo_url(&row.team),
        player_image_url: assets.player_image_url(&row.team, row.identity.player_id),
        headline,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
playerId,name,team,position,situation,games_played,icetime,I_F_goals,I_F_primaryAssists,I_F_secondaryAssists,I_F_points
8478402,Connor McDavid,EDM,C,5on4,76,16000,10,20,5,35
8478402,Connor McDavid,EDM,C,all,76,98000,32,64,36,132
8477500,Traded Winger,ANA,R,all,40,40000,10,8,4,22
8477500,Traded Winger,TOR,R,all,30,30000,5,3,2,10
8400001,Special Teams Only,BOS,D,5on4,12,3000,1,1,0,2";

    fn fixture() -> Dataset {
        Dataset::from_reader(CSV.as_bytes()).unwrap()
    }

    #[test]
    fn points_are_goals_plus_both_assists() {
        let ds = fixture();
        let who = PlayerIdentity::new(8478402, "Connor McDavid");
        let profile = resolve(&who, &ds, &AssetTemplates::default()).unwrap();
        assert_eq!(profile.situation, "all");
        assert_eq!(profile.goals, 32);
        assert_eq!(profile.assists, 100);
        assert_eq!(profile.points, 132);
        assert_eq!(profile.points, profile.goals + profile.primary_assists + profile.secondary_assists);
        assert_eq!(profile.games_played, 76);
        assert_eq!(profile.icetime_minutes, 1633);
        assert_eq!(profile.position, Position::Center);
    }

    #[test]
    fn traded_player_uses_first_all_situation_row() {
        let ds = fixture();
        let who = PlayerIdentity::new(8477500, "Traded Winger");
        let profile = resolve(&who, &ds, &AssetTemplates::default()).unwrap();
        assert_eq!(profile.team, "ANA");
        assert_eq!(profile.points, 22);
    }

    #[test]
    fn falls_back_to_first_row_without_all_situation() {
        let ds = fixture();
        let who = PlayerIdentity::new(8400001, "Special Teams Only");
        let profile = resolve(&who, &ds, &AssetTemplates::default()).unwrap();
        assert_eq!(profile.situation, "5on4");
        assert_eq!(profile.points, 2);
    }

    #[test]
    fn unknown_player_is_not_found() {
        let ds = fixture();
        let who = PlayerIdentity::new(1, "Nobody");
        let err = resolve(&who, &ds, &AssetTemplates::default()).unwrap_err();
        assert_eq!(err.player, "Nobody");
        assert_eq!(err.player_id, 1);
    }

    #[test]
    fn same_name_different_id_is_not_found() {
        let ds = fixture();
        let who = PlayerIdentity::new(42, "Connor McDavid");
        assert!(resolve(&who, &ds, &AssetTemplates::default()).is_err());
    }

    #[test]
    fn asset_urls_interpolate_team_and_id() {
        let ds = fixture();
        let who = PlayerIdentity::new(8478402, "Connor McDavid");
        let profile = resolve(&who, &ds, &AssetTemplates::default()).unwrap();
        assert_eq!(
            profile.player_image_url,
            "https://assets.nhle.com/mugs/nhl/20232024/EDM/8478402.png"
        );
        assert_eq!(
            profile.team_logo_url,
            "https://assets.nhle.com/logos/nhl/svg/EDM_light.svg"
        );
        assert_eq!(profile.headline, "EDM | C | 76 GP | 32 G | 100 A | 132 PTS");
    }

    #[test]
    fn missing_id_or_bad_template_uses_placeholder() {
        let assets = AssetTemplates::default();
        assert_eq!(assets.player_image_url("EDM", 0), assets.placeholder_image);

        let broken = AssetTemplates {
            player_image: "https://example.test/{league}/{player_id}.png".into(),
            ..AssetTemplates::default()
        };
        assert_eq!(broken.player_image_url("EDM", 7), broken.placeholder_image);
    }

    #[test]
    fn unresolved_placeholder_detection() {
        assert!(has_unresolved_placeholder("a/{x}/b"));
        assert!(!has_unresolved_placeholder("a/b.png"));
        assert!(!has_unresolved_placeholder("a/{b.png"));
    }
}
