// Chart renderer: rows + selection + theme -> scatter plot description.
//
// The output is a plain data structure with no charting library behind it.
// Rendering is pure, so the same inputs always serialize to the same JSON.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::catalog::{Catalog, StatDescriptor, UnknownStatisticError};
use crate::dataset::{PlayerIdentity, PlayerStatRow, ALL_SITUATIONS};

pub const MARKER_SIZE: u16 = 10;
pub const MARKER_LINE_WIDTH: u16 = 1;

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn palette(self) -> ThemePalette {
        match self {
            Theme::Light => ThemePalette {
                plot_background: "#FFFFFF".into(),
                paper_background: "#F8F9FA".into(),
                font: "#5A5A5A".into(),
                grid: "#DEE2E6".into(),
            },
            Theme::Dark => ThemePalette {
                plot_background: "#343A40".into(),
                paper_background: "#2B3035".into(),
                font: "#EEEEEE".into(),
                grid: "#495057".into(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemePalette {
    pub plot_background: String,
    pub paper_background: String,
    pub font: String,
    pub grid: String,
}

// ---------------------------------------------------------------------------
// ChartSpec
// ---------------------------------------------------------------------------

/// One marker on the scatter plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub player: PlayerIdentity,
    pub team: String,
    pub x: f64,
    pub y: f64,
    /// `#RRGGBB` team color.
    pub color: String,
    pub hover: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub key: String,
    pub title: String,
}

/// A library-independent scatter plot description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub theme: Theme,
    pub palette: ThemePalette,
    pub marker_size: u16,
    pub marker_line_width: u16,
    pub points: Vec<ChartPoint>,
}

impl ChartSpec {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// `[min, max]` of the x values, or `None` for an empty chart.
    pub fn x_bounds(&self) -> Option<[f64; 2]> {
        bounds(self.points.iter().map(|p| p.x))
    }

    pub fn y_bounds(&self) -> Option<[f64; 2]> {
        bounds(self.points.iter().map(|p| p.y))
    }

    /// Canonical JSON encoding.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<[f64; 2]> {
    values.fold(None, |acc, v| match acc {
        None => Some([v, v]),
        Some([lo, hi]) => Some([lo.min(v), hi.max(v)]),
    })
}

// ---------------------------------------------------------------------------
// Render
// ---------------------------------------------------------------------------

/// Everything the renderer reads, grouped so callers can hold one value.
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    pub rows: &'a [&'a PlayerStatRow],
    pub stat_x: &'a str,
    pub stat_y: &'a str,
    pub selected: &'a [PlayerIdentity],
    pub theme: Theme,
    /// Heading placed before the axis labels in the title, e.g. "Centers".
    pub title_prefix: &'a str,
}

/// Build the scatter plot for the selected players.
///
/// Only rows tagged with the all-situations tag are plotted. Both statistic
/// keys are checked before any point is built. An empty selection renders an
/// empty chart.
pub fn render(
    request: &RenderRequest<'_>,
    catalog: &Catalog,
) -> Result<ChartSpec, UnknownStatisticError> {
    let x = catalog.stats.descriptor(request.stat_x)?;
    let y = catalog.stats.descriptor(request.stat_y)?;

    let selected: HashSet<&PlayerIdentity> = request.selected.iter().collect();

    let points = request
        .rows
        .iter()
        .filter(|row| row.situation == ALL_SITUATIONS && selected.contains(&row.identity))
        .map(|row| build_point(row, x, y, catalog))
        .collect();

    let title = if request.title_prefix.is_empty() {
        format!("{} vs {}", y.label, x.label)
    } else {
        format!("{} {} vs {}", request.title_prefix, y.label, x.label)
    };

    Ok(ChartSpec {
        title,
        x_axis: Axis {
            key: x.key.clone(),
            title: x.label.clone(),
        },
        y_axis: Axis {
            key: y.key.clone(),
            title: y.label.clone(),
        },
        theme: request.theme,
        palette: request.theme.palette(),
        marker_size: MARKER_SIZE,
        marker_line_width: MARKER_LINE_WIDTH,
        points,
    })
}

fn build_point(
    row: &PlayerStatRow,
    x: &StatDescriptor,
    y: &StatDescriptor,
    catalog: &Catalog,
) -> ChartPoint {
    let x_value = x.unit.display_value(row.stat_or_zero(&x.key));
    let y_value = y.unit.display_value(row.stat_or_zero(&y.key));
    let hover = format!(
        "{} ({})\n{}: {}\n{}: {}",
        row.identity.name,
        row.team,
        x.label,
        format_value(x_value),
        y.label,
        format_value(y_value),
    );
    ChartPoint {
        player: row.identity.clone(),
        team: row.team.clone(),
        x: x_value,
        y: y_value,
        color: catalog.teams.color_or_fallback(&row.team).to_string(),
        hover,
    }
}

/// Whole numbers print without decimals, everything else with up to three.
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let s = format!("{:.3}", value);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Dataset, Position};

    const CSV: &str = "\
playerId,name,team,position,situation,games_played,icetime,I_F_goals
1,A,BOS,C,all,82,90000,30
1,A,BOS,C,5on4,82,12000,9
2,B,TOR,C,all,70,75630,20
3,C,MTL,C,all,60,50000,5";

    fn fixture() -> Dataset {
        Dataset::from_reader(CSV.as_bytes()).unwrap()
    }

    fn ids(names: &[(u64, &str)]) -> Vec<PlayerIdentity> {
        names.iter().map(|(i, n)| PlayerIdentity::new(*i, *n)).collect()
    }

    fn request<'a>(
        rows: &'a [&'a PlayerStatRow],
        x: &'a str,
        y: &'a str,
        selected: &'a [PlayerIdentity],
    ) -> RenderRequest<'a> {
        RenderRequest {
            rows,
            stat_x: x,
            stat_y: y,
            selected,
            theme: Theme::Dark,
            title_prefix: "Centers",
        }
    }

    #[test]
    fn two_selected_players_give_two_points() {
        let ds = fixture();
        let rows = ds.filter_by_position(Position::Center);
        let selected = ids(&[(1, "A"), (2, "B")]);
        let chart = render(
            &request(&rows, "games_played", "I_F_goals", &selected),
            &Catalog::builtin(),
        )
        .unwrap();

        assert_eq!(chart.points.len(), 2);
        assert_eq!((chart.points[0].x, chart.points[0].y), (82.0, 30.0));
        assert_eq!((chart.points[1].x, chart.points[1].y), (70.0, 20.0));
        assert_eq!(chart.points[0].color, "#FFB81C");
        assert_eq!(chart.points[1].color, "#00205B");
        assert_eq!(chart.x_axis.title, "Games Played");
        assert_eq!(chart.y_axis.title, "Goals");
        assert_eq!(chart.title, "Centers Goals vs Games Played");
    }

    #[test]
    fn empty_selection_is_an_empty_chart() {
        let ds = fixture();
        let rows = ds.filter_by_position(Position::Center);
        let chart = render(
            &request(&rows, "games_played", "I_F_goals", &[]),
            &Catalog::builtin(),
        )
        .unwrap();
        assert!(chart.is_empty());
        assert_eq!(chart.x_bounds(), None);
    }

    #[test]
    fn only_all_situation_rows_are_plotted() {
        let ds = fixture();
        let rows = ds.filter_by_position(Position::Center);
        let selected = ids(&[(1, "A")]);
        let chart = render(
            &request(&rows, "games_played", "I_F_goals", &selected),
            &Catalog::builtin(),
        )
        .unwrap();
        assert_eq!(chart.points.len(), 1);
        assert_eq!(chart.points[0].y, 30.0);
    }

    #[test]
    fn unknown_statistic_rejected_before_points() {
        let ds = fixture();
        let rows = ds.filter_by_position(Position::Center);
        let selected = ids(&[(1, "A")]);
        let catalog = Catalog::builtin();
        let err = render(&request(&rows, "bogus", "I_F_goals", &selected), &catalog).unwrap_err();
        assert_eq!(err.key, "bogus");
        let err = render(&request(&rows, "I_F_goals", "bogus_y", &selected), &catalog).unwrap_err();
        assert_eq!(err.key, "bogus_y");
    }

    #[test]
    fn icetime_is_shown_in_rounded_minutes() {
        let ds = fixture();
        let rows = ds.filter_by_position(Position::Center);
        let selected = ids(&[(2, "B")]);
        let chart = render(
            &request(&rows, "icetime", "I_F_goals", &selected),
            &Catalog::builtin(),
        )
        .unwrap();
        // 75630 s = 1260.5 min
        assert_eq!(chart.points[0].x, 1261.0);
        assert!(chart.points[0].hover.contains("Icetime (minutes): 1261"));
        // stored value untouched
        assert_eq!(rows[2].stat("icetime"), Some(75630.0));
    }

    #[test]
    fn hover_names_player_and_both_stats() {
        let ds = fixture();
        let rows = ds.filter_by_position(Position::Center);
        let selected = ids(&[(1, "A")]);
        let chart = render(
            &request(&rows, "games_played", "I_F_goals", &selected),
            &Catalog::builtin(),
        )
        .unwrap();
        assert_eq!(chart.points[0].hover, "A (BOS)\nGames Played: 82\nGoals: 30");
    }

    #[test]
    fn render_is_idempotent() {
        let ds = fixture();
        let rows = ds.filter_by_position(Position::AllSkaters);
        let selected = ids(&[(3, "C"), (1, "A"), (2, "B")]);
        let catalog = Catalog::builtin();
        let req = request(&rows, "icetime", "I_F_goals", &selected);
        let first = render(&req, &catalog).unwrap().to_json().unwrap();
        let second = render(&req, &catalog).unwrap().to_json().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn points_follow_row_order_not_selection_order() {
        let ds = fixture();
        let rows = ds.filter_by_position(Position::Center);
        let selected = ids(&[(3, "C"), (1, "A")]);
        let chart = render(
            &request(&rows, "games_played", "I_F_goals", &selected),
            &Catalog::builtin(),
        )
        .unwrap();
        let order: Vec<&str> = chart.points.iter().map(|p| p.player.name.as_str()).collect();
        assert_eq!(order, vec!["A", "C"]);
    }

    #[test]
    fn theme_palette_is_carried() {
        let ds = fixture();
        let rows = ds.filter_by_position(Position::Center);
        let mut req = request(&rows, "games_played", "I_F_goals", &[]);
        req.theme = Theme::Light;
        let chart = render(&req, &Catalog::builtin()).unwrap();
        assert_eq!(chart.theme, Theme::Light);
        assert_eq!(chart.palette.plot_background, "#FFFFFF");
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
    }

    #[test]
    fn bounds_cover_all_points() {
        let ds = fixture();
        let rows = ds.filter_by_position(Position::Center);
        let selected = ids(&[(1, "A"), (2, "B"), (3, "C")]);
        let chart = render(
            &request(&rows, "games_played", "I_F_goals", &selected),
            &Catalog::builtin(),
        )
        .unwrap();
        assert_eq!(chart.x_bounds(), Some([60.0, 82.0]));
        assert_eq!(chart.y_bounds(), Some([5.0, 30.0]));
    }

    #[test]
    fn format_value_trims_decimals() {
        assert_eq!(format_value(30.0), "30");
        assert_eq!(format_value(0.5371), "0.537");
        assert_eq!(format_value(1.5), "1.5");
        assert_eq!(format_value(-2.0), "-2");
    }
}
