// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------+
// | Status Bar (1 row): title, season, tabs           |
// +--------------------------------------------------+
// | Axis Pickers (3 rows)                             |
// +-------------------------+------------------------+
// | Chart (68%)              | Sidebar (32%)          |
// |                          | +- Profile (12 rows) -+|
// |                          | +- Players (fill) ----+|
// +-------------------------+------------------------+
// | Message Line (1 row): focused point or error      |
// +--------------------------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each dashboard zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    pub status_bar: Rect,
    /// X/Y statistic pickers for the active tab.
    pub axis_pickers: Rect,
    pub chart: Rect,
    pub profile: Rect,
    /// Player multi-select list.
    pub players: Rect,
    /// Hover text of the focused point, or the last rejected interaction.
    pub message_line: Rect,
    pub help_bar: Rect,
}

/// Profile panel height: border, name, headline, six stat rows, two URLs.
const PROFILE_HEIGHT: u16 = 12;

pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Length(3), // axis pickers
            Constraint::Min(8),    // chart + sidebar
            Constraint::Length(1), // message line
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
        .split(vertical[2]);

    let sidebar = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(PROFILE_HEIGHT), Constraint::Min(3)])
        .split(horizontal[1]);

    AppLayout {
        status_bar: vertical[0],
        axis_pickers: vertical[1],
        chart: horizontal[0],
        profile: sidebar[0],
        players: sidebar[1],
        message_line: vertical[3],
        help_bar: vertical[4],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn test_area() -> Rect {
        Rect::new(0, 0, 160, 50)
    }

    fn all_rects(layout: &AppLayout) -> [(&'static str, Rect); 7] {
        [
            ("status_bar", layout.status_bar),
            ("axis_pickers", layout.axis_pickers),
            ("chart", layout.chart),
            ("profile", layout.profile),
            ("players", layout.players),
            ("message_line", layout.message_line),
            ("help_bar", layout.help_bar),
        ]
    }

    #[test]
    fn layout_all_rects_nonzero() {
        let layout = build_layout(test_area());
        for (name, rect) in all_rects(&layout) {
            assert!(
                rect.width > 0 && rect.height > 0,
                "{} has zero area: {:?}",
                name,
                rect
            );
        }
    }

    #[test]
    fn layout_fixed_rows() {
        let layout = build_layout(test_area());
        assert_eq!(layout.status_bar.height, 1);
        assert_eq!(layout.axis_pickers.height, 3);
        assert_eq!(layout.message_line.height, 1);
        assert_eq!(layout.help_bar.height, 1);
        assert_eq!(layout.profile.height, PROFILE_HEIGHT);
    }

    #[test]
    fn layout_chart_wider_than_sidebar() {
        let layout = build_layout(test_area());
        assert!(
            layout.chart.width > layout.players.width,
            "Chart ({}) should be wider than sidebar ({})",
            layout.chart.width,
            layout.players.width
        );
    }

    #[test]
    fn layout_profile_above_players() {
        let layout = build_layout(test_area());
        assert!(layout.profile.y < layout.players.y);
        assert_eq!(layout.profile.width, layout.players.width);
    }

    #[test]
    fn layout_fits_within_area() {
        let area = test_area();
        let layout = build_layout(area);
        for (name, rect) in all_rects(&layout) {
            assert!(
                rect.x + rect.width <= area.width && rect.y + rect.height <= area.height,
                "{} {:?} exceeds area {:?}",
                name,
                rect,
                area
            );
        }
    }
}
