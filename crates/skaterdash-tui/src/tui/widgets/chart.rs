// Scatter chart widget: draws the active tab's ChartSpec.
//
// Points are grouped by team color into one ratatui dataset each. The focused
// point is drawn last as its own dataset so it sits on top.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::Line;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph};
use ratatui::Frame;

use skaterdash_core::chart::{format_value, ChartSpec};

use crate::tui::theme::{colors, parse_hex};
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let c = colors(state.theme);
    let Some(tab) = state.active() else {
        let block = Block::default().borders(Borders::ALL).title(" Chart ");
        frame.render_widget(
            Paragraph::new("Loading dashboard...").block(block),
            area,
        );
        return;
    };
    let spec = &tab.chart;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(c.grid))
        .title(Line::from(format!(" {} ", spec.title)).centered())
        .style(Style::default().bg(c.panel).fg(c.text));

    let (Some(x_bounds), Some(y_bounds)) = (spec.x_bounds(), spec.y_bounds()) else {
        let text = "No players selected. Space toggles a player, r restores the top players.";
        frame.render_widget(
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .style(Style::default().fg(c.muted))
                .block(block),
            area,
        );
        return;
    };

    let groups = group_by_color(spec);
    let focused: Vec<(f64, f64)> = state
        .focused_point()
        .map(|p| vec![(p.x, p.y)])
        .unwrap_or_default();

    let mut datasets: Vec<Dataset> = groups
        .iter()
        .map(|(color, points)| {
            Dataset::default()
                .marker(Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(*color))
                .data(points)
        })
        .collect();
    datasets.push(
        Dataset::default()
            .marker(Marker::Block)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(c.accent).add_modifier(Modifier::BOLD))
            .data(&focused),
    );

    let x = padded(x_bounds);
    let y = padded(y_bounds);
    let axis_style = Style::default().fg(c.muted);

    let chart = Chart::new(datasets)
        .block(block)
        .legend_position(None)
        .x_axis(
            Axis::default()
                .title(spec.x_axis.title.clone())
                .style(axis_style)
                .bounds(x)
                .labels(axis_labels(x)),
        )
        .y_axis(
            Axis::default()
                .title(spec.y_axis.title.clone())
                .style(axis_style)
                .bounds(y)
                .labels(axis_labels(y)),
        );

    frame.render_widget(chart, area);
}

/// Points bucketed by marker color, in order of first appearance.
pub fn group_by_color(spec: &ChartSpec) -> Vec<(Color, Vec<(f64, f64)>)> {
    let mut groups: Vec<(Color, Vec<(f64, f64)>)> = Vec::new();
    for point in &spec.points {
        let color = parse_hex(&point.color).unwrap_or(Color::Gray);
        match groups.iter_mut().find(|(c, _)| *c == color) {
            Some((_, points)) => points.push((point.x, point.y)),
            None => groups.push((color, vec![(point.x, point.y)])),
        }
    }
    groups
}

/// Widen `[lo, hi]` by 5% each side, or by 1 when the range is a single value.
pub fn padded([lo, hi]: [f64; 2]) -> [f64; 2] {
    let span = hi - lo;
    if span <= f64::EPSILON {
        [lo - 1.0, hi + 1.0]
    } else {
        [lo - span * 0.05, hi + span * 0.05]
    }
}

fn axis_labels([lo, hi]: [f64; 2]) -> Vec<String> {
    let mid = (lo + hi) / 2.0;
    [lo, mid, hi]
        .iter()
        .map(|v| format_value(v.round()))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::tests::sample_view_state;

    #[test]
    fn points_group_by_team_color() {
        let state = sample_view_state();
        // All Skaters: five players on five teams.
        let groups = group_by_color(&state.tabs[4].chart);
        assert_eq!(groups.len(), 5);
        assert!(groups.iter().all(|(_, pts)| pts.len() == 1));
    }

    #[test]
    fn shared_color_shares_a_group() {
        let mut state = sample_view_state();
        let chart = &mut state.tabs[4].chart;
        let color = chart.points[0].color.clone();
        for p in chart.points.iter_mut() {
            p.color = color.clone();
        }
        let groups = group_by_color(chart);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].1.len(), 5);
    }

    #[test]
    fn padding_handles_flat_range() {
        assert_eq!(padded([5.0, 5.0]), [4.0, 6.0]);
        let [lo, hi] = padded([0.0, 100.0]);
        assert!((lo + 5.0).abs() < 1e-9);
        assert!((hi - 105.0).abs() < 1e-9);
    }

    #[test]
    fn labels_are_rounded() {
        assert_eq!(axis_labels([0.0, 10.0]), vec!["0", "5", "10"]);
    }

    #[test]
    fn render_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(100, 30);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = sample_view_state();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();

        state.tabs[0].chart.points.clear();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
