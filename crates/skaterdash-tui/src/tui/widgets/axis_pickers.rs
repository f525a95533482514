// Axis pickers: the X and Y statistic dropdowns of the active tab.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use skaterdash_core::catalog::StatDescriptor;

use crate::tui::theme::colors;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let c = colors(state.theme);
    let [x_area, y_area] = Layout::horizontal([Constraint::Percentage(50); 2]).areas(area);

    let (x_key, y_key) = match state.active() {
        Some(tab) => (tab.selection.stat_x.as_str(), tab.selection.stat_y.as_str()),
        None => ("", ""),
    };

    for (rect, title, key, hint) in [
        (x_area, " X Axis ", x_key, "x/X"),
        (y_area, " Y Axis ", y_key, "y/Y"),
    ] {
        let line = Line::from(vec![
            Span::styled(
                format!(" {} ", label_for(&state.stats, key)),
                Style::default().fg(c.text).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                position_hint(&state.stats, key),
                Style::default().fg(c.muted),
            ),
        ]);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(c.grid))
            .title(title)
            .title_bottom(Line::from(format!(" {} ", hint)).right_aligned());
        frame.render_widget(
            Paragraph::new(line).block(block).style(Style::default().bg(c.panel)),
            rect,
        );
    }
}

/// Display label for a key, falling back to the key itself.
pub fn label_for<'a>(stats: &'a [StatDescriptor], key: &'a str) -> &'a str {
    stats
        .iter()
        .find(|s| s.key == key)
        .map(|s| s.label.as_str())
        .unwrap_or(key)
}

/// "(3/148)" style position of the key in the statistic list.
fn position_hint(stats: &[StatDescriptor], key: &str) -> String {
    match stats.iter().position(|s| s.key == key) {
        Some(i) => format!("({}/{})", i + 1, stats.len()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::tests::sample_view_state;

    #[test]
    fn label_lookup_and_fallback() {
        let state = sample_view_state();
        assert_eq!(label_for(&state.stats, "icetime"), "Icetime (minutes)");
        assert_eq!(label_for(&state.stats, "mystery"), "mystery");
    }

    #[test]
    fn position_hint_counts_from_one() {
        let state = sample_view_state();
        assert_eq!(position_hint(&state.stats, "games_played"), "(1/4)");
        assert_eq!(position_hint(&state.stats, "mystery"), "");
    }

    #[test]
    fn render_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(100, 3);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = sample_view_state();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
