// Quit confirmation overlay, drawn over the dashboard while
// `ViewState::confirm_quit` is set.

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use skaterdash_core::chart::Theme;

use crate::tui::theme::colors;

const DIALOG_WIDTH: u16 = 34;
const DIALOG_HEIGHT: u16 = 5;

pub fn render(frame: &mut Frame, area: Rect, theme: Theme) {
    let c = colors(theme);
    let dialog = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);
    frame.render_widget(Clear, dialog);

    let key = |k: &'static str| Span::styled(k, Style::default().fg(c.accent).add_modifier(Modifier::BOLD));
    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw("Leave the dashboard? ("),
            key("y"),
            Span::raw("/"),
            key("n"),
            Span::raw(")"),
        ])
        .centered(),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(c.accent))
        .title(" Quit ");
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .style(Style::default().bg(c.panel).fg(c.text)),
        dialog,
    );
}

/// A `width` x `height` rect centered in `area`, clamped to fit.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    cell
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_is_centered() {
        let area = Rect::new(0, 0, 80, 24);
        let r = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);
        assert_eq!((r.width, r.height), (DIALOG_WIDTH, DIALOG_HEIGHT));
        assert!((r.x + r.width / 2).abs_diff(40) <= 1);
        assert!((r.y + r.height / 2).abs_diff(12) <= 1);
    }

    #[test]
    fn centered_rect_clamps_to_small_area() {
        let area = Rect::new(0, 0, 10, 3);
        let r = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);
        assert!(r.width <= area.width && r.height <= area.height);
    }

    #[test]
    fn render_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(80, 24);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), Theme::Light))
            .unwrap();
    }
}
