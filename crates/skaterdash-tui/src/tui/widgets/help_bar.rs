// Bottom rows: the message line (focused point or last error) and the key
// hints with the data-source credit.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::theme::colors;
use crate::tui::ViewState;

const KEYS: &str =
    " 1-5:Tabs | x/y:Axes s:Swap | Up/Down Space:Players r:Reset c:Clear | Left/Right Enter:Profile | t:Theme | q:Quit";

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let c = colors(state.theme);
    let mut spans = vec![Span::styled(
        KEYS,
        Style::default().fg(c.text).add_modifier(Modifier::DIM),
    )];
    if !state.source_url.is_empty() {
        spans.push(Span::styled(
            format!(" | Data: {}", state.source_url),
            Style::default().fg(c.muted),
        ));
    }
    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(c.panel));
    frame.render_widget(paragraph, area);
}

/// The last rejected interaction if there is one, else the focused point's
/// hover text on one line.
pub fn render_message(frame: &mut Frame, area: Rect, state: &ViewState) {
    let c = colors(state.theme);
    let span = match (&state.status_message, state.focused_point()) {
        (Some(message), _) => Span::styled(format!(" ! {}", message), Style::default().fg(c.error)),
        (None, Some(point)) => Span::styled(
            format!(" {}", hover_line(&point.hover)),
            Style::default().fg(c.text),
        ),
        (None, None) => Span::raw(""),
    };
    frame.render_widget(Paragraph::new(Line::from(span)), area);
}

/// Multi-line hover text joined with separators.
pub fn hover_line(hover: &str) -> String {
    hover.lines().collect::<Vec<_>>().join(" | ")
}
