// Status bar widget: dashboard title, season, tab bar, theme.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use skaterdash_core::chart::Theme;
use skaterdash_core::dashboard::{TabId, TAB_ORDER};

use crate::tui::theme::{colors, Colors};
use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [title + season] | [tab bar] | [theme]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let c = colors(state.theme);
    let mut spans = vec![Span::styled(
        format!(" {} ", title(&state.season_label)),
        Style::default().fg(c.accent).add_modifier(Modifier::BOLD),
    )];
    spans.push(Span::styled("| ", Style::default().fg(c.muted)));
    spans.extend(tab_spans(state.active_tab, &c));
    spans.push(Span::styled(
        format!("| {} ", theme_label(state.theme)),
        Style::default().fg(c.muted),
    ));

    let paragraph = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(c.panel).fg(c.text));
    frame.render_widget(paragraph, area);
}

pub fn title(season_label: &str) -> String {
    if season_label.is_empty() {
        "NHL Player Stats".to_string()
    } else {
        format!("NHL Player Stats {}", season_label)
    }
}

/// Tab indicator spans, e.g. "[1:Centers] [2:Right Wingers] ...", with the
/// active tab highlighted.
pub fn tab_spans(active: TabId, c: &Colors) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (i, position) in TAB_ORDER.iter().enumerate() {
        let style = if TabId(i) == active {
            Style::default()
                .fg(c.background)
                .bg(c.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(c.text)
        };
        spans.push(Span::styled(format!("[{}:{}]", i + 1, position.label()), style));
        spans.push(Span::raw(" "));
    }
    spans
}

fn theme_label(theme: Theme) -> &'static str {
    match theme {
        Theme::Light => "Light",
        Theme::Dark => "Dark",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
