// Player multi-select: every player in the tab's view, selected ones checked.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use ratatui::Frame;

use crate::tui::theme::colors;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let c = colors(state.theme);
    let Some(tab) = state.active() else {
        frame.render_widget(Block::default().borders(Borders::ALL).title(" Players "), area);
        return;
    };

    let items: Vec<ListItem> = tab
        .options
        .iter()
        .map(|player| {
            let selected = tab.selection.is_selected(player);
            let (mark, style) = if selected {
                ("[x] ", Style::default().fg(c.text))
            } else {
                ("[ ] ", Style::default().fg(c.muted))
            };
            ListItem::new(Line::from(vec![
                Span::styled(mark, style),
                Span::styled(player.name.clone(), style),
            ]))
        })
        .collect();

    let title = format!(
        " Players {}/{} ",
        tab.selection.players.len(),
        tab.options.len()
    );

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(c.grid))
                .title(title),
        )
        .style(Style::default().bg(c.panel))
        .highlight_style(
            Style::default()
                .fg(c.background)
                .bg(c.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut list_state =
        ListState::default().with_selected(Some(state.list_cursor[state.active_tab.0]));
    frame.render_stateful_widget(list, area, &mut list_state);
}
