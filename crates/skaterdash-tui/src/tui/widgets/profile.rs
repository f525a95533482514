// Player profile panel: the most recently clicked player, from any tab.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use skaterdash_core::profile::ProfileSummary;

use crate::tui::theme::{colors, Colors};
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let c = colors(state.theme);
    let lines = match &state.profile {
        Some(profile) => profile_lines(profile, &c),
        None => vec![Line::from(Span::styled(
            " Select a point (Left/Right, Enter) to see a player.",
            Style::default().fg(c.muted),
        ))],
    };

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(c.grid))
                .title(" Player Profile "),
        )
        .style(Style::default().bg(c.panel).fg(c.text));
    frame.render_widget(paragraph, area);
}

fn profile_lines(p: &ProfileSummary, c: &Colors) -> Vec<Line<'static>> {
    let label = Style::default().fg(c.muted);
    let value = Style::default().fg(c.text);
    let row = |name: &str, v: String| {
        Line::from(vec![
            Span::styled(format!(" {:<16}", name), label),
            Span::styled(v, value),
        ])
    };

    vec![
        Line::from(Span::styled(
            format!(" {}", p.player.name),
            Style::default().fg(c.accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(format!(" {}", p.headline), value)),
        row("Games Played", p.games_played.to_string()),
        row("Goals", p.goals.to_string()),
        row("Primary Assists", p.primary_assists.to_string()),
        row("Second Assists", p.secondary_assists.to_string()),
        row("Points", p.points.to_string()),
        row("Icetime (min)", p.icetime_minutes.to_string()),
        row("Logo", p.team_logo_url.clone()),
        row("Headshot", p.player_image_url.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::tests::sample_view_state;
    use skaterdash_core::chart::Theme;
    use skaterdash_core::dataset::{PlayerIdentity, Position};

    fn sample_profile() -> ProfileSummary {
        ProfileSummary {
            player: PlayerIdentity::new(8478402, "Connor McDavid"),
            team: "EDM".into(),
            position: Position::Center,
            situation: "all".into(),
            games_played: 76,
            goals: 32,
            primary_assists: 64,
            secondary_assists: 36,
            assists: 100,
            points: 132,
            icetime_minutes: 1633,
            team_logo_url: "https://assets.nhle.com/logos/nhl/svg/EDM_light.svg".into(),
            player_image_url: "https://assets.nhle.com/mugs/nhl/20232024/EDM/8478402.png".into(),
            headline: "EDM | C | 76 GP | 32 G | 100 A | 132 PTS".into(),
        }
    }

    #[test]
    fn lines_lead_with_name_and_headline() {
        let lines = profile_lines(&sample_profile(), &colors(Theme::Dark));
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0].spans[0].content, " Connor McDavid");
        assert!(lines[1].spans[0].content.contains("132 PTS"));
        assert_eq!(lines[6].spans[1].content, "132");
    }

    #[test]
    fn render_with_and_without_profile() {
        let backend = ratatui::backend::TestBackend::new(50, 12);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = sample_view_state();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
        state.profile = Some(sample_profile());
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
