// Terminal dashboard: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors the dashboard. The app loop pushes
// `UiUpdate` messages over an mpsc channel; the TUI applies them to
// `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod theme;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Frame;
use tokio::sync::mpsc;

use skaterdash_core::catalog::StatDescriptor;
use skaterdash_core::chart::{ChartPoint, Theme};
use skaterdash_core::dashboard::{TabId, TabState, TAB_ORDER};
use skaterdash_core::dataset::PlayerIdentity;
use skaterdash_core::profile::ProfileSummary;

use crate::protocol::{AppSnapshot, UiUpdate, UserCommand};

use layout::build_layout;

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local mirror of the dashboard plus cursor and modal state.
pub struct ViewState {
    pub season_label: String,
    pub source_url: String,
    pub theme: Theme,
    pub stats: Vec<StatDescriptor>,
    pub tabs: Vec<TabState>,
    pub active_tab: TabId,
    pub profile: Option<ProfileSummary>,
    /// Highlighted row of each tab's player list, indexed by tab.
    pub list_cursor: Vec<usize>,
    /// Focused chart point of each tab, indexed by tab.
    pub point_cursor: Vec<usize>,
    /// Last rejected interaction, cleared by the next successful update.
    pub status_message: Option<String>,
    pub confirm_quit: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            season_label: String::new(),
            source_url: String::new(),
            theme: Theme::default(),
            stats: Vec::new(),
            tabs: Vec::new(),
            active_tab: TabId(0),
            profile: None,
            list_cursor: vec![0; TAB_ORDER.len()],
            point_cursor: vec![0; TAB_ORDER.len()],
            status_message: None,
            confirm_quit: false,
        }
    }
}

impl ViewState {
    /// Replace everything the snapshot covers. Cursors are kept and clamped.
    pub fn apply_snapshot(&mut self, snapshot: AppSnapshot) {
        self.season_label = snapshot.season_label;
        self.source_url = snapshot.source_url;
        self.theme = snapshot.theme;
        self.stats = snapshot.stats;
        self.tabs = snapshot.tabs;
        self.active_tab = snapshot.active_tab;
        self.profile = snapshot.profile;
        for id in TabId::all() {
            self.clamp_cursors(id);
        }
    }

    pub fn active(&self) -> Option<&TabState> {
        self.tabs.get(self.active_tab.0)
    }

    /// Player under the list cursor in the active tab.
    pub fn cursor_player(&self) -> Option<&PlayerIdentity> {
        let tab = self.active()?;
        tab.options.get(self.list_cursor[self.active_tab.0])
    }

    /// Chart point under the point cursor in the active tab.
    pub fn focused_point(&self) -> Option<&ChartPoint> {
        let tab = self.active()?;
        tab.chart.points.get(self.point_cursor[self.active_tab.0])
    }

    fn clamp_cursors(&mut self, id: TabId) {
        let Some(tab) = self.tabs.get(id.0) else {
            return;
        };
        let options = tab.options.len();
        let points = tab.chart.points.len();
        if let Some(c) = self.list_cursor.get_mut(id.0) {
            *c = (*c).min(options.saturating_sub(1));
        }
        if let Some(c) = self.point_cursor.get_mut(id.0) {
            *c = (*c).min(points.saturating_sub(1));
        }
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Snapshot(snapshot) => {
            state.apply_snapshot(*snapshot);
            state.status_message = None;
        }
        UiUpdate::TabUpdated(tab) => {
            let id = tab.id;
            if let Some(slot) = state.tabs.get_mut(id.0) {
                *slot = *tab;
                state.clamp_cursors(id);
                state.status_message = None;
            }
        }
        UiUpdate::ProfileUpdated(profile) => {
            state.profile = Some(*profile);
            state.status_message = None;
        }
        UiUpdate::ActiveTab(tab) => {
            state.active_tab = tab;
        }
        UiUpdate::InteractionRejected { message, .. } => {
            state.status_message = Some(message);
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete dashboard frame.
fn render_frame(frame: &mut Frame, state: &ViewState) {
    let colors = theme::colors(state.theme);
    frame.render_widget(
        Block::default().style(Style::default().bg(colors.background).fg(colors.text)),
        frame.area(),
    );

    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::axis_pickers::render(frame, layout.axis_pickers, state);
    widgets::chart::render(frame, layout.chart, state);
    widgets::profile::render(frame, layout.profile, state);
    widgets::players::render(frame, layout.players, state);
    widgets::help_bar::render_message(frame, layout.message_line, state);
    widgets::help_bar::render(frame, layout.help_bar, state);

    if state.confirm_quit {
        widgets::quit_confirm::render(frame, frame.area(), state.theme);
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// 1. Initializes the terminal (raw mode, alternate screen).
/// 2. Installs a panic hook that restores the terminal.
/// 3. Runs a select loop over UI updates, keyboard input and render ticks.
/// 4. Restores the terminal on exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result = loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // App loop has shut down.
                    None => break Ok(()),
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            if forward_command(&cmd_tx, cmd).await {
                                break Ok(());
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => break Err(anyhow::Error::new(e).context("terminal input error")),
                    None => break Ok(()),
                }
            }

            _ = render_tick.tick() => {
                if let Err(e) = terminal.draw(|frame| render_frame(frame, &view_state)) {
                    break Err(anyhow::Error::new(e).context("failed to draw frame"));
                }
            }
        }
    };

    ratatui::restore();
    result
}

/// Send a command to the app loop. Returns `true` when the TUI should stop:
/// the command was `Quit`, or the app loop is gone and nothing would answer.
async fn forward_command(cmd_tx: &mpsc::Sender<UserCommand>, cmd: UserCommand) -> bool {
    let quit = cmd == UserCommand::Quit;
    cmd_tx.send(cmd).await.is_err() || quit
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
