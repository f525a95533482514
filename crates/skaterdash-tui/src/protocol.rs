// Messages between the app event loop and the terminal UI.
//
// UserCommand flows TUI -> app; UiUpdate flows app -> TUI. Large payloads
// are boxed to keep the enums small on the channel.

use serde::Serialize;

use skaterdash_core::catalog::StatDescriptor;
use skaterdash_core::chart::Theme;
use skaterdash_core::dashboard::{TabId, TabState};
use skaterdash_core::dataset::PlayerIdentity;
use skaterdash_core::profile::ProfileSummary;
use skaterdash_core::selection::SelectionEvent;

/// Commands from the TUI to the app loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    SwitchTab(TabId),
    Selection { tab: TabId, event: SelectionEvent },
    /// The keyboard equivalent of clicking a chart point.
    ClickPoint { tab: TabId, player: PlayerIdentity },
    ToggleTheme,
    Quit,
}

/// Everything the TUI needs to draw the dashboard from scratch.
#[derive(Debug, Clone, Serialize)]
pub struct AppSnapshot {
    pub season_label: String,
    pub source_url: String,
    pub theme: Theme,
    pub active_tab: TabId,
    /// Selectable statistics in picker order.
    pub stats: Vec<StatDescriptor>,
    pub tabs: Vec<TabState>,
    pub profile: Option<ProfileSummary>,
}

/// Updates from the app loop to the TUI.
#[derive(Debug, Clone, Serialize)]
pub enum UiUpdate {
    /// Full state; sent at startup and after a theme change.
    Snapshot(Box<AppSnapshot>),
    /// One tab's selection and chart changed.
    TabUpdated(Box<TabState>),
    ProfileUpdated(Box<ProfileSummary>),
    ActiveTab(TabId),
    /// An interaction failed; the previous chart and profile stay.
    InteractionRejected { tab: Option<TabId>, message: String },
}
