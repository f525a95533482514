// Tab orchestrator: owns every tab's selection and chart plus the shared
// profile panel.
//
// All interaction goes through `Dashboard::dispatch`. Each event kind maps to
// one handler that computes a `Change` without touching state; only a
// successful change is committed. A failed handler leaves the previous chart
// and profile in place and the error is reported in the outcome.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, ConfigurationError, UnknownStatisticError};
use crate::chart::{self, ChartSpec, RenderRequest, Theme};
use crate::config::Config;
use crate::dataset::{distinct_players, DataLoadError, Dataset, PlayerIdentity, Position};
use crate::profile::{self, AssetTemplates, PlayerNotFoundError, ProfileSummary, PROFILE_STATS};
use crate::ranking;
use crate::selection::{SelectionContext, SelectionError, SelectionEvent, SelectionState};

/// Tab order as shown in the tab bar.
pub const TAB_ORDER: [Position; 5] = [
    Position::Center,
    Position::RightWing,
    Position::LeftWing,
    Position::Defenseman,
    Position::AllSkaters,
];

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Anything that stops the dashboard from being built. Fatal at startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Data(#[from] DataLoadError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    UnknownStatistic(#[from] UnknownStatisticError),

    #[error(transparent)]
    Selection(#[from] SelectionError),
}

/// A rejected interaction. The dashboard keeps its previous state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InteractionError {
    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    UnknownStatistic(#[from] UnknownStatisticError),

    #[error(transparent)]
    PlayerNotFound(#[from] PlayerNotFoundError),

    #[error("no tab at index {index}")]
    UnknownTab { index: usize },
}

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

/// Index into `TAB_ORDER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TabId(pub usize);

impl TabId {
    pub fn all() -> impl Iterator<Item = TabId> {
        (0..TAB_ORDER.len()).map(TabId)
    }

    pub fn for_position(position: Position) -> TabId {
        TabId(
            TAB_ORDER
                .iter()
                .position(|p| *p == position)
                .unwrap_or(TAB_ORDER.len() - 1),
        )
    }

    pub fn position(self) -> Option<Position> {
        TAB_ORDER.get(self.0).copied()
    }

    /// The next tab, wrapping around.
    pub fn next(self) -> TabId {
        TabId((self.0 + 1) % TAB_ORDER.len())
    }

    pub fn prev(self) -> TabId {
        TabId((self.0 + TAB_ORDER.len() - 1) % TAB_ORDER.len())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabState {
    pub id: TabId,
    pub position: Position,
    /// Distinct players in this tab's view, first-seen order.
    pub options: Vec<PlayerIdentity>,
    /// Top-N by the ranking statistic; the initial and reset selection.
    pub defaults: Vec<PlayerIdentity>,
    pub selection: SelectionState,
    /// Last successfully rendered chart.
    pub chart: ChartSpec,
    /// Message from the most recent rejected interaction, cleared on success.
    pub last_error: Option<String>,
}

impl TabState {
    pub fn title(&self) -> &'static str {
        self.position.label()
    }
}

// ---------------------------------------------------------------------------
// Events and outcomes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
    Selection { tab: TabId, event: SelectionEvent },
    PointClicked { tab: TabId, player: PlayerIdentity },
    ToggleTheme,
    SwitchTab(TabId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    ChartUpdated(TabId),
    ProfileUpdated,
    /// Every tab was re-rendered.
    ThemeChanged(Theme),
    TabSwitched(TabId),
    Rejected {
        tab: Option<TabId>,
        error: InteractionError,
    },
}

/// State to commit after a handler succeeds.
enum Change {
    Tab {
        tab: TabId,
        selection: SelectionState,
        chart: ChartSpec,
    },
    Profile(ProfileSummary),
    Theme {
        theme: Theme,
        charts: Vec<ChartSpec>,
    },
    Active(TabId),
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSettings {
    pub top_n: usize,
    pub ranking_stat: String,
    pub default_stat_x: String,
    pub default_stat_y: String,
    pub theme: Theme,
    pub assets: AssetTemplates,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        DashboardSettings {
            top_n: 50,
            ranking_stat: "I_F_points".into(),
            default_stat_x: "icetime".into(),
            default_stat_y: "I_F_points".into(),
            theme: Theme::Dark,
            assets: AssetTemplates::default(),
        }
    }
}

impl DashboardSettings {
    pub fn from_config(config: &Config) -> Self {
        DashboardSettings {
            top_n: config.dashboard.top_n,
            ranking_stat: config.dashboard.ranking_stat.clone(),
            default_stat_x: config.dashboard.default_stat_x.clone(),
            default_stat_y: config.dashboard.default_stat_y.clone(),
            theme: config.dashboard.theme,
            assets: config.assets.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

pub struct Dashboard {
    dataset: Dataset,
    catalog: Catalog,
    assets: AssetTemplates,
    theme: Theme,
    tabs: Vec<TabState>,
    active: TabId,
    profile: Option<ProfileSummary>,
}

impl Dashboard {
    /// Validate the dataset against the catalog and build every tab.
    ///
    /// Checks, in order: every catalog and profile column exists, the ranking
    /// statistic exists, every team has a color, the default axes are in the
    /// catalog.
    pub fn new(
        dataset: Dataset,
        catalog: Catalog,
        settings: DashboardSettings,
    ) -> Result<Self, StartupError> {
        dataset.require_columns(catalog.stats.keys())?;
        dataset.require_columns(PROFILE_STATS.iter().copied())?;
        if !dataset.has_column(&settings.ranking_stat) {
            return Err(UnknownStatisticError::new(&settings.ranking_stat).into());
        }
        catalog.teams.ensure_covers(dataset.teams())?;

        let mut tabs = Vec::with_capacity(TAB_ORDER.len());
        for (i, &position) in TAB_ORDER.iter().enumerate() {
            let rows = dataset.filter_by_position(position);
            let options = distinct_players(rows.iter().copied());
            let defaults = ranking::top_n(&rows, settings.top_n, &settings.ranking_stat)?;
            let ctx = SelectionContext {
                catalog: &catalog.stats,
                options: &options,
                defaults: &defaults,
            };
            let selection =
                SelectionState::new(&settings.default_stat_x, &settings.default_stat_y, &ctx)?;
            let chart = render_tab(&dataset, &catalog, position, &selection, settings.theme)?;
            debug!(
                "tab {}: {} players, {} selected, {} points",
                position.label(),
                options.len(),
                selection.players.len(),
                chart.points.len()
            );
            tabs.push(TabState {
                id: TabId(i),
                position,
                options,
                defaults,
                selection,
                chart,
                last_error: None,
            });
        }

        info!(
            "dashboard ready: {} rows, {} stats, top {} by {}",
            dataset.len(),
            catalog.stats.len(),
            settings.top_n,
            settings.ranking_stat
        );

        Ok(Dashboard {
            dataset,
            catalog,
            assets: settings.assets,
            theme: settings.theme,
            tabs,
            active: TabId(0),
            profile: None,
        })
    }

    pub fn tabs(&self) -> &[TabState] {
        &self.tabs
    }

    pub fn tab(&self, id: TabId) -> Option<&TabState> {
        self.tabs.get(id.0)
    }

    pub fn active_tab(&self) -> TabId {
        self.active
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn profile(&self) -> Option<&ProfileSummary> {
        self.profile.as_ref()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Route one event to its handler and commit the result.
    pub fn dispatch(&mut self, event: DashboardEvent) -> DispatchOutcome {
        let tab = event_tab(&event);
        let result = match event {
            DashboardEvent::Selection { tab, event } => self.on_selection(tab, event),
            DashboardEvent::PointClicked { tab, player } => self.on_point_clicked(tab, &player),
            DashboardEvent::ToggleTheme => self.on_toggle_theme(),
            DashboardEvent::SwitchTab(tab) => self.on_switch_tab(tab),
        };

        match result {
            Ok(change) => self.commit(change),
            Err(error) => {
                warn!("interaction rejected: {}", error);
                if let Some(state) = tab.and_then(|t| self.tabs.get_mut(t.0)) {
                    state.last_error = Some(error.to_string());
                }
                DispatchOutcome::Rejected { tab, error }
            }
        }
    }

    // -- handlers -----------------------------------------------------------

    fn on_selection(&self, id: TabId, event: SelectionEvent) -> Result<Change, InteractionError> {
        let tab = self.lookup(id)?;
        let ctx = SelectionContext {
            catalog: &self.catalog.stats,
            options: &tab.options,
            defaults: &tab.defaults,
        };
        let selection = tab.selection.apply(event, &ctx)?;
        let chart = render_tab(&self.dataset, &self.catalog, tab.position, &selection, self.theme)?;
        Ok(Change::Tab {
            tab: id,
            selection,
            chart,
        })
    }

    fn on_point_clicked(
        &self,
        id: TabId,
        player: &PlayerIdentity,
    ) -> Result<Change, InteractionError> {
        let tab = self.lookup(id)?;
        if !tab.options.contains(player) {
            return Err(SelectionError::UnknownPlayer {
                player: player.name.clone(),
            }
            .into());
        }
        let summary = profile::resolve(player, &self.dataset, &self.assets)?;
        Ok(Change::Profile(summary))
    }

    fn on_toggle_theme(&self) -> Result<Change, InteractionError> {
        let theme = self.theme.toggled();
        let charts = self
            .tabs
            .iter()
            .map(|tab| render_tab(&self.dataset, &self.catalog, tab.position, &tab.selection, theme))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Change::Theme { theme, charts })
    }

    fn on_switch_tab(&self, id: TabId) -> Result<Change, InteractionError> {
        self.lookup(id)?;
        Ok(Change::Active(id))
    }

    fn lookup(&self, id: TabId) -> Result<&TabState, InteractionError> {
        self.tabs
            .get(id.0)
            .ok_or(InteractionError::UnknownTab { index: id.0 })
    }

    fn commit(&mut self, change: Change) -> DispatchOutcome {
        match change {
            Change::Tab {
                tab,
                selection,
                chart,
            } => {
                let state = &mut self.tabs[tab.0];
                state.selection = selection;
                state.chart = chart;
                state.last_error = None;
                DispatchOutcome::ChartUpdated(tab)
            }
            Change::Profile(summary) => {
                info!("profile: {}", summary.player);
                self.profile = Some(summary);
                DispatchOutcome::ProfileUpdated
            }
            Change::Theme { theme, charts } => {
                self.theme = theme;
                for (state, chart) in self.tabs.iter_mut().zip(charts) {
                    state.chart = chart;
                }
                DispatchOutcome::ThemeChanged(theme)
            }
            Change::Active(tab) => {
                self.active = tab;
                DispatchOutcome::TabSwitched(tab)
            }
        }
    }
}

fn event_tab(event: &DashboardEvent) -> Option<TabId> {
    match event {
        DashboardEvent::Selection { tab, .. } | DashboardEvent::PointClicked { tab, .. } => {
            Some(*tab)
        }
        DashboardEvent::SwitchTab(tab) => Some(*tab),
        DashboardEvent::ToggleTheme => None,
    }
}

fn render_tab(
    dataset: &Dataset,
    catalog: &Catalog,
    position: Position,
    selection: &SelectionState,
    theme: Theme,
) -> Result<ChartSpec, UnknownStatisticError> {
    let rows = dataset.filter_by_position(position);
    chart::render(
        &RenderRequest {
            rows: &rows,
            stat_x: &selection.stat_x,
            stat_y: &selection.stat_y,
            selected: &selection.players,
            theme,
            title_prefix: position.label(),
        },
        catalog,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{StatCatalog, TeamColors};
    use std::collections::HashMap;

    const CSV: &str = "\
playerId,name,team,position,situation,games_played,icetime,timeOnBench,I_F_goals,I_F_primaryAssists,I_F_secondaryAssists,I_F_points
1,Center One,EDM,C,all,82,90000,1000,40,30,10,80
1,Center One,EDM,C,5on4,82,12000,0,10,5,2,17
2,Center Two,TOR,C,all,80,85000,900,35,25,15,75
3,Center Three,BOS,C,all,78,80000,800,30,30,15,75
4,Wing Left,NYR,L,all,82,70000,700,20,20,10,50
5,Wing Right,COL,R,all,82,72000,600,25,20,5,50
6,Dman,CAR,D,all,82,110000,500,10,30,20,60";

    fn small_catalog() -> Catalog {
        let keys: Vec<String> = [
            "games_played",
            "icetime",
            "timeOnBench",
            "I_F_goals",
            "I_F_points",
        ]
        .iter()
        .map(|k| k.to_string())
        .collect();
        Catalog {
            stats: StatCatalog::from_parts(&keys, &StatCatalog::builtin_labels()).unwrap(),
            teams: TeamColors::builtin(),
        }
    }

    fn settings(top_n: usize) -> DashboardSettings {
        DashboardSettings {
            top_n,
            default_stat_x: "games_played".into(),
            default_stat_y: "I_F_goals".into(),
            ..DashboardSettings::default()
        }
    }

    fn dashboard(top_n: usize) -> Dashboard {
        let ds = Dataset::from_reader(CSV.as_bytes()).unwrap();
        Dashboard::new(ds, small_catalog(), settings(top_n)).unwrap()
    }

    fn p(id: u64, name: &str) -> PlayerIdentity {
        PlayerIdentity::new(id, name)
    }

    const CENTERS: TabId = TabId(0);
    const ALL: TabId = TabId(4);

    #[test]
    fn tabs_follow_fixed_order() {
        let dash = dashboard(50);
        let titles: Vec<&str> = dash.tabs().iter().map(|t| t.title()).collect();
        assert_eq!(
            titles,
            vec!["Centers", "Right Wingers", "Left Wingers", "Defenseman", "All Skaters"]
        );
    }

    #[test]
    fn defaults_are_top_n_with_first_seen_tie_break() {
        let dash = dashboard(2);
        let centers = dash.tab(CENTERS).unwrap();
        // Center One sums both situation rows.
        assert_eq!(
            centers.defaults,
            vec![p(1, "Center One"), p(2, "Center Two")]
        );
        assert_eq!(centers.selection.players, centers.defaults);
        assert_eq!(centers.options.len(), 3);
    }

    #[test]
    fn initial_chart_plots_only_all_situation_rows() {
        let dash = dashboard(50);
        let chart = &dash.tab(CENTERS).unwrap().chart;
        assert_eq!(chart.points.len(), 3);
        assert_eq!(chart.title, "Centers Goals vs Games Played");
        let one = &chart.points[0];
        assert_eq!((one.x, one.y), (82.0, 40.0));
    }

    #[test]
    fn selection_event_rerenders_only_that_tab() {
        let mut dash = dashboard(50);
        let before_all = dash.tab(ALL).unwrap().chart.clone();

        let outcome = dash.dispatch(DashboardEvent::Selection {
            tab: CENTERS,
            event: SelectionEvent::SetPlayers(vec![p(3, "Center Three")]),
        });
        assert_eq!(outcome, DispatchOutcome::ChartUpdated(CENTERS));
        assert_eq!(dash.tab(CENTERS).unwrap().chart.points.len(), 1);
        assert_eq!(dash.tab(ALL).unwrap().chart, before_all);
    }

    #[test]
    fn unknown_stat_keeps_previous_chart() {
        let mut dash = dashboard(50);
        let before = dash.tab(CENTERS).unwrap().chart.clone();

        let outcome = dash.dispatch(DashboardEvent::Selection {
            tab: CENTERS,
            event: SelectionEvent::SetStatX("I_F_xGoals".into()),
        });
        match outcome {
            DispatchOutcome::Rejected { tab, error } => {
                assert_eq!(tab, Some(CENTERS));
                assert!(matches!(error, InteractionError::Selection(_)));
            }
            other => panic!("expected Rejected, got {:?}", other),
        }
        let tab = dash.tab(CENTERS).unwrap();
        assert_eq!(tab.chart, before);
        assert_eq!(tab.selection.stat_x, "games_played");
        assert!(tab.last_error.as_deref().unwrap().contains("I_F_xGoals"));

        // A later success clears the error.
        dash.dispatch(DashboardEvent::Selection {
            tab: CENTERS,
            event: SelectionEvent::SwapAxes,
        });
        assert!(dash.tab(CENTERS).unwrap().last_error.is_none());
    }

    #[test]
    fn last_click_wins_across_tabs() {
        let mut dash = dashboard(50);
        assert!(dash.profile().is_none());

        let outcome = dash.dispatch(DashboardEvent::PointClicked {
            tab: CENTERS,
            player: p(2, "Center Two"),
        });
        assert_eq!(outcome, DispatchOutcome::ProfileUpdated);
        assert_eq!(dash.profile().unwrap().player.name, "Center Two");

        let centers_before = dash.tab(CENTERS).unwrap().selection.clone();
        dash.dispatch(DashboardEvent::PointClicked {
            tab: TabId::for_position(Position::Defenseman),
            player: p(6, "Dman"),
        });
        let profile = dash.profile().unwrap();
        assert_eq!(profile.player.name, "Dman");
        assert_eq!(profile.points, 60);
        assert_eq!(dash.tab(CENTERS).unwrap().selection, centers_before);
    }

    #[test]
    fn click_on_player_outside_tab_keeps_profile() {
        let mut dash = dashboard(50);
        dash.dispatch(DashboardEvent::PointClicked {
            tab: ALL,
            player: p(4, "Wing Left"),
        });
        let outcome = dash.dispatch(DashboardEvent::PointClicked {
            tab: CENTERS,
            player: p(6, "Dman"),
        });
        assert!(matches!(outcome, DispatchOutcome::Rejected { .. }));
        assert_eq!(dash.profile().unwrap().player.name, "Wing Left");
    }

    #[test]
    fn theme_toggle_rerenders_every_tab() {
        let mut dash = dashboard(50);
        assert_eq!(dash.theme(), Theme::Dark);
        let outcome = dash.dispatch(DashboardEvent::ToggleTheme);
        assert_eq!(outcome, DispatchOutcome::ThemeChanged(Theme::Light));
        assert!(dash.tabs().iter().all(|t| t.chart.theme == Theme::Light));
        assert!(dash
            .tabs()
            .iter()
            .all(|t| t.chart.palette == Theme::Light.palette()));
    }

    #[test]
    fn switch_tab_validates_index() {
        let mut dash = dashboard(50);
        assert_eq!(
            dash.dispatch(DashboardEvent::SwitchTab(ALL)),
            DispatchOutcome::TabSwitched(ALL)
        );
        assert_eq!(dash.active_tab(), ALL);

        let outcome = dash.dispatch(DashboardEvent::SwitchTab(TabId(9)));
        assert_eq!(
            outcome,
            DispatchOutcome::Rejected {
                tab: Some(TabId(9)),
                error: InteractionError::UnknownTab { index: 9 },
            }
        );
        assert_eq!(dash.active_tab(), ALL);
    }

    #[test]
    fn startup_rejects_missing_catalog_column() {
        let ds = Dataset::from_reader(CSV.as_bytes()).unwrap();
        let err = Dashboard::new(ds, Catalog::builtin(), settings(50)).err().unwrap();
        assert!(matches!(
            err,
            StartupError::Data(DataLoadError::MissingColumn { .. })
        ));
    }

    #[test]
    fn startup_rejects_team_without_color() {
        let csv = CSV.replace("CAR", "XYZ");
        let ds = Dataset::from_reader(csv.as_bytes()).unwrap();
        let err = Dashboard::new(ds, small_catalog(), settings(50)).err().unwrap();
        assert!(matches!(
            err,
            StartupError::Configuration(ConfigurationError::MissingTeamColor { .. })
        ));

        let mut overrides = HashMap::new();
        overrides.insert("XYZ".to_string(), "#123456".to_string());
        let catalog = Catalog {
            teams: TeamColors::with_overrides(&overrides).unwrap(),
            ..small_catalog()
        };
        let ds = Dataset::from_reader(csv.as_bytes()).unwrap();
        assert!(Dashboard::new(ds, catalog, settings(50)).is_ok());
    }

    #[test]
    fn startup_rejects_unknown_ranking_stat() {
        let ds = Dataset::from_reader(CSV.as_bytes()).unwrap();
        let bad = DashboardSettings {
            ranking_stat: "I_F_assists".into(),
            ..settings(50)
        };
        assert!(matches!(
            Dashboard::new(ds, small_catalog(), bad),
            Err(StartupError::UnknownStatistic(_))
        ));
    }

    #[test]
    fn tab_id_wraps() {
        assert_eq!(TabId(4).next(), TabId(0));
        assert_eq!(TabId(0).prev(), TabId(4));
        assert_eq!(TabId::for_position(Position::LeftWing), TabId(2));
        assert_eq!(TabId::all().count(), 5);
    }
}
