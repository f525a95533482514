// Application state and event loop.
//
// Receives UserCommands from the TUI, routes them through the dashboard's
// dispatch, and pushes the resulting UiUpdates back to the TUI render loop.

use std::path::Path;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use skaterdash_core::config::{self, Config};
use skaterdash_core::dashboard::{Dashboard, DashboardEvent, DashboardSettings, DispatchOutcome};
use skaterdash_core::dataset::Dataset;

use crate::protocol::{AppSnapshot, UiUpdate, UserCommand};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub dashboard: Dashboard,
    /// Shown in the header, e.g. "2023-2024".
    pub season_label: String,
    pub source_url: String,
}

impl AppState {
    pub fn new(dashboard: Dashboard, config: &Config) -> Self {
        AppState {
            dashboard,
            season_label: config.data.season_label.clone(),
            source_url: config.data.source_url.clone(),
        }
    }

    pub fn build_snapshot(&self) -> AppSnapshot {
        let dash = &self.dashboard;
        AppSnapshot {
            season_label: self.season_label.clone(),
            source_url: self.source_url.clone(),
            theme: dash.theme(),
            active_tab: dash.active_tab(),
            stats: dash.catalog().stats.iter().cloned().collect(),
            tabs: dash.tabs().to_vec(),
            profile: dash.profile().cloned(),
        }
    }

    /// Apply one command and return the update for the TUI.
    ///
    /// `Quit` is handled by the loop and yields `None`.
    pub fn handle_command(&mut self, cmd: UserCommand) -> Option<UiUpdate> {
        let event = match cmd {
            UserCommand::SwitchTab(tab) => DashboardEvent::SwitchTab(tab),
            UserCommand::Selection { tab, event } => DashboardEvent::Selection { tab, event },
            UserCommand::ClickPoint { tab, player } => DashboardEvent::PointClicked { tab, player },
            UserCommand::ToggleTheme => DashboardEvent::ToggleTheme,
            UserCommand::Quit => return None,
        };
        debug!("dispatching {:?}", event);

        let update = match self.dashboard.dispatch(event) {
            DispatchOutcome::ChartUpdated(tab) => {
                let state = self.dashboard.tab(tab)?.clone();
                UiUpdate::TabUpdated(Box::new(state))
            }
            DispatchOutcome::ProfileUpdated => {
                let profile = self.dashboard.profile()?.clone();
                UiUpdate::ProfileUpdated(Box::new(profile))
            }
            DispatchOutcome::ThemeChanged(theme) => {
                info!("theme changed to {:?}", theme);
                UiUpdate::Snapshot(Box::new(self.build_snapshot()))
            }
            DispatchOutcome::TabSwitched(tab) => UiUpdate::ActiveTab(tab),
            DispatchOutcome::Rejected { tab, error } => UiUpdate::InteractionRejected {
                tab,
                message: error.to_string(),
            },
        };
        Some(update)
    }
}

// ---------------------------------------------------------------------------
// Startup
// ---------------------------------------------------------------------------

/// Load config, the skater table and the dashboard from `base_dir`.
///
/// Any failure is logged with its full context chain before it is returned,
/// so the log file records why the process exited.
pub fn startup(base_dir: &Path) -> anyhow::Result<AppState> {
    build_state(base_dir).inspect_err(|e| error!("startup failed: {:#}", e))
}

fn build_state(base_dir: &Path) -> anyhow::Result<AppState> {
    let config = config::load_config(base_dir).context("failed to load configuration")?;
    info!(
        "Config loaded: season={}, top_n={}, ranking by {}",
        config.data.season_label, config.dashboard.top_n, config.dashboard.ranking_stat
    );

    let data_path = config.data_path(base_dir);
    let dataset = Dataset::load(&data_path)
        .with_context(|| format!("failed to load skater data from {}", data_path.display()))?;

    let catalog = config.catalog().context("invalid statistic catalog")?;
    let dashboard = Dashboard::new(dataset, catalog, DashboardSettings::from_config(&config))
        .context("failed to initialize dashboard")?;
    info!(
        "Dashboard ready: {} tabs, {} statistics",
        dashboard.tabs().len(),
        dashboard.catalog().stats.len()
    );

    Ok(AppState::new(dashboard, &config))
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the application event loop until `Quit` arrives or the command
/// channel closes.
///
/// Sends the initial snapshot first so the TUI can draw immediately.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    let snapshot = state.build_snapshot();
    if tracing::enabled!(tracing::Level::DEBUG) {
        match serde_json::to_string(&snapshot) {
            Ok(json) => debug!("startup snapshot: {}", json),
            Err(e) => warn!("failed to encode startup snapshot: {}", e),
        }
    }
    if ui_tx.send(UiUpdate::Snapshot(Box::new(snapshot))).await.is_err() {
        info!("UI channel closed before startup snapshot");
        return Ok(());
    }

    loop {
        match cmd_rx.recv().await {
            Some(UserCommand::Quit) => {
                info!("Quit command received, shutting down");
                break;
            }
            Some(cmd) => {
                if let Some(update) = state.handle_command(cmd) {
                    if ui_tx.send(update).await.is_err() {
                        info!("UI channel closed, shutting down");
                        break;
                    }
                }
            }
            None => {
                info!("Command channel closed, shutting down");
                break;
            }
        }
    }

    info!("Application event loop exiting");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
