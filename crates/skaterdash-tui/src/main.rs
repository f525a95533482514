// Skater dashboard entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config, data and dashboard (`app::startup`, logs its own failure)
// 3. Create mpsc channels and spawn the app task
// 4. Run the TUI until the user quits

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

use skaterdash_tui::{app, tui};

/// Used when `RUST_LOG` is unset. `skaterdash` is the binary's own target.
const DEFAULT_LOG_FILTER: &str = "skaterdash=info,skaterdash_tui=info,skaterdash_core=info,warn";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("Skater dashboard starting up");

    let base_dir = std::env::current_dir()
        .context("failed to read working directory")
        .inspect_err(|e| error!("startup failed: {:#}", e))?;
    let app_state = app::startup(&base_dir)?;

    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    if let Err(e) = tui::run(ui_rx, cmd_tx).await {
        error!("TUI error: {}", e);
    }

    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("Skater dashboard shut down cleanly");
    Ok(())
}

/// Log to `logs/skaterdash.log`; the terminal belongs to the TUI.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("skaterdash.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
