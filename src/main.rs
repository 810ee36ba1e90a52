//! Binary entry point: resolve paths, start logging, open the database, run
//! the terminal shell, then close the database exactly once.
use anyhow::Context;
use student_roster::{logging, run_app, App, Config, RecordStore, SessionController};
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    let config = Config::resolve()?;
    logging::init(&config)?;
    info!(data_dir = %config.data_dir.display(), "starting student roster");

    let store = RecordStore::open(&config.db_path).context("failed to open student database")?;
    let mut app = App::new(SessionController::new(store)).context("failed to load students")?;

    let result = run_app(&mut app);
    if let Err(err) = &result {
        error!("terminal session failed: {err:#}");
    }

    let shutdown = app
        .into_controller()
        .shutdown()
        .context("failed to close student database");
    result.and(shutdown)
}
