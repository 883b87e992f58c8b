use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use snake::app::App;
use snake::config::Args;
use snake::term::TermManager;
use snake::GameController;

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = args.log_path() {
        // The terminal is in raw mode while playing, so logs go to a file.
        if let Err(err) = init_logging(&path) {
            eprintln!("Logging disabled: {:#}", err);
        }
    }

    let store = args.open_store();
    let mut controller = GameController::new(store, args.rng()?);
    if let Some(speed) = args.speed {
        controller.set_speed(speed);
    }
    info!(speed = %controller.speed(), high_score = controller.high_score(), "starting");

    let mut term = TermManager::stdout().context("reading terminal size")?;
    let res = match term.setup().context("setting up terminal") {
        Ok(()) => App::new(controller).run(&mut term),
        Err(err) => Err(err),
    };

    // Restore the terminal before reporting anything, even after a partial setup
    let restored = term.restore().context("restoring terminal");
    finish(res, restored)
}

/// The session's own error wins over a failure to restore the terminal.
fn finish(res: Result<()>, restored: Result<()>) -> Result<()> {
    match (res, restored) {
        (Err(err), Err(restore_err)) => {
            eprintln!("{:#}", restore_err);
            Err(err)
        }
        (Err(err), Ok(())) => Err(err),
        (Ok(()), restored) => restored,
    }
}

fn init_logging(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
}
