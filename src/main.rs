mod app;
mod config;
mod error;
mod metadata;
mod ui;
mod watchlist;

use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::app::App;
use crate::config::Config;
use crate::error::Result;
use crate::watchlist::Watchlist;

fn setup_logging() -> Result<()> {
    let data_dir = config::data_dir()?;
    std::fs::create_dir_all(&data_dir)?;

    let file_appender = tracing_appender::rolling::daily(&data_dir, "reel.log");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("reel=info".parse().unwrap()))
        .with(fmt::layer().with_writer(file_appender).with_ansi(false))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // File-based logging only; the terminal belongs to the TUI.
    if let Err(e) = setup_logging() {
        eprintln!("Warning: Could not set up logging: {}", e);
    }

    info!("Starting reel");

    let config = Config::load()?;
    info!("Loaded config");

    // Absent or unreadable state starts an empty watchlist.
    let watchlist = Watchlist::load();
    info!(entries = watchlist.len(), "Loaded watchlist");

    let mut terminal = app::init_terminal()?;

    let mut app = App::new(config, watchlist);
    let result = app.run(&mut terminal).await;

    app::restore_terminal()?;

    result
}
