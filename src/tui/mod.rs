//! Terminal UI for Globetrotter

mod controller;
mod screen;
mod screens;
mod widgets;

use std::io;

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{error, info, instrument};

pub use controller::AppController;
pub use screen::{Screen, ScreenTransition};

use crate::config::ClientConfig;

/// Runs the terminal UI until the player quits.
///
/// Restores the terminal even when the event loop fails.
#[instrument(skip(config))]
pub async fn run_tui(config: ClientConfig) -> Result<()> {
    info!("Starting Globetrotter TUI");
    let mut app = AppController::new(config).context("Failed to create app controller")?;

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "TUI loop error");
    }
    res
}
