use std::io;
use std::time::Duration;

use anyhow::Context;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use finlex::api::ApiClient;
use finlex::config::AppConfig;
use finlex::tui::app::AppState;
use finlex::tui::services::Services;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging (file-only: the TUI owns the terminal)
    let _log_guard = finlex::logging::init_tui();
    log::info!("FinLex v{} starting", finlex::VERSION);

    let config = AppConfig::load();
    let api = ApiClient::new(&config.server.base_url);
    log::info!("Assistant service: {}", api.base_url());

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let services = Services::new(api, event_tx);

    // Setup terminal
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let tick_rate = Duration::from_millis(config.tui.tick_rate_ms);
    let mut app = AppState::new(event_rx, services);
    let result = app.run(&mut terminal, tick_rate).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result.context("event loop failed")?;
    Ok(())
}
