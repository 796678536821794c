use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{fs::File, io, path::Path, sync::mpsc, sync::Mutex};
use tracing_subscriber::EnvFilter;

use task_monitor::cli::Cli;
use task_monitor::config::Config;
use task_monitor::ui::{self, App};
use task_monitor::{ChannelNotifier, ReminderMonitor, SharedStore};

fn init_logging(path: &Path) -> Result<()> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("task_monitor=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let config = cli.apply(config);
    tracing::info!(time_format = %config.time_format, interval_secs = config.poll_interval().as_secs(), "starting");

    let store = SharedStore::new();
    let (tx, rx) = mpsc::channel();
    // The monitor has no stop signal and ends with the process.
    let _monitor = ReminderMonitor::spawn(store.clone(), config.poll_interval(), ChannelNotifier::new(tx))
        .context("failed to start reminder monitor")?;

    let mut app = App::new(store, config.time_format, rx);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = ui::run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!("{:?}", err);
        eprintln!("{:?}", err);
    }
    Ok(())
}
