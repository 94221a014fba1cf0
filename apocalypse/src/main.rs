//! Apocalypse Nightmare terminal application.
//!
//! A menu-driven race against the clock: you've seen your town destroyed in
//! a vision and have one day to change how it ends.
//!
//! # Headless Mode
//!
//! Run with `--headless` for a line-oriented interface suitable for scripts:
//!
//! ```bash
//! cargo run -p apocalypse -- --headless --name Riley --seed 7
//! ```

mod app;
mod events;
mod headless;
mod ui;

use anyhow::{Context, Result};
use apocalypse_core::config::DEFAULT_CONFIG_PATH;
use apocalypse_core::world::NarrativeType;
use apocalypse_core::{GameConfig, GameSession, HeadlessGame};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use app::App;
use events::{handle_event, EventResult};
use ui::render::render;

/// Environment variable that overrides the config file location.
const CONFIG_ENV: &str = "APOCALYPSE_CONFIG";

#[derive(Parser)]
#[command(name = "apocalypse")]
#[command(version)]
#[command(about = "Apocalypse Nightmare: one day to save your town")]
struct Cli {
    /// Run in headless mode (text-only, no TUI)
    #[arg(long)]
    headless: bool,

    /// Protagonist name (skips the name prompt)
    #[arg(short, long)]
    name: Option<String>,

    /// Path to configuration file [env: APOCALYPSE_CONFIG]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Resume a saved game
    #[arg(short, long)]
    load: Option<PathBuf>,

    /// Fixed RNG seed for a reproducible game
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (the TUI logs nowhere otherwise)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    setup_logging(&cli)?;

    let config = load_config(&cli)?;
    let session = match &cli.load {
        Some(path) => GameSession::load(config.clone(), path)
            .await
            .with_context(|| format!("loading {}", path.display()))?,
        None => GameSession::new(config.clone()),
    };

    if cli.headless {
        let game = HeadlessGame::from_session(session);
        return headless::run_headless(game, config)
            .await
            .context("headless session failed");
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let ask_name = cli.name.is_none() && cli.load.is_none();
    let result = run_app(&mut terminal, App::new(session, ask_name)).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result.context("terminal error")
}

/// Merge the config file with command line overrides.
fn load_config(cli: &Cli) -> Result<GameConfig> {
    let path = cli
        .config
        .clone()
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

    // An explicitly named file must load; the default location is optional
    let mut config = match path {
        Some(path) => GameConfig::load(&path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => GameConfig::load_or_default(DEFAULT_CONFIG_PATH),
    };

    if let Some(name) = &cli.name {
        config = config.with_default_name(name.clone());
    }
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    Ok(config)
}

/// Logs go to stderr in headless mode. The TUI owns the terminal, so it
/// only logs when given a file.
fn setup_logging(cli: &Cli) -> Result<()> {
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact();

    match (&cli.log_file, cli.headless) {
        (Some(path), _) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            let subscriber = builder.with_ansi(false).with_writer(Mutex::new(file)).finish();
            tracing::subscriber::set_global_default(subscriber)
                .context("failed to set subscriber")?;
        }
        (None, true) => {
            let subscriber = builder.with_writer(io::stderr).finish();
            tracing::subscriber::set_global_default(subscriber)
                .context("failed to set subscriber")?;
        }
        (None, false) => {}
    }
    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| render(f, &app))?;

        // Process any pending save operation
        if let Some(path) = app.pending_save.take() {
            match app.session.save(&path).await {
                Ok(()) => {
                    app.set_status(format!("Saved to {}", path.display()));
                    app.add_narrative(
                        format!("Game saved to {}.", path.display()),
                        NarrativeType::System,
                    );
                }
                Err(e) => app.set_status(format!("Save failed: {e}")),
            }
            continue;
        }

        if event::poll(Duration::from_millis(100))? {
            let ev = event::read()?;
            match handle_event(&mut app, ev) {
                EventResult::Quit => return Ok(()),
                EventResult::NeedsRedraw | EventResult::Continue => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
