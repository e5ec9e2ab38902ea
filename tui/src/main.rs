//! Doomsday Terminal Entry Point
//!
//! Launches the full-screen doomsday terminal.
//!
//! # Usage
//!
//! ```bash
//! # Start with defaults (config file + environment)
//! doomsday-terminal
//!
//! # Custom config file
//! doomsday-terminal --config ./doomsday.toml
//!
//! # Never call the completion endpoint
//! doomsday-terminal --offline
//!
//! # Verbose logging (written to the log file, not the screen)
//! RUST_LOG=debug doomsday-terminal
//! ```

use std::fs::{self, OpenOptions};
use std::io;
use std::panic;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use doomsday_core::{
    load_config, load_config_from_path, ConfigOverrides, DoomsdayConfig, OpenAiBackend,
    PoemSource, Session,
};
use doomsday_tui::{App, FlowClient};

/// Doomsday Terminal - a prophecy woven around your name
#[derive(Parser, Debug)]
#[command(name = "doomsday-terminal")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, env = "DOOMSDAY_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Use the local fallback poems instead of the completion endpoint
    #[arg(long)]
    offline: bool,

    /// Starting background music volume (0-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    volume: Option<u8>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            offline: self.offline.then_some(true),
            volume: self.volume,
        }
    }
}

/// Log file location
///
/// The terminal owns the screen, so logs go to
/// `~/.cache/doomsday-terminal/doomsday.log` (or the temp dir).
fn log_file_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("doomsday-terminal")
        .join("doomsday.log")
}

fn init_logging() -> anyhow::Result<PathBuf> {
    let path = log_file_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {parent:?}"))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {path:?}"))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    Ok(path)
}

fn load(args: &Args) -> anyhow::Result<DoomsdayConfig> {
    let mut config = match &args.config {
        Some(path) => load_config_from_path(Some(path.clone()))?,
        None => load_config()?,
    };
    config.apply_overrides(&args.overrides());
    config.validate()?;

    tracing::info!(
        source = %config.source,
        path = ?config.config_file_path,
        offline = config.api.offline,
        "Configuration loaded"
    );
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Set up logging
    let log_path = init_logging()?;

    let mut config = load(&args)?;

    // Check if we have a TTY before attempting initialization
    use std::io::IsTerminal;

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: doomsday-terminal requires a terminal (TTY)");
        eprintln!();
        eprintln!("This usually means:");
        eprintln!("  - Running in a non-interactive environment (CI, container)");
        eprintln!("  - SSH without -t flag");
        eprintln!("  - Piped stdin/stdout");
        std::process::exit(1);
    }

    // Build the poem source
    if config.api.api_key.is_none() && !config.api.offline {
        tracing::warn!("No API key configured, every prophecy will be a fallback poem");
    }
    let settings = config.source_settings();
    let backend = OpenAiBackend::new(config.api.endpoint.clone(), config.api.api_key.take())?;
    let source = PoemSource::new(backend, settings);
    let client = FlowClient::new(source, Session::with_volume(config.terminal.initial_volume));

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // A poem task panicking on a worker thread is absorbed by the
        // controller; keep the screen and only log it
        if std::thread::current().name() != Some("main") {
            tracing::error!(panic = %panic_info, "Background task panicked");
            return;
        }

        // Restore terminal before printing panic
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the app
    let mut app = App::new(client, &config.terminal);
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Terminal exited with error");
        eprintln!("Logs: {}", log_path.display());
    }

    // Propagate any errors
    result
}
