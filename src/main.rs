//! spark-folio - A single-page portfolio in the terminal
//!
//! The nav bar follows the section in view, nav keys scroll to sections, and
//! jumping to a section from another page lands on it once it has mounted.

#![deny(unsafe_code)]

mod cli;

use std::fs::{self, File};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use crossterm::terminal;
use log::{LevelFilter, info};

use cli::Cli;
use spark_folio::app::App;
use spark_folio::config::SiteConfig;
use spark_folio::contact::OutboxRelay;
use spark_folio::content::Portfolio;
use spark_folio::pipeline::Route;
use spark_folio::renderer::DiffRenderer;
use spark_folio::state::{InputEvent, poll_event};

/// Frame budget for the event loop
const FRAME: Duration = Duration::from_millis(16);

/// Main entry point for the spark-folio CLI application
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

/// Run the CLI application
fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config = match &cli.config {
        Some(path) => SiteConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => SiteConfig::default(),
    };

    if let Some(path) = &cli.write_config {
        config
            .save(path)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        println!("Wrote configuration to {}", path.display());
        return Ok(());
    }

    let portfolio = match &cli.content {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("Failed to read content from {}", path.display()))?;
            Portfolio::parse(&source)
                .with_context(|| format!("Invalid content in {}", path.display()))?
        }
        None => Portfolio::bundled().context("Bundled content is invalid")?,
    };

    let route = Route::parse(&cli.route).ok_or_else(|| anyhow!("Unknown route: {}", cli.route))?;
    let size = terminal::size().context("Failed to read terminal size")?;

    let mut app = App::new(
        config,
        portfolio,
        Box::new(OutboxRelay::new(&cli.outbox)),
        route,
        size,
        Instant::now(),
    );

    let mut session = TerminalSession::start().context("Failed to enter fullscreen")?;
    info!("started at {}x{}", size.0, size.1);
    event_loop(&mut app, &mut session.renderer)
}

fn event_loop(app: &mut App, renderer: &mut DiffRenderer<Stdout>) -> Result<()> {
    let mut last = Instant::now();

    while app.is_running() {
        if let Some(event) = poll_event(FRAME, app.input_mode())? {
            match event {
                InputEvent::Action(action) => app.handle(action, Instant::now()),
                InputEvent::Resize(width, height) => {
                    app.resize(width, height);
                    renderer.invalidate();
                }
                InputEvent::None => {}
            }
        }

        let now = Instant::now();
        app.tick(now, now.saturating_duration_since(last));
        last = now;

        renderer.render(&app.render())?;
    }

    Ok(())
}

/// Logs go to a file; stderr would draw over the fullscreen UI.
fn init_logging(cli: &Cli) -> Result<()> {
    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let mut builder = env_logger::Builder::from_default_env();
    match &cli.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            builder
                .filter_level(level)
                .target(env_logger::Target::Pipe(Box::new(file)));
        }
        None if std::env::var_os("RUST_LOG").is_some() => {}
        None => {
            builder.filter_level(LevelFilter::Off);
        }
    }
    builder.init();
    Ok(())
}

// =============================================================================
// Terminal session
// =============================================================================

/// Raw mode plus the alternate screen, restored on drop.
struct TerminalSession {
    renderer: DiffRenderer<Stdout>,
}

impl TerminalSession {
    fn start() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut renderer = DiffRenderer::new(io::stdout());
        if let Err(err) = renderer.enter_fullscreen() {
            let _ = terminal::disable_raw_mode();
            return Err(err);
        }
        Ok(Self { renderer })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.renderer.exit_fullscreen();
        let _ = terminal::disable_raw_mode();
    }
}
