use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use statuswatch::data::build_report;
use statuswatch::ui::{self, Theme};
use statuswatch::{events, Environment, FileFetcher, HttpFetcher, Panel, Settings, StatusFetcher};

#[derive(Parser, Debug)]
#[command(name = "statuswatch")]
#[command(about = "Terminal status panel for a backend's health endpoint")]
struct Args {
    /// Config file (TOML, JSON, or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the status API
    #[arg(long)]
    api_url: Option<String>,

    /// Streaming endpoint shown in the debug view
    #[arg(long)]
    ws_url: Option<String>,

    /// Deployment label
    #[arg(long, value_enum)]
    environment: Option<Environment>,

    /// Read snapshots from a JSON file instead of the API
    #[arg(short, long, conflicts_with = "api_url")]
    file: Option<PathBuf>,

    /// Poll interval (e.g., "30s", "500ms")
    #[arg(short, long)]
    interval: Option<String>,

    /// Fetch once, write the derived report to this file, and exit
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Start with the debug view open
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let settings = resolve_settings(&args)?;

    init_tracing(settings.log_file.as_deref())?;

    let fetcher = build_fetcher(&args, &settings)?;
    info!(source = fetcher.description(), "status source ready");

    let rt = tokio::runtime::Runtime::new()?;

    // Handle export mode (non-interactive)
    if let Some(ref export_path) = args.export {
        return rt.block_on(export_to_file(fetcher.as_ref(), export_path));
    }

    // Poll tasks need the runtime; the TUI loop stays on this thread
    let _guard = rt.enter();
    run_tui(fetcher, settings, args.debug)
}

/// Layer CLI flags over file and environment settings.
fn resolve_settings(args: &Args) -> Result<Settings> {
    let mut settings = Settings::load(args.config.as_deref())?;

    if let Some(ref url) = args.api_url {
        settings.api_url = url.clone();
    }
    if let Some(ref url) = args.ws_url {
        settings.ws_url = url.clone();
    }
    if let Some(env) = args.environment {
        settings.environment = env;
    }
    if let Some(ref interval) = args.interval {
        settings.poll_interval = interval.clone();
    }

    settings.validate()?;
    Ok(settings)
}

/// Send logs to the configured file, or nowhere; the terminal belongs to the UI.
fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_ansi(false);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder.with_writer(Arc::new(file)).init();
        }
        None => builder.with_writer(io::sink).init(),
    }

    Ok(())
}

fn build_fetcher(args: &Args, settings: &Settings) -> Result<Arc<dyn StatusFetcher>> {
    if let Some(ref path) = args.file {
        return Ok(Arc::new(FileFetcher::new(path)));
    }

    let fetcher = HttpFetcher::builder()
        .endpoint(&settings.api_url)
        .path(&settings.status_path)
        .timeout(settings.request_timeout()?)
        .build()?;
    Ok(Arc::new(fetcher))
}

/// Fetch one snapshot and write its derived report as JSON
async fn export_to_file(fetcher: &dyn StatusFetcher, export_path: &Path) -> Result<()> {
    let snapshot = fetcher
        .fetch()
        .await
        .with_context(|| format!("Failed to fetch status from {}", fetcher.description()))?;

    let json = serde_json::to_string_pretty(&build_report(&snapshot))?;
    std::fs::write(export_path, json)?;

    println!("Exported status report to: {}", export_path.display());
    Ok(())
}

/// Run the TUI against the given status source
fn run_tui(fetcher: Arc<dyn StatusFetcher>, settings: Settings, debug: bool) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let mut panel = Panel::new(fetcher, settings);
    panel.theme = Theme::auto_detect();
    panel.debug_mode = debug;

    // Run the main loop
    let result = match panel.start() {
        Ok(()) => run_app(&mut terminal, &mut panel),
        Err(e) => Err(e.into()),
    };

    panel.stop();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    panel: &mut Panel,
) -> Result<()> {
    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 14;

    while panel.running {
        panel.drain_events();

        terminal.draw(|frame| {
            let area = frame.area();

            // Check for minimum terminal size
            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered = ratatui::layout::Rect::new(
                    0,
                    (area.height / 2).saturating_sub(2),
                    area.width,
                    5.min(area.height),
                );
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Error banner
                Constraint::Min(10),   // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, panel, chunks[0]);
            ui::common::render_error_banner(frame, panel, chunks[1]);
            ui::status::render(frame, panel, chunks[2]);
            ui::common::render_status_bar(frame, panel, chunks[3]);

            if panel.debug_mode {
                ui::debug::render_overlay(frame, panel, area);
            }

            if panel.show_help {
                ui::common::render_help(frame, panel, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(panel, key),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }
    }

    if panel.error.is_some() {
        warn!(error = ?panel.error, "exiting with last poll failed");
    }

    Ok(())
}
