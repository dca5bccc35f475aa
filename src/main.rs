//! Barwatch - Entry Point
//!
//! Initializes logging and the terminal, builds the dashboard, and runs the
//! main loop until the user quits.

use std::fs::OpenOptions;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use barwatch::ui::App;
use barwatch::{Config, Dashboard, TornApi};

/// Redraws per second; countdowns only change once a second
const TARGET_FPS: u64 = 10;
const FRAME_TIME: Duration = Duration::from_millis(1000 / TARGET_FPS);
/// How long to wait for the first snapshot before showing the UI
const STARTUP_WAIT: Duration = Duration::from_secs(3);

fn main() -> Result<()> {
    // Initialize logging to file (to avoid interfering with TUI)
    let log_file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("barwatch.log")
        .or_else(|_| OpenOptions::new().write(true).open("/dev/null"))
        .context("failed to open log file")?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    log::info!("Starting Barwatch v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration before touching the terminal so errors stay readable
    let config_path = Config::path();
    if !config_path.exists() {
        if let Err(e) = Config::export_default(&config_path) {
            log::warn!("Could not write default config: {}", e);
        }
    }
    let config = Config::load().context("failed to load configuration")?;
    let api_key = config.api_key()?.to_string();
    let api = TornApi::new(&config.api, api_key).context("failed to build API client")?;
    log::info!(
        "Polling {} every {}s",
        api.endpoint(),
        config.poll_interval().as_secs()
    );

    let mut dashboard = Dashboard::new(&config, Arc::new(api));
    let mut app = App::new();

    // Start the first poll and give it a moment so the first frame has data
    dashboard.update(Duration::ZERO);
    if !dashboard.wait_for_poll(STARTUP_WAIT) {
        log::info!("First poll still running, starting UI without data");
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app, &mut dashboard);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        log::error!("Barwatch exited with error: {}", e);
        eprintln!("Error: {}", e);
    }

    log::info!("Barwatch shut down cleanly");
    result
}

/// Main loop: input, dashboard update, draw
fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    dashboard: &mut Dashboard,
) -> Result<()> {
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();
        let delta = frame_start.duration_since(last_frame);
        last_frame = frame_start;

        // Update polling and countdowns
        dashboard.update(delta);

        // Render
        terminal.draw(|frame| {
            app.render(frame, dashboard);
        })?;

        // Wait for input for the rest of the frame
        let timeout = FRAME_TIME.saturating_sub(frame_start.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events, not releases
                if key.kind == KeyEventKind::Press {
                    match app.handle_input(key, dashboard) {
                        Ok(true) => break,
                        Ok(false) => {}
                        Err(e) => log::warn!("Input handling error: {}", e),
                    }
                }
            }
        }
    }

    Ok(())
}
