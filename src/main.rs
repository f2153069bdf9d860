//! Boggle Scramble - a daily word grid in the terminal
//!
//! Trace words. Beat the clock. Keep what you can unscramble.

use boggle_scramble::app::{share_text, AppCoordinator};
use boggle_scramble::game::dictionary::DictionaryLoader;
use boggle_scramble::storage::{MemoryStore, SaveStore, SqliteStore};
use boggle_scramble::tui::{self, Tui};
use boggle_scramble::{Cli, Error, GameDate, GameSession, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use std::fs::OpenOptions;
use std::path::Path;
use std::time::{Duration, Instant};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let data_dir = match &cli.data_dir {
        Some(dir) => dir.clone(),
        None => SqliteStore::data_dir()?,
    };
    std::fs::create_dir_all(&data_dir)?;
    initialize_logging(&data_dir, &cli.log_level)?;
    log::info!("Starting Boggle Scramble v{}", boggle_scramble::VERSION);

    let store: Box<dyn SaveStore> = match SqliteStore::open_in(&data_dir) {
        Ok(store) => {
            if let Err(e) = store.purge_expired() {
                log::warn!("could not purge expired keys: {}", e);
            }
            Box::new(store)
        }
        Err(e) => {
            log::warn!("save store unavailable, results will not persist: {}", e);
            Box::new(MemoryStore::new())
        }
    };

    let session = GameSession::new(cli.session_config(), store)
        .with_loader(DictionaryLoader::spawn(cli.dictionary.clone()));
    let mut app = AppCoordinator::new(session, GameDate::today());

    run(&mut app)?;

    // The terminal is restored by now; leave the summary in the scrollback
    if let Some(results) = app.session.results() {
        println!("{}", share_text(results));
    }
    Ok(())
}

fn run(app: &mut AppCoordinator) -> Result<()> {
    // Initialize terminal
    let mut terminal = Tui::new()?;
    terminal.enter()?;

    // Main event loop
    let tick_rate = Duration::from_secs(1);
    let mut last_tick = Instant::now();

    loop {
        // Render
        terminal.draw(|frame| tui::render(frame, app))?;

        // Calculate timeout for next tick
        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        // Poll for events with timeout
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Esc => app.on_escape(),
                        KeyCode::Enter => app.on_enter(),
                        KeyCode::Backspace => app.on_backspace(),
                        KeyCode::Up => app.move_cursor(-1, 0),
                        KeyCode::Down => app.move_cursor(1, 0),
                        KeyCode::Left => app.move_cursor(0, -1),
                        KeyCode::Right => app.move_cursor(0, 1),
                        KeyCode::Char(c) => app.on_char(c),
                        _ => {}
                    }
                }
            }
        }

        // Handle timer tick
        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }

        // Check for quit
        if app.should_quit {
            break;
        }
    }

    // Terminal cleanup happens via Tui::drop
    Ok(())
}

/// Send log output to a file; the terminal belongs to the UI.
fn initialize_logging(data_dir: &Path, level: &str) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join("scramble.log"))?;

    env_logger::Builder::new()
        .parse_filters(level)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))
}
