//! # Boggle Scramble
//!
//! A daily word grid. Everyone gets the same 5x5 letters for a calendar day;
//! trace adjacent letters to spell words before the clock runs out, then play
//! a bonus round over the words you found.
//!
//! The game engine ([`game`], [`app`]) has no terminal dependency. The
//! [`tui`] module renders an [`app::AppCoordinator`] with ratatui.

pub mod app;
pub mod config;
pub mod game;
pub mod storage;
pub mod tui;

pub use app::{GameResults, GameSession, Phase, SessionError, SessionEvent};
pub use config::{Cli, SessionConfig};
pub use game::{Cell, GameDate, Grid};
pub use storage::{DailyRecord, MemoryStore, SaveStore, SqliteStore, StorageError};

/// Core error type for the application.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Save store failed
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Word list could not be loaded
    #[error("dictionary error: {0}")]
    Dictionary(#[from] game::dictionary::DictionaryError),

    /// Session command refused
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Logger could not be installed
    #[error("logging setup failed: {0}")]
    Logging(String),
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
