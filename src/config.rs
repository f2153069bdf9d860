//! Command line options and session settings

use crate::game::bonus::BonusVariant;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Default main round length in seconds
pub const DEFAULT_ROUND_DURATION: u32 = 60;
/// Default unscramble round length in seconds
pub const DEFAULT_BONUS_DURATION: u32 = 60;
/// Length of the countdown shown before the bonus round
pub const BONUS_INTRO_DURATION: u32 = 5;
/// How long the end of the main round waits for a loading dictionary
pub const DEFAULT_DICTIONARY_WAIT: Duration = Duration::from_secs(3);

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "boggle-scramble")]
#[command(about = "A daily word grid: trace words, then keep them in the bonus round")]
#[command(version)]
pub struct Cli {
    /// Main round length in seconds
    #[arg(long, default_value_t = DEFAULT_ROUND_DURATION)]
    pub duration: u32,

    /// Unscramble round length in seconds
    #[arg(long, default_value_t = DEFAULT_BONUS_DURATION)]
    pub bonus_duration: u32,

    /// Which bonus round follows the main round
    #[arg(long, value_enum, default_value_t = BonusVariant::Unscramble)]
    pub bonus: BonusVariant,

    /// Ignore the once-per-day limit and never save results
    #[arg(long)]
    pub debug: bool,

    /// Newline-separated word list
    #[arg(long, default_value = "dictionary.txt")]
    pub dictionary: PathBuf,

    /// Directory for the save database and log file
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace); RUST_LOG wins when set
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Settings for a game session.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::default()
            .with_round_duration(self.duration)
            .with_bonus_duration(self.bonus_duration)
            .with_variant(self.bonus)
            .with_debug(self.debug)
    }
}

/// Settings a [`GameSession`](crate::app::GameSession) runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub round_duration: u32,
    pub bonus_duration: u32,
    pub intro_duration: u32,
    pub variant: BonusVariant,
    /// Bypass the daily gate and skip persistence
    pub debug: bool,
    pub dictionary_wait: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            round_duration: DEFAULT_ROUND_DURATION,
            bonus_duration: DEFAULT_BONUS_DURATION,
            intro_duration: BONUS_INTRO_DURATION,
            variant: BonusVariant::default(),
            debug: false,
            dictionary_wait: DEFAULT_DICTIONARY_WAIT,
        }
    }
}

impl SessionConfig {
    /// Durations below one second are raised to one.
    pub fn with_round_duration(mut self, seconds: u32) -> Self {
        self.round_duration = seconds.max(1);
        self
    }

    pub fn with_bonus_duration(mut self, seconds: u32) -> Self {
        self.bonus_duration = seconds.max(1);
        self
    }

    pub fn with_variant(mut self, variant: BonusVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_dictionary_wait(mut self, wait: Duration) -> Self {
        self.dictionary_wait = wait;
        self
    }
}
