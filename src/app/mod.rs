//! Application state and core logic

pub mod results;
pub mod screen;
pub mod state;
pub mod timer;

pub use results::{format_next_puzzle, share_text, time_until_next_puzzle, GameResults};
pub use screen::{AppCoordinator, Screen};
pub use state::{BonusState, GameSession, Phase, SentenceRound, SessionError, SessionEvent};
pub use timer::{format_clock, Countdown, TimerKind, TimerSlot, Urgency};
