//! Application screen state management
//!
//! Handles transitions between the application screens:
//! - Splash: start prompt
//! - Already played: read-only summary of today's play
//! - Game: every session phase from the main round to results
//!
//! Key presses arrive here already decoded; each method translates one of
//! them into a [`GameSession`] command for the current phase.

use super::results::GameResults;
use super::state::{BonusState, GameSession, Phase, SessionError, SessionEvent};
use crate::game::{Cell, GameDate, GRID_SIZE};

/// The current application screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Waiting for the player to start today's puzzle
    Splash,
    /// Today was already played; show the stored results
    AlreadyPlayed(GameResults),
    /// A session is running (any phase after `Idle`)
    Game,
}

/// Main application coordinator
pub struct AppCoordinator {
    pub session: GameSession,
    /// Current screen
    pub screen: Screen,
    /// Date the app was opened on
    pub today: GameDate,
    /// Keyboard cursor on the grid
    pub cursor: Cell,
    /// Typed unscramble guess
    pub guess: String,
    /// Show the share summary on the results screen
    pub show_share: bool,
    /// Last warning worth keeping on screen
    pub notice: Option<String>,
    /// Whether the application should quit
    pub should_quit: bool,
}

impl AppCoordinator {
    /// Create a coordinator, going straight to the summary if today was played.
    pub fn new(session: GameSession, today: GameDate) -> Self {
        let screen = match session.already_played_view(&today) {
            Some(results) => Screen::AlreadyPlayed(results),
            None => Screen::Splash,
        };
        Self {
            session,
            screen,
            today,
            cursor: Cell::new(0, 0),
            guess: String::new(),
            show_share: false,
            notice: None,
            should_quit: false,
        }
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Start today's round.
    pub fn start(&mut self) {
        match self.session.start(self.today) {
            Ok(()) => {
                self.screen = Screen::Game;
                self.cursor = Cell::new(0, 0);
                self.guess.clear();
                self.show_share = false;
            }
            Err(SessionError::AlreadyPlayed { .. }) => {
                let view = self
                    .session
                    .already_played_view(&self.today)
                    .unwrap_or_default();
                self.screen = Screen::AlreadyPlayed(view);
            }
            Err(e) => log::warn!("could not start: {}", e),
        }
        self.collect_events();
    }

    /// Advance timers by one unit
    pub fn tick(&mut self) {
        self.session.tick();
        self.collect_events();
    }

    /// Handle Enter
    pub fn on_enter(&mut self) {
        match self.screen {
            Screen::Splash => return self.start(),
            Screen::AlreadyPlayed(_) => return,
            Screen::Game => {}
        }

        let result = match self.session.phase() {
            Phase::MainRound => self.session.submit_selection().map(|_| ()),
            Phase::MainRoundEnded => self.session.begin_bonus_intro(),
            Phase::BonusIntro => self.session.confirm_bonus(),
            Phase::BonusActive => self.submit_guess(),
            Phase::Idle | Phase::Results => Ok(()),
        };
        if let Err(e) = result {
            log::debug!("enter: {}", e);
        }
        self.collect_events();
    }

    fn submit_guess(&mut self) -> Result<(), SessionError> {
        if !matches!(self.session.bonus(), BonusState::Unscramble(_)) {
            return Ok(());
        }
        let guess = std::mem::take(&mut self.guess);
        self.session.submit_unscramble(&guess).map(|_| ())
    }

    /// Handle a printable character
    pub fn on_char(&mut self, c: char) {
        if self.screen != Screen::Game {
            if matches!(c, 'q' | 'Q') {
                self.quit();
            }
            return;
        }

        match self.session.phase() {
            Phase::MainRound if c == ' ' => {
                self.session.select_cell(self.cursor);
            }
            Phase::MainRound if c.is_ascii_alphabetic() => {
                self.session.type_letter(c.to_ascii_uppercase());
                if let Some(last) = self.session.selection().last() {
                    self.cursor = last;
                }
            }
            Phase::BonusActive => self.on_bonus_char(c),
            Phase::Results => match c {
                's' | 'S' => self.show_share = !self.show_share,
                'p' | 'P' => self.play_again(),
                'q' | 'Q' => self.quit(),
                _ => {}
            },
            _ => {}
        }
        self.collect_events();
    }

    fn on_bonus_char(&mut self, c: char) {
        match self.session.bonus() {
            BonusState::Unscramble(_) if c.is_ascii_alphabetic() => {
                self.guess.push(c.to_ascii_uppercase());
            }
            BonusState::Sentence(_) => {
                if let Some(choice) = c.to_digit(10).filter(|d| *d >= 1) {
                    if let Err(e) = self.session.answer(choice as usize - 1) {
                        log::debug!("answer: {}", e);
                    }
                }
            }
            _ => {}
        }
    }

    /// Handle backspace
    pub fn on_backspace(&mut self) {
        match self.session.phase() {
            Phase::MainRound => {
                self.session.backspace();
            }
            Phase::BonusActive => {
                self.guess.pop();
            }
            _ => {}
        }
    }

    /// Handle Esc: clear a partial selection or guess, otherwise quit
    pub fn on_escape(&mut self) {
        if self.screen == Screen::Game {
            match self.session.phase() {
                Phase::MainRound if !self.session.selection().is_empty() => {
                    self.session.clear_selection();
                    return;
                }
                Phase::BonusActive if !self.guess.is_empty() => {
                    self.guess.clear();
                    return;
                }
                _ => {}
            }
        }
        self.quit();
    }

    /// Move the grid cursor, staying inside the grid
    pub fn move_cursor(&mut self, rows: isize, cols: isize) {
        let max = GRID_SIZE as isize - 1;
        let row = (self.cursor.row as isize + rows).clamp(0, max);
        let col = (self.cursor.col as isize + cols).clamp(0, max);
        self.cursor = Cell::new(row as usize, col as usize);
    }

    fn play_again(&mut self) {
        match self.session.play_again() {
            Ok(()) => self.start(),
            Err(e) => self.session.feedback = e.to_string(),
        }
    }

    fn collect_events(&mut self) {
        for event in self.session.drain_events() {
            match event {
                SessionEvent::DictionaryWarning(message) => self.notice = Some(message),
                SessionEvent::PersistFailed(reason) => {
                    self.notice = Some(format!("Results not saved: {}", reason));
                }
                SessionEvent::BonusStarted(_) => self.guess.clear(),
                _ => {}
            }
        }
    }
}
