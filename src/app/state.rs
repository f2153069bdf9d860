//! Game session state and the round state machine
//!
//! Phases run `Idle -> MainRound -> MainRoundEnded -> BonusIntro ->
//! BonusActive -> Results`, and back to `Idle` only through
//! [`GameSession::play_again`]. Input events and timer ticks are processed
//! one at a time; each call finishes its transition before returning.

use super::results::{GameResults, TOP_WORDS_SHOWN};
use super::timer::{Countdown, TimerKind, TimerSlot, Urgency};
use crate::config::SessionConfig;
use crate::game::bonus::{
    BonusAnswer, BonusVariant, SentenceDeck, SentencePuzzle, UnscrambleRound,
    MAX_SENTENCE_PUZZLES, POINTS_PER_CORRECT, SENTENCE_SECONDS,
};
use crate::game::dictionary::{Dictionary, DictionaryLoader, LoadOutcome};
use crate::game::ledger::{SubmitError, WordLedger};
use crate::game::path::SelectionPath;
use crate::game::{Cell, GameDate, Grid};
use crate::storage::{has_played_today, DailyRecord, SaveStore};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Feedback shown when the word list cannot be loaded
pub const DICTIONARY_WARNING: &str = "Error loading dictionary. Words cannot be validated.";

/// Undrained events kept before the oldest are dropped
pub const MAX_PENDING_EVENTS: usize = 256;

/// Where the session is in the day's play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    MainRound,
    MainRoundEnded,
    BonusIntro,
    BonusActive,
    Results,
}

/// Bonus round state for the active variant.
#[derive(Debug, Clone, Default)]
pub enum BonusState {
    #[default]
    NotStarted,
    Unscramble(UnscrambleRound),
    Sentence(SentenceRound),
}

/// Progress through the sentence bonus round.
#[derive(Debug, Clone)]
pub struct SentenceRound {
    deck: SentenceDeck,
    /// Puzzle on screen, if any
    pub current: Option<SentencePuzzle>,
    /// Puzzles presented so far, including the current one
    pub presented: usize,
    /// Puzzles that ran out of time
    pub skipped: usize,
    pub answers: Vec<BonusAnswer>,
}

/// Notifications for the presentation layer, drained with
/// [`GameSession::drain_events`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    RoundStarted { date: GameDate },
    WordAccepted { word: String, points: usize },
    WordRejected { error: SubmitError },
    DictionaryWarning(String),
    MainRoundEnded { found: usize, rejected: Vec<String> },
    BonusIntroStarted,
    BonusStarted(BonusVariant),
    BonusExhausted(String),
    PuzzleTimedOut { word: String },
    ResultsReady { final_score: usize },
    PersistFailed(String),
}

/// Errors returned by session commands.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("already played {date}, come back tomorrow for a new puzzle")]
    AlreadyPlayed { date: GameDate },
    #[error("cannot {action} during {phase:?}")]
    WrongPhase { action: &'static str, phase: Phase },
    #[error("no option {0}")]
    InvalidChoice(usize),
    #[error(transparent)]
    Submit(#[from] SubmitError),
}

/// One player's play of the daily puzzle.
pub struct GameSession {
    config: SessionConfig,
    phase: Phase,
    date: Option<GameDate>,
    grid: Option<Grid>,
    selection: SelectionPath,
    ledger: WordLedger,
    dictionary: Dictionary,
    loader: Option<DictionaryLoader>,
    dictionary_warned: bool,
    timer: TimerSlot,
    bonus: BonusState,
    bonus_score: usize,
    /// Words left after the end-of-round dictionary re-check
    words_found: usize,
    results: Option<GameResults>,
    /// Last stored play, read when the session was created
    previous: Option<DailyRecord>,
    store: Box<dyn SaveStore>,
    /// Non-seeded randomness: scrambles, sentence choice, rejected sample
    rng: StdRng,
    /// Feedback message from the last action
    pub feedback: String,
    events: Vec<SessionEvent>,
}

impl GameSession {
    /// Create a session, reading the last stored play from `store`.
    pub fn new(config: SessionConfig, store: Box<dyn SaveStore>) -> Self {
        let previous = match DailyRecord::load(store.as_ref()) {
            Ok(record) => record,
            Err(e) => {
                log::warn!("ignoring unreadable daily record: {}", e);
                None
            }
        };

        Self {
            config,
            phase: Phase::Idle,
            date: None,
            grid: None,
            selection: SelectionPath::new(),
            ledger: WordLedger::new(),
            dictionary: Dictionary::pending(),
            loader: None,
            dictionary_warned: false,
            timer: TimerSlot::new(),
            bonus: BonusState::NotStarted,
            bonus_score: 0,
            words_found: 0,
            results: None,
            previous,
            store,
            rng: StdRng::from_rng(&mut rand::rng()),
            feedback: String::new(),
            events: Vec::new(),
        }
    }

    /// Use an already loaded dictionary.
    pub fn with_dictionary(mut self, dictionary: Dictionary) -> Self {
        self.dictionary = dictionary;
        self.loader = None;
        self
    }

    /// Take the dictionary from a background loader once it finishes.
    pub fn with_loader(mut self, loader: DictionaryLoader) -> Self {
        self.dictionary = Dictionary::pending();
        self.loader = Some(loader);
        self.poll_dictionary();
        self
    }

    /// Seed the non-deterministic RNG, for reproducible tests.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    // === Accessors ===

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn date(&self) -> Option<GameDate> {
        self.date
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    pub fn selection(&self) -> &SelectionPath {
        &self.selection
    }

    /// The word spelled by the current selection.
    pub fn current_word(&self) -> String {
        self.grid
            .as_ref()
            .map(|grid| self.selection.word(grid))
            .unwrap_or_default()
    }

    pub fn ledger(&self) -> &WordLedger {
        &self.ledger
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn bonus(&self) -> &BonusState {
        &self.bonus
    }

    pub fn bonus_score(&self) -> usize {
        self.bonus_score
    }

    pub fn results(&self) -> Option<&GameResults> {
        self.results.as_ref()
    }

    pub fn previous_record(&self) -> Option<&DailyRecord> {
        self.previous.as_ref()
    }

    pub fn countdown(&self) -> Option<&Countdown> {
        self.timer.active()
    }

    pub fn time_remaining(&self) -> u32 {
        self.timer.remaining()
    }

    pub fn urgency(&self) -> Urgency {
        self.timer.active().map_or(Urgency::Calm, Countdown::urgency)
    }

    /// Number of running countdowns (never more than one).
    pub fn active_timers(&self) -> usize {
        self.timer.active_count()
    }

    /// Take pending notifications. Hosts should drain after each command or
    /// tick; at most [`MAX_PENDING_EVENTS`] are kept, oldest dropped first.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    fn push_event(&mut self, event: SessionEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.remove(0);
        }
        self.events.push(event);
    }

    /// Whether the daily gate blocks starting on `today`.
    pub fn has_played(&self, today: &GameDate) -> bool {
        !self.config.debug && has_played_today(self.store.as_ref(), today)
    }

    /// Read-only results for a day that was already played.
    pub fn already_played_view(&self, today: &GameDate) -> Option<GameResults> {
        if !self.has_played(today) {
            return None;
        }
        self.previous
            .as_ref()
            .filter(|record| record.date == *today)
            .map(GameResults::from_record)
    }

    // === Dictionary ===

    /// Install a finished load if the background loader has one.
    pub fn poll_dictionary(&mut self) {
        let outcome = self.loader.as_ref().and_then(DictionaryLoader::poll);
        if let Some(outcome) = outcome {
            self.install_dictionary(outcome);
        }
    }

    /// Install a load outcome. A failure leaves an empty dictionary and warns
    /// once per session.
    pub fn install_dictionary(&mut self, outcome: LoadOutcome) {
        self.loader = None;
        match outcome {
            Ok(dictionary) => {
                log::info!("dictionary ready with {} words", dictionary.len());
                self.dictionary = dictionary;
            }
            Err(e) => {
                log::warn!("dictionary unavailable, nothing will validate: {}", e);
                self.dictionary = Dictionary::empty();
                self.warn_dictionary();
            }
        }
    }

    fn warn_dictionary(&mut self) {
        if self.dictionary_warned {
            return;
        }
        self.dictionary_warned = true;
        self.feedback = DICTIONARY_WARNING.to_string();
        self.push_event(SessionEvent::DictionaryWarning(DICTIONARY_WARNING.to_string()));
    }

    /// Wait (bounded) for a pending dictionary before trusting validation.
    fn settle_dictionary(&mut self) {
        if self.dictionary.is_ready() {
            return;
        }
        let outcome = self
            .loader
            .as_ref()
            .and_then(|loader| loader.wait(self.config.dictionary_wait));
        match outcome {
            Some(outcome) => self.install_dictionary(outcome),
            None => {
                log::warn!("dictionary still loading at end of round, treating as failed");
                self.loader = None;
                self.dictionary = Dictionary::empty();
                self.warn_dictionary();
            }
        }
    }

    // === Main round ===

    /// Start today's main round.
    pub fn start(&mut self, today: GameDate) -> Result<(), SessionError> {
        self.expect_phase(Phase::Idle, "start a round")?;
        if self.has_played(&today) {
            self.feedback = "Please come back tomorrow for a new puzzle!".to_string();
            return Err(SessionError::AlreadyPlayed { date: today });
        }

        self.reset();
        self.date = Some(today);
        self.grid = Some(Grid::for_date(&today));
        self.timer
            .start(TimerKind::MainRound, self.config.round_duration);
        self.phase = Phase::MainRound;
        self.poll_dictionary();

        log::info!(
            "main round started for {} ({}s)",
            today,
            self.config.round_duration
        );
        self.push_event(SessionEvent::RoundStarted { date: today });
        Ok(())
    }

    /// Select a grid cell (ignored unless it validly extends the path)
    pub fn select_cell(&mut self, cell: Cell) -> bool {
        if self.phase != Phase::MainRound {
            return false;
        }
        let selected = self.selection.try_push(cell);
        if selected {
            self.feedback.clear();
        }
        selected
    }

    /// Select the first cell holding `letter` that extends the path
    pub fn type_letter(&mut self, letter: char) -> bool {
        if self.phase != Phase::MainRound {
            return false;
        }
        let cell = self
            .grid
            .as_ref()
            .and_then(|grid| grid.find_extension(self.selection.cells(), letter));
        match cell {
            Some(cell) => self.select_cell(cell),
            None => false,
        }
    }

    /// Handle backspace (drops the last selected cell)
    pub fn backspace(&mut self) -> Option<Cell> {
        if self.phase != Phase::MainRound {
            return None;
        }
        self.feedback.clear();
        self.selection.pop()
    }

    pub fn clear_selection(&mut self) {
        if self.phase != Phase::MainRound {
            return;
        }
        self.selection.clear();
        self.feedback.clear();
    }

    /// Submit the traced word. The selection is cleared either way.
    /// Returns the points scored.
    pub fn submit_selection(&mut self) -> Result<usize, SessionError> {
        self.expect_phase(Phase::MainRound, "submit a word")?;
        self.poll_dictionary();

        let word = self.current_word();
        self.selection.clear();

        match self.ledger.submit(&word, &self.dictionary) {
            Ok(points) => {
                log::debug!("accepted {} (+{})", word, points);
                self.feedback = format!("OK +{} ({})", points, word);
                self.push_event(SessionEvent::WordAccepted {
                    word,
                    points,
                });
                Ok(points)
            }
            Err(error) => {
                log::debug!("refused {:?}: {}", word, error);
                self.feedback = error.message();
                self.push_event(SessionEvent::WordRejected {
                    error: error.clone(),
                });
                Err(error.into())
            }
        }
    }

    /// End the main round: freeze input, re-check every found word against
    /// the dictionary.
    pub fn end_main_round(&mut self) -> Result<(), SessionError> {
        self.expect_phase(Phase::MainRound, "end the main round")?;
        self.timer.cancel();
        self.selection.clear();

        let warned_before = self.dictionary_warned;
        self.settle_dictionary();
        let rejected = self.ledger.revalidate(&self.dictionary);
        self.words_found = self.ledger.total_found();

        self.phase = Phase::MainRoundEnded;
        self.feedback = if self.dictionary_warned && !warned_before {
            format!("TIME'S UP! {}", DICTIONARY_WARNING)
        } else {
            "TIME'S UP!".to_string()
        };
        log::info!(
            "main round over: {} words kept, {} moved to rejected",
            self.words_found,
            rejected.len()
        );
        self.push_event(SessionEvent::MainRoundEnded {
            found: self.words_found,
            rejected,
        });
        Ok(())
    }

    // === Bonus round ===

    /// Show the bonus rules and start the intro countdown. With no words to
    /// build puzzles from, go straight to results.
    pub fn begin_bonus_intro(&mut self) -> Result<(), SessionError> {
        self.expect_phase(Phase::MainRoundEnded, "begin the bonus round")?;
        if self.ledger.total_found() == 0 {
            self.push_event(SessionEvent::BonusExhausted("no words found".to_string()));
            self.finish();
            return Ok(());
        }

        self.phase = Phase::BonusIntro;
        self.timer
            .start(TimerKind::BonusIntro, self.config.intro_duration);
        self.feedback = match self.config.variant {
            BonusVariant::Unscramble => {
                "Round 2: Unscramble your words to keep your points!".to_string()
            }
            BonusVariant::Sentence => {
                format!(
                    "Bonus: pick the sentence that uses your word, +{} each!",
                    POINTS_PER_CORRECT
                )
            }
        };
        self.push_event(SessionEvent::BonusIntroStarted);
        Ok(())
    }

    /// Skip the rest of the intro countdown.
    pub fn confirm_bonus(&mut self) -> Result<(), SessionError> {
        self.expect_phase(Phase::BonusIntro, "confirm the bonus round")?;
        self.start_bonus();
        Ok(())
    }

    fn start_bonus(&mut self) {
        self.timer.cancel();
        self.phase = Phase::BonusActive;
        let words = self.ledger.found_words();

        match self.config.variant {
            BonusVariant::Unscramble => match UnscrambleRound::new(&words, &mut self.rng) {
                Ok(round) => {
                    self.bonus = BonusState::Unscramble(round);
                    self.timer
                        .start(TimerKind::Unscramble, self.config.bonus_duration);
                    self.push_event(SessionEvent::BonusStarted(BonusVariant::Unscramble));
                }
                Err(e) => {
                    self.push_event(SessionEvent::BonusExhausted(e.to_string()));
                    self.finish();
                }
            },
            BonusVariant::Sentence => {
                self.bonus = BonusState::Sentence(SentenceRound {
                    deck: SentenceDeck::new(words),
                    current: None,
                    presented: 0,
                    skipped: 0,
                    answers: Vec::new(),
                });
                self.push_event(SessionEvent::BonusStarted(BonusVariant::Sentence));
                self.next_sentence_puzzle();
            }
        }
    }

    /// Type a guess for a scrambled word. Returns whether it matched.
    pub fn submit_unscramble(&mut self, guess: &str) -> Result<bool, SessionError> {
        self.expect_phase(Phase::BonusActive, "unscramble")?;
        let BonusState::Unscramble(round) = &mut self.bonus else {
            return Err(SessionError::WrongPhase {
                action: "unscramble",
                phase: self.phase,
            });
        };

        if round.submit(guess).is_none() {
            self.feedback = "Not one of your scrambled words".to_string();
            return Ok(false);
        }

        let done = round.all_solved();
        self.feedback = "Correct! Word unscrambled!".to_string();
        if done {
            self.finish();
        }
        Ok(true)
    }

    /// Answer the current sentence puzzle. Returns whether it was correct.
    pub fn answer(&mut self, selected: usize) -> Result<bool, SessionError> {
        self.expect_phase(Phase::BonusActive, "answer")?;
        let elapsed = self.timer.active().map_or(0, Countdown::elapsed);
        let BonusState::Sentence(round) = &mut self.bonus else {
            return Err(SessionError::WrongPhase {
                action: "answer",
                phase: self.phase,
            });
        };
        let Some(puzzle) = round.current.as_ref() else {
            return Err(SessionError::WrongPhase {
                action: "answer",
                phase: self.phase,
            });
        };
        if selected >= puzzle.options.len() {
            return Err(SessionError::InvalidChoice(selected));
        }

        let correct = puzzle.is_correct(selected);
        round.answers.push(BonusAnswer {
            word: puzzle.word.clone(),
            options: puzzle.options.clone(),
            selected,
            correct,
            seconds_taken: elapsed,
        });
        round.current = None;

        if correct {
            self.bonus_score += POINTS_PER_CORRECT;
            self.feedback = format!("Correct! +{}", POINTS_PER_CORRECT);
        } else {
            self.feedback = "Not quite.".to_string();
        }
        self.timer.cancel();
        self.next_sentence_puzzle();
        Ok(correct)
    }

    fn next_sentence_puzzle(&mut self) {
        let BonusState::Sentence(round) = &mut self.bonus else {
            return;
        };
        if round.presented >= MAX_SENTENCE_PUZZLES {
            self.finish();
            return;
        }

        match round.deck.next_puzzle(&mut self.rng) {
            Ok(puzzle) => {
                round.current = Some(puzzle);
                round.presented += 1;
                self.timer
                    .start(TimerKind::SentencePuzzle, SENTENCE_SECONDS);
            }
            Err(e) => {
                log::info!("bonus round ends early: {}", e);
                self.push_event(SessionEvent::BonusExhausted(e.to_string()));
                self.finish();
            }
        }
    }

    fn skip_sentence_puzzle(&mut self) {
        if let BonusState::Sentence(round) = &mut self.bonus {
            if let Some(puzzle) = round.current.take() {
                round.skipped += 1;
                self.feedback = "Time's up for that one!".to_string();
                self.push_event(SessionEvent::PuzzleTimedOut { word: puzzle.word });
            }
        }
        self.next_sentence_puzzle();
    }

    // === Timers ===

    /// Advance one time unit. Returns the kind of countdown that expired.
    pub fn tick(&mut self) -> Option<TimerKind> {
        self.poll_dictionary();
        let expired = self.timer.tick()?;
        self.on_timer_expired(&expired);
        Some(expired.kind)
    }

    /// Expire the running countdown now.
    pub fn force_expire(&mut self) -> Option<TimerKind> {
        let expired = self.timer.force_expire()?;
        self.on_timer_expired(&expired);
        Some(expired.kind)
    }

    fn on_timer_expired(&mut self, countdown: &Countdown) {
        log::debug!("{:?} timer expired", countdown.kind);
        let result = match countdown.kind {
            TimerKind::MainRound => self.end_main_round(),
            TimerKind::BonusIntro => self.confirm_bonus(),
            TimerKind::Unscramble => {
                self.finish();
                Ok(())
            }
            TimerKind::SentencePuzzle => {
                self.skip_sentence_puzzle();
                Ok(())
            }
        };
        if let Err(e) = result {
            log::warn!("timer expiry ignored: {}", e);
        }
    }

    // === Results ===

    /// Close the bonus round, compute the final score and store the record.
    fn finish(&mut self) {
        self.timer.cancel();

        let mut answers = Vec::new();
        match &self.bonus {
            BonusState::Unscramble(round) => {
                let forfeited = self.ledger.forfeit_unsolved(&round.solved_words());
                log::info!("{} words forfeited in the unscramble round", forfeited);
            }
            BonusState::Sentence(round) => answers = round.answers.clone(),
            BonusState::NotStarted => {}
        }

        let results = GameResults {
            date: self.date,
            main_score: self.ledger.score(),
            bonus_score: self.bonus_score,
            words_found: self.words_found,
            words_kept: self.ledger.total_found(),
            rejected_count: self.ledger.rejected().len(),
            top_words: self.ledger.top_words(TOP_WORDS_SHOWN),
            rejected_sample: self.ledger.rejected_sample(&mut self.rng),
            answers,
            persisted: false,
        };

        self.results = Some(self.persist(results));
        self.phase = Phase::Results;

        let final_score = self.results.as_ref().map_or(0, GameResults::final_score);
        log::info!("results ready: {} points", final_score);
        self.push_event(SessionEvent::ResultsReady { final_score });
    }

    /// Write the daily record once. Failures are logged and reported, never retried.
    fn persist(&mut self, mut results: GameResults) -> GameResults {
        let Some(date) = self.date else {
            return results;
        };
        if self.config.debug {
            log::debug!("debug mode, not saving the daily record");
            return results;
        }

        let rejected: Vec<String> = self.ledger.rejected().iter().cloned().collect();
        let record = results.to_record(date, rejected);
        match record.save(self.store.as_mut()) {
            Ok(()) => {
                results.persisted = true;
                self.previous = Some(record);
            }
            Err(e) => {
                log::warn!("could not save daily record, daily gate not enforced: {}", e);
                self.push_event(SessionEvent::PersistFailed(e.to_string()));
            }
        }
        results
    }

    /// Return to `Idle` for another play. Only allowed in debug mode.
    pub fn play_again(&mut self) -> Result<(), SessionError> {
        self.expect_phase(Phase::Results, "play again")?;
        if !self.config.debug {
            let date = self.date.unwrap_or_else(GameDate::today);
            return Err(SessionError::AlreadyPlayed { date });
        }
        self.reset();
        self.phase = Phase::Idle;
        Ok(())
    }

    fn reset(&mut self) {
        self.timer.cancel();
        self.grid = None;
        self.date = None;
        self.selection.clear();
        self.ledger.clear();
        self.bonus = BonusState::NotStarted;
        self.bonus_score = 0;
        self.words_found = 0;
        self.results = None;
        self.feedback.clear();
    }

    fn expect_phase(&self, expected: Phase, action: &'static str) -> Result<(), SessionError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(SessionError::WrongPhase {
                action,
                phase: self.phase,
            })
        }
    }
}
