//! End-to-end plays of the daily puzzle through the public session API.
//!
//! The 2024-1-15 grid is
//!
//! ```text
//! Y E E W S
//! W O H N B
//! N E C O G
//! E L R I N
//! E S N E S
//! ```

use boggle_scramble::app::{BonusState, Phase, SessionError, SessionEvent, TimerKind};
use boggle_scramble::game::bonus::BonusVariant;
use boggle_scramble::game::dictionary::{Dictionary, DictionaryLoader};
use boggle_scramble::game::ledger::SubmitError;
use boggle_scramble::{Cell, GameDate, GameSession, Grid, MemoryStore, SessionConfig, SqliteStore};
use std::time::Duration;

const COG: [(usize, usize); 3] = [(2, 2), (2, 3), (2, 4)];
const ONE: [(usize, usize); 3] = [(1, 1), (2, 0), (2, 1)];
const HONE: [(usize, usize); 4] = [(1, 2), (1, 1), (2, 0), (2, 1)];

fn today() -> GameDate {
    GameDate::new(2024, 1, 15)
}

fn dictionary() -> Dictionary {
    Dictionary::parse("cog\none\nhone\nonce\nnose\n")
}

fn session(config: SessionConfig) -> GameSession {
    GameSession::new(config, Box::new(MemoryStore::new()))
        .with_dictionary(dictionary())
        .with_rng_seed(42)
}

fn trace(session: &mut GameSession, cells: &[(usize, usize)]) -> Result<usize, SessionError> {
    for &(row, col) in cells {
        assert!(session.select_cell(Cell::new(row, col)), "({row}, {col}) not selectable");
    }
    session.submit_selection()
}

#[test]
fn test_golden_grid_and_first_word() {
    let mut s = session(SessionConfig::default());
    s.start(today()).unwrap();

    let grid = s.grid().unwrap();
    assert_eq!(grid.rows(), vec!["YEEWS", "WOHNB", "NECOG", "ELRIN", "ESNES"]);
    assert_eq!(grid, &Grid::from_seed("2024-1-15"));

    assert_eq!(trace(&mut s, &COG), Ok(3));
    assert_eq!(s.ledger().found_words(), vec!["COG"]);
    assert_eq!(s.ledger().score(), 3);
}

#[test]
fn test_two_letters_too_short() {
    let mut s = session(SessionConfig::default());
    s.start(today()).unwrap();

    assert_eq!(
        trace(&mut s, &COG[..2]),
        Err(SessionError::Submit(SubmitError::TooShort { length: 2 }))
    );
    assert_eq!(s.ledger().total_found(), 0);
    assert_eq!(s.ledger().score(), 0);
}

#[test]
fn test_duplicate_word() {
    let mut s = session(SessionConfig::default());
    s.start(today()).unwrap();

    trace(&mut s, &COG).unwrap();
    assert_eq!(
        trace(&mut s, &COG),
        Err(SessionError::Submit(SubmitError::Duplicate {
            word: "COG".to_string()
        }))
    );
    assert_eq!(s.ledger().found_words(), vec!["COG"]);
    assert_eq!(s.feedback, "Already found COG");
}

#[test]
fn test_missing_dictionary_rejects_everything_and_warns_once() {
    let dir = tempfile::tempdir().unwrap();
    let loader = DictionaryLoader::spawn(dir.path().join("missing.txt"));
    let outcome = loader.wait(Duration::from_secs(5)).unwrap();
    assert!(outcome.is_err());

    let mut s = GameSession::new(SessionConfig::default(), Box::new(MemoryStore::new()));
    s.install_dictionary(outcome);
    s.start(today()).unwrap();

    for word in [&COG[..], &ONE[..], &HONE[..]] {
        assert!(matches!(
            trace(&mut s, word),
            Err(SessionError::Submit(SubmitError::NotInDictionary { .. }))
        ));
    }
    s.end_main_round().unwrap();

    let warnings = s
        .drain_events()
        .iter()
        .filter(|e| matches!(e, SessionEvent::DictionaryWarning(_)))
        .count();
    assert_eq!(warnings, 1);
    assert_eq!(s.ledger().rejected().len(), 3);
}

#[test]
fn test_sentence_round_timeouts_keep_main_score() {
    let mut s = session(
        SessionConfig::default()
            .with_round_duration(3)
            .with_variant(BonusVariant::Sentence),
    );
    s.start(today()).unwrap();
    trace(&mut s, &COG).unwrap();
    trace(&mut s, &ONE).unwrap();

    // Main round runs out on the third tick
    assert_eq!(s.tick(), None);
    assert_eq!(s.tick(), None);
    assert_eq!(s.tick(), Some(TimerKind::MainRound));
    assert_eq!(s.phase(), Phase::MainRoundEnded);

    s.begin_bonus_intro().unwrap();
    s.confirm_bonus().unwrap();
    assert!(matches!(s.bonus(), BonusState::Sentence(_)));

    // Let every puzzle run out
    let mut timeouts = 0;
    while s.phase() == Phase::BonusActive {
        assert_eq!(s.active_timers(), 1);
        assert_eq!(s.force_expire(), Some(TimerKind::SentencePuzzle));
        timeouts += 1;
    }
    assert_eq!(timeouts, 2);

    let results = s.results().unwrap();
    assert_eq!(s.phase(), Phase::Results);
    assert_eq!(results.main_score, 6);
    assert_eq!(results.bonus_score, 0);
    assert_eq!(results.final_score(), 6);
    assert!(results.answers.is_empty());
}

#[test]
fn test_no_words_goes_straight_to_results() {
    let mut s = session(SessionConfig::default().with_variant(BonusVariant::Sentence));
    s.start(today()).unwrap();
    s.force_expire();
    s.begin_bonus_intro().unwrap();

    assert_eq!(s.phase(), Phase::Results);
    let results = s.results().unwrap();
    assert_eq!(results.final_score(), 0);
    assert_eq!(results.top_words, Vec::<String>::new());
}

#[test]
fn test_unscramble_round_forfeits_unsolved_words() {
    let mut s = session(SessionConfig::default().with_bonus_duration(30));
    s.start(today()).unwrap();
    trace(&mut s, &COG).unwrap();
    trace(&mut s, &HONE).unwrap();
    s.end_main_round().unwrap();
    s.begin_bonus_intro().unwrap();

    // Intro counts down on its own
    while s.phase() == Phase::BonusIntro {
        s.tick();
    }
    assert_eq!(s.time_remaining(), 30);

    assert_eq!(s.submit_unscramble("hone"), Ok(true));
    s.force_expire();

    let results = s.results().unwrap();
    assert_eq!(results.words_found, 2);
    assert_eq!(results.words_kept, 1);
    assert_eq!(results.final_score(), 4);
    assert_eq!(results.top_words, vec!["HONE"]);
}

#[test]
fn test_results_persist_across_sessions() {
    let dir = tempfile::tempdir().unwrap();

    let store = SqliteStore::open_in(dir.path()).unwrap();
    let mut s = GameSession::new(
        SessionConfig::default().with_variant(BonusVariant::Sentence),
        Box::new(store),
    )
    .with_dictionary(dictionary());
    s.start(today()).unwrap();
    trace(&mut s, &HONE).unwrap();
    // O-N-C-E through the right-hand O
    trace(&mut s, &[(2, 3), (1, 3), (2, 2), (2, 1)]).unwrap();
    s.end_main_round().unwrap();
    s.begin_bonus_intro().unwrap();
    s.confirm_bonus().unwrap();
    while s.phase() == Phase::BonusActive {
        s.answer(0).unwrap();
    }
    let played = s.results().unwrap().clone();
    assert!(played.persisted);
    drop(s);

    let store = SqliteStore::open_in(dir.path()).unwrap();
    let mut again = GameSession::new(SessionConfig::default(), Box::new(store));
    assert!(again.has_played(&today()));
    assert_eq!(
        again.start(today()),
        Err(SessionError::AlreadyPlayed { date: today() })
    );

    let view = again.already_played_view(&today()).unwrap();
    assert_eq!(view.final_score(), played.final_score());
    assert_eq!(view.top_words, vec!["HONE", "ONCE"]);

    // Tomorrow is a new puzzle
    let tomorrow = GameDate::new(2024, 1, 16);
    assert!(again.start(tomorrow).is_ok());
    assert_ne!(again.grid(), Some(&Grid::for_date(&today())));
}
