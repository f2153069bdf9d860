//! Bonus round puzzles built from the player's found words
//!
//! Two variants:
//! - Unscramble: every found word is shown scrambled; retype it to keep it.
//! - Sentence: pick which of three sentences contains one of your words.
//!
//! Everything here uses a caller-supplied, non-seeded RNG so bonus content
//! varies between plays of the same day.

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use std::collections::HashSet;

/// Scramble attempts before falling back to a rotation
const MAX_SCRAMBLE_ATTEMPTS: usize = 32;

/// Most sentence puzzles offered in one bonus round
pub const MAX_SENTENCE_PUZZLES: usize = 5;

/// Seconds on the clock for each sentence puzzle
pub const SENTENCE_SECONDS: u32 = 10;

/// Points for each correctly answered sentence puzzle
pub const POINTS_PER_CORRECT: usize = 10;

const DISTRACTORS_PER_PUZZLE: usize = 2;

/// Sentence templates; `{word}` is replaced with the lower-cased word.
const TEMPLATES: [&str; 8] = [
    "Nobody expected to find a {word} hidden in the attic.",
    "The coach wrote {word} on the board in bright chalk.",
    "She whispered the word {word} and the room fell silent.",
    "Every morning the old sailor muttered something about {word}.",
    "The crossword's final answer turned out to be {word}.",
    "He spelled {word} backwards just to prove he could.",
    "A sign by the road simply read: {word}.",
    "The parrot kept repeating {word} until dinner time.",
];

/// Sentences that contain none of the player's words.
const DISTRACTORS: [&str; 10] = [
    "The lighthouse keeper counted waves until sunrise.",
    "A marching band rehearsed behind the library.",
    "Thunder rolled over the quiet harbor all night.",
    "The baker forgot to switch on the oven again.",
    "Two squirrels argued loudly over a single acorn.",
    "Her umbrella flipped inside out in the wind.",
    "The museum closed early for a private gala.",
    "A paper kite tangled itself in the telephone wires.",
    "The train whistled twice before leaving the station.",
    "Fresh snow covered the mountain pass by noon.",
];

/// Which bonus round follows the main round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum BonusVariant {
    /// Retype each found word from a scrambled form to keep it
    #[default]
    Unscramble,
    /// Pick the sentence containing one of your words, five times
    Sentence,
}

/// The bonus round could not produce another puzzle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BonusError {
    #[error("bonus puzzles exhausted: {0}")]
    Exhausted(&'static str),
}

/// Shuffle the letters of `word` so the result differs from the input.
///
/// A word of one repeated letter has no other arrangement and is returned
/// unchanged. If random shuffles keep reproducing the input, the word is
/// rotated left by one, which always differs when two letters differ.
pub fn scramble_word<R: Rng + ?Sized>(word: &str, rng: &mut R) -> String {
    let letters: Vec<char> = word.chars().collect();
    let Some(first) = letters.first() else {
        return String::new();
    };
    if letters.iter().all(|c| c == first) {
        return word.to_string();
    }

    let mut shuffled = letters.clone();
    for _ in 0..MAX_SCRAMBLE_ATTEMPTS {
        shuffled.shuffle(rng);
        if shuffled != letters {
            return shuffled.into_iter().collect();
        }
    }

    let mut rotated = letters;
    rotated.rotate_left(1);
    rotated.into_iter().collect()
}

/// One bonus entry derived from a found word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BonusItem {
    /// The word as found in the main round
    pub original: String,
    /// The form shown to the player
    pub scrambled: String,
    /// Whether the item has been answered
    pub solved: bool,
    /// Whether the answer was right
    pub correct: bool,
}

/// State of an unscramble bonus round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnscrambleRound {
    items: Vec<BonusItem>,
}

impl UnscrambleRound {
    /// Scramble every word. Fails when there is nothing to scramble.
    pub fn new<R: Rng + ?Sized>(words: &[String], rng: &mut R) -> Result<Self, BonusError> {
        if words.is_empty() {
            return Err(BonusError::Exhausted("no words to scramble"));
        }
        let items = words
            .iter()
            .map(|word| BonusItem {
                original: word.clone(),
                scrambled: scramble_word(word, rng),
                solved: false,
                correct: false,
            })
            .collect();
        Ok(Self { items })
    }

    /// Mark the first unsolved item whose original matches `guess`.
    /// Returns the matched word.
    pub fn submit(&mut self, guess: &str) -> Option<&BonusItem> {
        let guess = guess.trim().to_uppercase();
        let item = self
            .items
            .iter_mut()
            .find(|item| !item.solved && item.original == guess)?;
        item.solved = true;
        item.correct = true;
        Some(&*item)
    }

    pub fn items(&self) -> &[BonusItem] {
        &self.items
    }

    /// Items still waiting to be unscrambled.
    pub fn unsolved(&self) -> impl Iterator<Item = &BonusItem> {
        self.items.iter().filter(|item| !item.solved)
    }

    pub fn all_solved(&self) -> bool {
        self.items.iter().all(|item| item.solved)
    }

    pub fn solved_words(&self) -> HashSet<String> {
        self.items
            .iter()
            .filter(|item| item.correct)
            .map(|item| item.original.clone())
            .collect()
    }
}

/// A multiple-choice sentence puzzle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentencePuzzle {
    pub word: String,
    pub options: Vec<String>,
    pub correct_index: usize,
}

impl SentencePuzzle {
    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.correct_index
    }
}

/// A recorded sentence answer. Timed-out puzzles are not recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BonusAnswer {
    pub word: String,
    pub options: Vec<String>,
    pub selected: usize,
    pub correct: bool,
    pub seconds_taken: u32,
}

/// Draws sentence puzzles without replacement from the found words and the
/// distractor pool.
#[derive(Debug, Clone)]
pub struct SentenceDeck {
    words: Vec<String>,
    distractors: Vec<&'static str>,
}

impl SentenceDeck {
    pub fn new(words: Vec<String>) -> Self {
        Self {
            words,
            distractors: DISTRACTORS.to_vec(),
        }
    }

    pub fn remaining_words(&self) -> usize {
        self.words.len()
    }

    pub fn remaining_distractors(&self) -> usize {
        self.distractors.len()
    }

    /// Build the next puzzle, or fail when words or distractors run out.
    pub fn next_puzzle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<SentencePuzzle, BonusError> {
        if self.words.is_empty() {
            return Err(BonusError::Exhausted("no words left"));
        }
        if self.distractors.len() < DISTRACTORS_PER_PUZZLE {
            return Err(BonusError::Exhausted("not enough distractor sentences"));
        }

        let word = self.words.swap_remove(rng.random_range(0..self.words.len()));
        let template = TEMPLATES
            .choose(rng)
            .ok_or(BonusError::Exhausted("no sentence templates"))?;
        let correct = template.replace("{word}", &word.to_lowercase());

        let mut options = vec![correct.clone()];
        for _ in 0..DISTRACTORS_PER_PUZZLE {
            let pick = rng.random_range(0..self.distractors.len());
            options.push(self.distractors.swap_remove(pick).to_string());
        }
        options.shuffle(rng);

        let correct_index = options
            .iter()
            .position(|option| *option == correct)
            .ok_or(BonusError::Exhausted("correct sentence lost in shuffle"))?;

        Ok(SentencePuzzle {
            word,
            options,
            correct_index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_scramble_differs() {
        let mut rng = rng();
        for word in ["CAT", "DOG", "HORSE", "AAB", "ABAB", "TREES"] {
            for _ in 0..50 {
                let scrambled = scramble_word(word, &mut rng);
                assert_ne!(scrambled, word);
                let mut a: Vec<char> = scrambled.chars().collect();
                let mut b: Vec<char> = word.chars().collect();
                a.sort_unstable();
                b.sort_unstable();
                assert_eq!(a, b, "{} is not a permutation of {}", scrambled, word);
            }
        }
    }

    #[test]
    fn test_scramble_single_letter_word_terminates() {
        assert_eq!(scramble_word("EEE", &mut rng()), "EEE");
        assert_eq!(scramble_word("", &mut rng()), "");
    }

    #[test]
    fn test_unscramble_round() {
        let mut round = UnscrambleRound::new(&words(&["CAT", "DOG"]), &mut rng()).unwrap();
        assert_eq!(round.unsolved().count(), 2);

        assert!(round.submit("bird").is_none());
        assert_eq!(round.submit("cat").map(|i| i.original.as_str()), Some("CAT"));
        assert!(round.submit("CAT").is_none());
        assert!(!round.all_solved());

        round.submit("DOG");
        assert!(round.all_solved());
        assert_eq!(round.solved_words().len(), 2);
    }

    #[test]
    fn test_unscramble_needs_words() {
        assert!(UnscrambleRound::new(&[], &mut rng()).is_err());
    }

    #[test]
    fn test_sentence_puzzle_shape() {
        let mut deck = SentenceDeck::new(words(&["CAT"]));
        let puzzle = deck.next_puzzle(&mut rng()).unwrap();

        assert_eq!(puzzle.word, "CAT");
        assert_eq!(puzzle.options.len(), 3);
        assert!(puzzle.options[puzzle.correct_index].contains("cat"));
        let distractors: Vec<_> = puzzle
            .options
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != puzzle.correct_index)
            .map(|(_, o)| o)
            .collect();
        assert_eq!(distractors.len(), 2);
        assert_ne!(distractors[0], distractors[1]);
        assert!(distractors.iter().all(|o| DISTRACTORS.contains(&o.as_str())));
    }

    #[test]
    fn test_sentence_deck_exhausts_words() {
        let mut rng = rng();
        let mut deck = SentenceDeck::new(words(&["CAT", "DOG"]));
        let first = deck.next_puzzle(&mut rng).unwrap();
        let second = deck.next_puzzle(&mut rng).unwrap();
        assert_ne!(first.word, second.word);
        assert!(matches!(
            deck.next_puzzle(&mut rng),
            Err(BonusError::Exhausted(_))
        ));
    }

    #[test]
    fn test_sentence_deck_exhausts_distractors() {
        let mut rng = rng();
        let many: Vec<String> = (0..20).map(|i| format!("WORD{}", i)).collect();
        let mut deck = SentenceDeck::new(many);
        for _ in 0..DISTRACTORS.len() / DISTRACTORS_PER_PUZZLE {
            deck.next_puzzle(&mut rng).unwrap();
        }
        assert_eq!(deck.remaining_distractors(), 0);
        assert!(deck.next_puzzle(&mut rng).is_err());
    }

    #[test]
    fn test_empty_deck_fails() {
        assert!(SentenceDeck::new(Vec::new()).next_puzzle(&mut rng()).is_err());
    }

    proptest! {
        #[test]
        fn prop_scramble_never_returns_input(word in "[A-Z]{3,10}", seed in any::<u64>()) {
            let distinct: HashSet<char> = word.chars().collect();
            let mut rng = StdRng::seed_from_u64(seed);
            let scrambled = scramble_word(&word, &mut rng);
            if distinct.len() >= 2 {
                prop_assert_ne!(scrambled, word);
            } else {
                prop_assert_eq!(scrambled, word);
            }
        }
    }
}
