//! Word bookkeeping for a round
//!
//! Found words are bucketed by length. Words the dictionary rejects are kept
//! in a separate set so the results screen can show one of them. Words lost
//! in the unscramble bonus round are kept apart again as "forfeited".

use super::dictionary::Dictionary;
use rand::seq::IteratorRandom;
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Minimum word length for valid submissions
pub const MIN_WORD_LENGTH: usize = 3;

/// Why a submission was refused
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("too short: {length} letters")]
    TooShort { length: usize },
    #[error("{word} already found")]
    Duplicate { word: String },
    #[error("{word} is not in the dictionary")]
    NotInDictionary { word: String },
}

impl SubmitError {
    /// Short feedback line for the player
    pub fn message(&self) -> String {
        match self {
            SubmitError::TooShort { .. } => {
                format!("Words must be at least {} letters long!", MIN_WORD_LENGTH)
            }
            SubmitError::Duplicate { word } => format!("Already found {}", word),
            SubmitError::NotInDictionary { word } => format!("NOPE: {}", word),
        }
    }
}

/// Found, rejected, and forfeited words for one play.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordLedger {
    found: BTreeMap<usize, BTreeSet<String>>,
    rejected: BTreeSet<String>,
    forfeited: BTreeSet<String>,
}

impl WordLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a submitted word.
    ///
    /// Checks in order:
    /// 1. Length >= 3
    /// 2. Not already found
    /// 3. In the dictionary (skipped while the dictionary is still loading;
    ///    those words are re-checked by [`WordLedger::revalidate`])
    ///
    /// Returns the points the word is worth.
    pub fn submit(&mut self, word: &str, dictionary: &Dictionary) -> Result<usize, SubmitError> {
        let word = word.trim().to_uppercase();
        let length = word.chars().count();

        if length < MIN_WORD_LENGTH {
            return Err(SubmitError::TooShort { length });
        }

        if self.contains(&word) {
            return Err(SubmitError::Duplicate { word });
        }

        if dictionary.is_ready() && !dictionary.contains(&word) {
            self.rejected.insert(word.clone());
            return Err(SubmitError::NotInDictionary { word });
        }

        self.rejected.remove(&word);
        self.found.entry(length).or_default().insert(word);
        Ok(length)
    }

    /// Whether `word` is currently among the found words.
    pub fn contains(&self, word: &str) -> bool {
        let word = word.to_uppercase();
        self.found
            .get(&word.chars().count())
            .is_some_and(|bucket| bucket.contains(&word))
    }

    /// Sum of the lengths of all found words.
    pub fn score(&self) -> usize {
        self.found
            .iter()
            .map(|(length, bucket)| length * bucket.len())
            .sum()
    }

    pub fn total_found(&self) -> usize {
        self.found.values().map(BTreeSet::len).sum()
    }

    /// Found words, longest first, ties alphabetical, at most `n`.
    pub fn top_words(&self, n: usize) -> Vec<String> {
        self.found
            .values()
            .rev()
            .flat_map(|bucket| bucket.iter().cloned())
            .take(n)
            .collect()
    }

    /// All found words in the same order as [`WordLedger::top_words`].
    pub fn found_words(&self) -> Vec<String> {
        self.top_words(usize::MAX)
    }

    /// Buckets of found words, longest length first.
    pub fn words_by_length(&self) -> impl Iterator<Item = (usize, &BTreeSet<String>)> {
        self.found
            .iter()
            .rev()
            .filter(|(_, bucket)| !bucket.is_empty())
            .map(|(length, bucket)| (*length, bucket))
    }

    pub fn rejected(&self) -> &BTreeSet<String> {
        &self.rejected
    }

    pub fn forfeited(&self) -> &BTreeSet<String> {
        &self.forfeited
    }

    /// One rejected word picked at random, for the results screen.
    pub fn rejected_sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<String> {
        self.rejected.iter().choose(rng).cloned()
    }

    /// Re-check every found word against a (now loaded) dictionary, moving
    /// misses to the rejected set. Returns the words that moved.
    pub fn revalidate(&mut self, dictionary: &Dictionary) -> Vec<String> {
        let mut moved = Vec::new();
        for bucket in self.found.values_mut() {
            let misses: Vec<String> = bucket
                .iter()
                .filter(|word| !dictionary.contains(word))
                .cloned()
                .collect();
            for word in misses {
                bucket.remove(&word);
                moved.push(word);
            }
        }
        self.found.retain(|_, bucket| !bucket.is_empty());
        self.rejected.extend(moved.iter().cloned());
        moved
    }

    /// Keep only the `solved` words; everything else found is forfeited.
    /// Returns the number of words forfeited.
    pub fn forfeit_unsolved(&mut self, solved: &HashSet<String>) -> usize {
        let mut count = 0;
        for bucket in self.found.values_mut() {
            let lost: Vec<String> = bucket
                .iter()
                .filter(|word| !solved.contains(*word))
                .cloned()
                .collect();
            for word in lost {
                bucket.remove(&word);
                self.forfeited.insert(word);
                count += 1;
            }
        }
        self.found.retain(|_, bucket| !bucket.is_empty());
        count
    }

    pub fn clear(&mut self) {
        self.found.clear();
        self.rejected.clear();
        self.forfeited.clear();
    }
}
