//! Dictionary module for word validation
//!
//! The word list is a newline-separated text file read at session start.
//! Lookups are case-insensitive: entries are trimmed and upper-cased on load.
//! Loading happens on a background thread so the grid can be shown
//! immediately; until it finishes the dictionary is "pending".

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

/// Errors that can occur while loading the word list.
#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("failed to read word list {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("dictionary loader stopped before delivering a word list")]
    LoaderDisconnected,
}

/// Set of valid words.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    words: HashSet<String>,
    ready: bool,
}

impl Dictionary {
    /// A dictionary that has not finished loading yet.
    pub fn pending() -> Self {
        Self::default()
    }

    /// A loaded but empty dictionary: nothing validates.
    pub fn empty() -> Self {
        Self {
            words: HashSet::new(),
            ready: true,
        }
    }

    /// Parse newline-separated words.
    pub fn parse(text: &str) -> Self {
        Self::from_words(text.lines())
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_uppercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words, ready: true }
    }

    /// Read a word list from disk.
    pub fn load(path: &Path) -> Result<Self, DictionaryError> {
        let text = std::fs::read_to_string(path).map_err(|source| DictionaryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    /// Check if a word is in the dictionary (case-insensitive).
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.trim().to_uppercase())
    }

    /// Whether a word list has been installed (possibly empty after a failure).
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Outcome delivered by a [`DictionaryLoader`].
pub type LoadOutcome = Result<Dictionary, DictionaryError>;

/// Loads a dictionary off the main thread and hands it over through a channel.
pub struct DictionaryLoader {
    rx: Receiver<LoadOutcome>,
}

impl DictionaryLoader {
    /// Start reading `path` on a background thread.
    pub fn spawn(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (tx, loader) = Self::channel();
        thread::spawn(move || {
            let outcome = Dictionary::load(&path);
            if let Ok(dictionary) = &outcome {
                log::info!("loaded {} words from {}", dictionary.len(), path.display());
            }
            let _ = tx.send(outcome);
        });
        loader
    }

    /// A loader fed by hand through the returned sender.
    pub fn channel() -> (Sender<LoadOutcome>, Self) {
        let (tx, rx) = channel();
        (tx, Self { rx })
    }

    /// Non-blocking check for a finished load.
    pub fn poll(&self) -> Option<LoadOutcome> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(DictionaryError::LoaderDisconnected)),
        }
    }

    /// Block for at most `timeout` waiting for the load to finish.
    pub fn wait(&self, timeout: Duration) -> Option<LoadOutcome> {
        match self.rx.recv_timeout(timeout) {
            Ok(outcome) => Some(outcome),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(Err(DictionaryError::LoaderDisconnected)),
        }
    }
}
