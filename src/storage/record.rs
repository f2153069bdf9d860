//! The once-per-day play record

use super::{SaveStore, StorageError};
use crate::game::GameDate;
use std::time::Duration;

/// Stored records expire after two days.
pub const RECORD_TTL: Duration = Duration::from_secs(2 * 24 * 60 * 60);

const KEY_LAST_PLAYED: &str = "lastPlayed";
const KEY_LAST_SCORE: &str = "lastScore";
const KEY_LAST_WORDS: &str = "lastWords";
const KEY_LAST_REJECTED: &str = "lastRejected";
const KEY_LAST_BONUS: &str = "lastBonusScore";
const KEY_WORDS_KEPT: &str = "wordsKept";
const KEY_WORDS_FOUND: &str = "wordsFound";

/// Outcome of a completed day's play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyRecord {
    pub date: GameDate,
    pub score: usize,
    pub words_found: usize,
    pub words_kept: usize,
    pub top_words: Vec<String>,
    pub rejected_words: Vec<String>,
    pub bonus_score: usize,
}

impl DailyRecord {
    /// Read the last record. `None` when nothing (unexpired) was stored or
    /// the stored date is unreadable.
    pub fn load(store: &dyn SaveStore) -> Result<Option<Self>, StorageError> {
        let Some(date) = store
            .get(KEY_LAST_PLAYED)?
            .and_then(|raw| raw.parse::<GameDate>().ok())
        else {
            return Ok(None);
        };

        let words_kept = read_number(store, KEY_WORDS_KEPT)?;
        // Records written before the found count was kept report kept words
        let words_found = store
            .get(KEY_WORDS_FOUND)?
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(words_kept);

        Ok(Some(DailyRecord {
            date,
            score: read_number(store, KEY_LAST_SCORE)?,
            words_found,
            words_kept,
            top_words: read_list(store, KEY_LAST_WORDS)?,
            rejected_words: read_list(store, KEY_LAST_REJECTED)?,
            bonus_score: read_number(store, KEY_LAST_BONUS)?,
        }))
    }

    /// Write every field with the standard expiry.
    pub fn save(&self, store: &mut dyn SaveStore) -> Result<(), StorageError> {
        store.set(KEY_LAST_SCORE, &self.score.to_string(), RECORD_TTL)?;
        store.set(KEY_WORDS_FOUND, &self.words_found.to_string(), RECORD_TTL)?;
        store.set(KEY_WORDS_KEPT, &self.words_kept.to_string(), RECORD_TTL)?;
        store.set(KEY_LAST_WORDS, &write_list(KEY_LAST_WORDS, &self.top_words)?, RECORD_TTL)?;
        store.set(
            KEY_LAST_REJECTED,
            &write_list(KEY_LAST_REJECTED, &self.rejected_words)?,
            RECORD_TTL,
        )?;
        store.set(KEY_LAST_BONUS, &self.bonus_score.to_string(), RECORD_TTL)?;
        // Date last, so a partial write never closes the daily gate
        store.set(KEY_LAST_PLAYED, &self.date.seed_key(), RECORD_TTL)?;
        Ok(())
    }

    /// Remove every key of the record.
    pub fn clear(store: &mut dyn SaveStore) -> Result<(), StorageError> {
        for key in [
            KEY_LAST_PLAYED,
            KEY_LAST_SCORE,
            KEY_LAST_WORDS,
            KEY_LAST_REJECTED,
            KEY_LAST_BONUS,
            KEY_WORDS_FOUND,
            KEY_WORDS_KEPT,
        ] {
            store.clear(key)?;
        }
        Ok(())
    }
}

/// Whether the store says `today` has already been played. A store that
/// cannot be read counts as "not played".
pub fn has_played_today(store: &dyn SaveStore, today: &GameDate) -> bool {
    match store.get(KEY_LAST_PLAYED) {
        Ok(last) => last.as_deref() == Some(today.seed_key().as_str()),
        Err(e) => {
            log::warn!("could not read daily gate, allowing play: {}", e);
            false
        }
    }
}

fn read_number(store: &dyn SaveStore, key: &str) -> Result<usize, StorageError> {
    Ok(store
        .get(key)?
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(0))
}

/// A list that fails to parse reads as empty so the rest of the record survives.
fn read_list(store: &dyn SaveStore, key: &str) -> Result<Vec<String>, StorageError> {
    let Some(raw) = store.get(key)? else {
        return Ok(Vec::new());
    };
    match serde_json::from_str(&raw) {
        Ok(words) => Ok(words),
        Err(e) => {
            log::warn!("ignoring malformed {}: {}", key, e);
            Ok(Vec::new())
        }
    }
}

fn write_list(key: &str, words: &[String]) -> Result<String, StorageError> {
    serde_json::to_string(words).map_err(|source| StorageError::Malformed {
        key: key.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, SqliteStore};

    fn record() -> DailyRecord {
        DailyRecord {
            date: GameDate::new(2024, 1, 15),
            score: 16,
            words_found: 5,
            words_kept: 4,
            top_words: vec!["HONE".to_string(), "ONCE".to_string()],
            rejected_words: vec!["WOHN".to_string()],
            bonus_score: 10,
        }
    }

    #[test]
    fn test_save_then_load() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        record().save(&mut store).unwrap();
        assert_eq!(DailyRecord::load(&store).unwrap(), Some(record()));
    }

    #[test]
    fn test_lists_are_json_arrays() {
        let mut store = MemoryStore::new();
        record().save(&mut store).unwrap();
        assert_eq!(
            store.get("lastWords").unwrap().as_deref(),
            Some(r#"["HONE","ONCE"]"#)
        );
        assert_eq!(store.get("lastPlayed").unwrap().as_deref(), Some("2024-1-15"));
    }

    #[test]
    fn test_load_empty_store() {
        let store = MemoryStore::new();
        assert_eq!(DailyRecord::load(&store).unwrap(), None);
    }

    #[test]
    fn test_malformed_list_keeps_other_fields() {
        let mut store = MemoryStore::new();
        record().save(&mut store).unwrap();
        store.set("lastWords", "not json", RECORD_TTL).unwrap();

        let loaded = DailyRecord::load(&store).unwrap().unwrap();
        assert_eq!(loaded.score, 16);
        assert_eq!(loaded.words_kept, 4);
        assert!(loaded.top_words.is_empty());
        assert_eq!(loaded.rejected_words, vec!["WOHN"]);
    }

    #[test]
    fn test_missing_found_count_falls_back_to_kept() {
        let mut store = MemoryStore::new();
        record().save(&mut store).unwrap();
        assert_eq!(store.get("wordsFound").unwrap().as_deref(), Some("5"));

        store.clear("wordsFound").unwrap();
        let loaded = DailyRecord::load(&store).unwrap().unwrap();
        assert_eq!(loaded.words_found, 4);
    }

    #[test]
    fn test_daily_gate() {
        let mut store = MemoryStore::new();
        let today = GameDate::new(2024, 1, 15);
        assert!(!has_played_today(&store, &today));

        record().save(&mut store).unwrap();
        assert!(has_played_today(&store, &today));
        assert!(!has_played_today(&store, &GameDate::new(2024, 1, 16)));

        DailyRecord::clear(&mut store).unwrap();
        assert!(!has_played_today(&store, &today));
    }
}
