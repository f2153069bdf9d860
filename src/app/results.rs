//! End-of-day results and the sharable summary

use crate::game::bonus::BonusAnswer;
use crate::game::GameDate;
use crate::storage::DailyRecord;
use chrono::{Duration as ChronoDuration, NaiveDateTime, NaiveTime};
use std::time::Duration;

/// Number of top words shown and stored
pub const TOP_WORDS_SHOWN: usize = 5;

/// Final outcome of a play, exposed in the results phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameResults {
    pub date: Option<GameDate>,
    /// Score of the words kept after all rounds
    pub main_score: usize,
    pub bonus_score: usize,
    /// Words accepted in the main round after the dictionary re-check
    pub words_found: usize,
    /// Words still counted at the end
    pub words_kept: usize,
    pub rejected_count: usize,
    pub top_words: Vec<String>,
    pub rejected_sample: Option<String>,
    /// Sentence answers in the order given
    pub answers: Vec<BonusAnswer>,
    /// Whether the daily record was written
    pub persisted: bool,
}

impl GameResults {
    pub fn final_score(&self) -> usize {
        self.main_score + self.bonus_score
    }

    /// Rebuild a read-only view from a stored record.
    pub fn from_record(record: &DailyRecord) -> Self {
        GameResults {
            date: Some(record.date),
            main_score: record.score.saturating_sub(record.bonus_score),
            bonus_score: record.bonus_score,
            words_found: record.words_found,
            words_kept: record.words_kept,
            rejected_count: record.rejected_words.len(),
            top_words: record.top_words.clone(),
            rejected_sample: record.rejected_words.first().cloned(),
            answers: Vec::new(),
            persisted: true,
        }
    }

    /// The record persisted for this result.
    pub fn to_record(&self, date: GameDate, rejected_words: Vec<String>) -> DailyRecord {
        DailyRecord {
            date,
            score: self.final_score(),
            words_found: self.words_found,
            words_kept: self.words_kept,
            top_words: self.top_words.clone(),
            rejected_words,
            bonus_score: self.bonus_score,
        }
    }

    /// Correct sentence answers, for display.
    pub fn correct_answers(&self) -> usize {
        self.answers.iter().filter(|a| a.correct).count()
    }
}

/// Plain-text summary suitable for pasting anywhere.
pub fn share_text(results: &GameResults) -> String {
    let mut text = String::from("🎲 Boggle Scramble Results 🏃\n");
    if let Some(date) = results.date {
        text.push_str(&format!("for {}\n", date));
    }
    text.push_str(&format!("Score: {} points\n", results.final_score()));
    text.push_str(&format!("Words Found 💵: {}\n", results.words_found));
    text.push_str(&format!("Words Kept 💸: {}\n", results.words_kept));
    text.push_str(&format!("Words Rejected 🚫: {}\n", results.rejected_count));
    if let Some(word) = &results.rejected_sample {
        text.push_str(&format!("Not a word ❌: {}\n", word));
    }
    text.push_str(&format!("Bonus: {} points\n", results.bonus_score));
    text.push_str("\nTop Words 💰:\n");
    if results.top_words.is_empty() {
        text.push_str("No words found");
    } else {
        let lines: Vec<String> = results
            .top_words
            .iter()
            .map(|w| format!("• {} ({} letters)", w, w.chars().count()))
            .collect();
        text.push_str(&lines.join("\n"));
    }
    text
}

/// Time from `now` until the next local midnight, when a new grid appears.
pub fn time_until_next_puzzle(now: NaiveDateTime) -> Duration {
    let midnight = (now.date() + ChronoDuration::days(1)).and_time(NaiveTime::MIN);
    (midnight - now).to_std().unwrap_or(Duration::ZERO)
}

/// `Next puzzle available in: {h}h {m}m`
pub fn format_next_puzzle(until: Duration) -> String {
    let minutes = until.as_secs() / 60;
    format!(
        "Next puzzle available in: {}h {}m",
        minutes / 60,
        minutes % 60
    )
}
