//! Game logic: daily grid, path tracing, word ledger, bonus puzzles

pub mod bonus;
pub mod dictionary;
pub mod ledger;
pub mod path;
pub mod rng;

use chrono::{Datelike, Local, NaiveDate};
use rng::SeededRandom;
use std::fmt;
use std::str::FromStr;

/// Side length of the square grid.
pub const GRID_SIZE: usize = 5;

/// Letter dice: the 16 classic dice followed by 9 vowel-heavy supplements.
/// One die per grid cell.
pub const DICE: [&str; GRID_SIZE * GRID_SIZE] = [
    "AAEEGN", "ABBJOO", "ACHOPS", "AFFKPS", "AOOTTW", "CIMOTU", "DEILRX", "DELRVY", "DISTTY",
    "EEGHNW", "EEINSU", "EHRTVW", "EIOSST", "ELRTTY", "HIMNQU", "HLNNRZ", "AAAFRS", "AAEEEE",
    "AAFIRS", "ADENNN", "AEEEEM", "AEEGMU", "AEGMNN", "AFIRSY", "BJKQXZ",
];

const FACES_PER_DIE: usize = 6;

const VOWELS: [char; 5] = ['A', 'E', 'I', 'O', 'U'];

/// A calendar day in the player's local calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GameDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl GameDate {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    /// Today's date on the local clock.
    pub fn today() -> Self {
        Self::from(Local::now().date_naive())
    }

    /// Seed string for the day's grid: `{year}-{month}-{day}`, no zero padding.
    pub fn seed_key(&self) -> String {
        format!("{}-{}-{}", self.year, self.month, self.day)
    }
}

impl From<NaiveDate> for GameDate {
    fn from(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month(), date.day())
    }
}

impl fmt::Display for GameDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.seed_key())
    }
}

/// Error parsing a `{year}-{month}-{day}` key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid date key: {0:?}")]
pub struct ParseDateError(String);

impl FromStr for GameDate {
    type Err = ParseDateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseDateError(s.to_string());
        let mut parts = s.splitn(3, '-');
        let year = parts.next().and_then(|p| p.parse().ok()).ok_or_else(err)?;
        let month: u32 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(err)?;
        let day: u32 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(err)?;
        NaiveDate::from_ymd_opt(year, month, day)
            .map(GameDate::from)
            .ok_or_else(err)
    }
}

/// A grid coordinate, 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Chebyshev distance: max of row and column difference.
    pub fn distance(&self, other: &Cell) -> usize {
        self.row.abs_diff(other.row).max(self.col.abs_diff(other.col))
    }

    /// Adjacent including diagonals. A cell is not adjacent to itself.
    pub fn is_adjacent(&self, other: &Cell) -> bool {
        self.distance(other) == 1
    }

    pub fn in_bounds(&self) -> bool {
        self.row < GRID_SIZE && self.col < GRID_SIZE
    }
}

/// The day's letter grid. Immutable once generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    letters: [[char; GRID_SIZE]; GRID_SIZE],
}

impl Grid {
    /// Generate the grid for a calendar day.
    pub fn for_date(date: &GameDate) -> Self {
        Self::from_seed(&date.seed_key())
    }

    /// Generate a grid from a raw seed string.
    ///
    /// Dice are Fisher-Yates shuffled with the seeded stream, laid out
    /// row-major, then each die is rolled with the same stream.
    pub fn from_seed(seed: &str) -> Self {
        let mut rng = SeededRandom::new(seed);
        let mut dice = DICE;

        for i in (1..dice.len()).rev() {
            let j = rng.next_index(i + 1);
            dice.swap(i, j);
        }

        let mut letters = [[' '; GRID_SIZE]; GRID_SIZE];
        for (index, die) in dice.iter().enumerate() {
            let face = rng.next_index(FACES_PER_DIE);
            letters[index / GRID_SIZE][index % GRID_SIZE] =
                die.as_bytes()[face].to_ascii_uppercase() as char;
        }

        Self { letters }
    }

    /// Build a grid from explicit rows. Returns `None` unless there are
    /// exactly `GRID_SIZE` rows of `GRID_SIZE` ASCII letters.
    pub fn from_rows(rows: &[&str]) -> Option<Self> {
        if rows.len() != GRID_SIZE {
            return None;
        }
        let mut letters = [[' '; GRID_SIZE]; GRID_SIZE];
        for (r, row) in rows.iter().enumerate() {
            let chars: Vec<char> = row.chars().collect();
            if chars.len() != GRID_SIZE || !chars.iter().all(|c| c.is_ascii_alphabetic()) {
                return None;
            }
            for (c, ch) in chars.into_iter().enumerate() {
                letters[r][c] = ch.to_ascii_uppercase();
            }
        }
        Some(Self { letters })
    }

    /// Letter at a cell, or `None` when out of bounds.
    pub fn letter(&self, cell: Cell) -> Option<char> {
        self.letters.get(cell.row)?.get(cell.col).copied()
    }

    /// Rows as strings, top to bottom.
    pub fn rows(&self) -> Vec<String> {
        self.letters.iter().map(|row| row.iter().collect()).collect()
    }

    /// All cells in row-major order.
    pub fn cells() -> impl Iterator<Item = Cell> {
        (0..GRID_SIZE).flat_map(|row| (0..GRID_SIZE).map(move |col| Cell::new(row, col)))
    }

    /// The word spelled by a path of cells.
    pub fn word_for(&self, path: &[Cell]) -> String {
        path.iter().filter_map(|&cell| self.letter(cell)).collect()
    }

    /// First cell in row-major order holding `letter` that validly extends `path`.
    pub fn find_extension(&self, path: &[Cell], letter: char) -> Option<Cell> {
        let letter = letter.to_ascii_uppercase();
        Self::cells().find(|&cell| {
            self.letter(cell) == Some(letter) && path::is_valid_extension(path, cell)
        })
    }

    pub fn is_vowel(letter: char) -> bool {
        VOWELS.contains(&letter.to_ascii_uppercase())
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            f.write_str(row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_key_has_no_zero_padding() {
        assert_eq!(GameDate::new(2024, 1, 5).seed_key(), "2024-1-5");
        assert_eq!(GameDate::new(2025, 12, 31).to_string(), "2025-12-31");
    }

    #[test]
    fn test_date_key_parses_back() {
        let date: GameDate = "2024-1-15".parse().unwrap();
        assert_eq!(date, GameDate::new(2024, 1, 15));
        assert!("2024-13-1".parse::<GameDate>().is_err());
        assert!("yesterday".parse::<GameDate>().is_err());
        assert!("2024-1".parse::<GameDate>().is_err());
    }

    #[test]
    fn test_golden_grid() {
        let grid = Grid::for_date(&GameDate::new(2024, 1, 15));
        assert_eq!(grid.rows(), vec!["YEEWS", "WOHNB", "NECOG", "ELRIN", "ESNES"]);
    }

    #[test]
    fn test_grid_is_deterministic() {
        let date = GameDate::new(2025, 3, 9);
        assert_eq!(Grid::for_date(&date), Grid::for_date(&date));
    }

    #[test]
    fn test_negative_hash_date_generates_valid_grid() {
        // "2024-12-31" hashes below zero
        let grid = Grid::for_date(&GameDate::new(2024, 12, 31));
        for cell in Grid::cells() {
            assert!(grid.letter(cell).is_some_and(|c| c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn test_consecutive_days_differ() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let grids: Vec<Grid> = start
            .iter_days()
            .take(60)
            .map(|d| Grid::for_date(&GameDate::from(d)))
            .collect();

        let distinct = grids
            .iter()
            .enumerate()
            .filter(|(i, g)| !grids[..*i].contains(g))
            .count();
        assert!(distinct >= 58, "only {} distinct grids in 60 days", distinct);
    }

    #[test]
    fn test_every_letter_comes_from_its_die_table() {
        let start = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        for day in start.iter_days().take(100) {
            let grid = Grid::for_date(&GameDate::from(day));
            for cell in Grid::cells() {
                let letter = grid.letter(cell).unwrap();
                assert!(
                    DICE.iter().any(|die| die.contains(letter)),
                    "letter {} not on any die",
                    letter
                );
            }
        }
    }

    #[test]
    fn test_from_rows_validates_shape() {
        assert!(Grid::from_rows(&["CATSX", "XXXXX", "XXXXX", "XXXXX", "XXXXX"]).is_some());
        assert!(Grid::from_rows(&["CATS", "XXXXX", "XXXXX", "XXXXX", "XXXXX"]).is_none());
        assert!(Grid::from_rows(&["CATSX", "XXXXX"]).is_none());
        assert!(Grid::from_rows(&["CAT1X", "XXXXX", "XXXXX", "XXXXX", "XXXXX"]).is_none());
    }

    #[test]
    fn test_word_for_path() {
        let grid = Grid::from_rows(&["CATSX", "XXXXX", "XXXXX", "XXXXX", "XXXXX"]).unwrap();
        let path = [Cell::new(0, 0), Cell::new(0, 1), Cell::new(0, 2)];
        assert_eq!(grid.word_for(&path), "CAT");
    }

    #[test]
    fn test_find_extension_prefers_row_major_and_respects_adjacency() {
        let grid = Grid::from_rows(&["AXXXA", "XXXXX", "XXBXX", "XXXXX", "AXXXX"]).unwrap();

        assert_eq!(grid.find_extension(&[], 'a'), Some(Cell::new(0, 0)));
        // From the B in the middle, no A is adjacent
        assert_eq!(grid.find_extension(&[Cell::new(2, 2)], 'A'), None);
        // From (1, 3) only the A at (0, 4) is adjacent
        assert_eq!(grid.find_extension(&[Cell::new(1, 3)], 'A'), Some(Cell::new(0, 4)));
    }

    #[test]
    fn test_cell_distance() {
        let a = Cell::new(1, 1);
        assert!(a.is_adjacent(&Cell::new(0, 0)));
        assert!(a.is_adjacent(&Cell::new(2, 1)));
        assert!(!a.is_adjacent(&Cell::new(1, 1)));
        assert!(!a.is_adjacent(&Cell::new(3, 1)));
        assert_eq!(a.distance(&Cell::new(4, 2)), 3);
    }
}
