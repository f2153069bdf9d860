//! Selection path tracing
//!
//! A path is an ordered run of distinct cells where each cell touches the
//! previous one, diagonals included.

use super::{Cell, Grid};

/// True iff `candidate` may be appended to `path`: the path is empty, or the
/// candidate is unused and within one step of the last cell.
pub fn is_valid_extension(path: &[Cell], candidate: Cell) -> bool {
    match path.last() {
        None => true,
        Some(last) => last.is_adjacent(&candidate) && !path.contains(&candidate),
    }
}

/// The player's in-progress selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionPath {
    cells: Vec<Cell>,
}

impl SelectionPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a cell if it is in bounds and a valid extension.
    /// Invalid selections are ignored and return false.
    pub fn try_push(&mut self, cell: Cell) -> bool {
        if !cell.in_bounds() || !is_valid_extension(&self.cells, cell) {
            return false;
        }
        self.cells.push(cell);
        true
    }

    /// Drop the most recently selected cell.
    pub fn pop(&mut self) -> Option<Cell> {
        self.cells.pop()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    pub fn last(&self) -> Option<Cell> {
        self.cells.last().copied()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The word spelled on `grid` by this path.
    pub fn word(&self, grid: &Grid) -> String {
        grid.word_for(&self.cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GRID_SIZE;
    use proptest::prelude::*;

    #[test]
    fn test_empty_path_accepts_any_cell() {
        assert!(is_valid_extension(&[], Cell::new(4, 4)));
        assert!(is_valid_extension(&[], Cell::new(0, 0)));
    }

    #[test]
    fn test_adjacent_including_diagonals() {
        let path = [Cell::new(2, 2)];
        for (r, c) in [(1, 1), (1, 2), (1, 3), (2, 1), (2, 3), (3, 1), (3, 2), (3, 3)] {
            assert!(is_valid_extension(&path, Cell::new(r, c)), "({}, {})", r, c);
        }
        assert!(!is_valid_extension(&path, Cell::new(0, 2)));
        assert!(!is_valid_extension(&path, Cell::new(4, 4)));
    }

    #[test]
    fn test_repeated_cell_rejected() {
        let path = [Cell::new(0, 0), Cell::new(0, 1)];
        assert!(!is_valid_extension(&path, Cell::new(0, 0)));
        assert!(!is_valid_extension(&path, Cell::new(0, 1)));
    }

    #[test]
    fn test_selection_ignores_invalid_cells() {
        let mut selection = SelectionPath::new();
        assert!(selection.try_push(Cell::new(0, 0)));
        assert!(!selection.try_push(Cell::new(2, 2)));
        assert!(!selection.try_push(Cell::new(0, 0)));
        assert!(selection.try_push(Cell::new(1, 1)));
        assert_eq!(selection.cells(), &[Cell::new(0, 0), Cell::new(1, 1)]);
    }

    #[test]
    fn test_selection_rejects_out_of_bounds() {
        let mut selection = SelectionPath::new();
        assert!(!selection.try_push(Cell::new(GRID_SIZE, 0)));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_pop_allows_reselecting() {
        let mut selection = SelectionPath::new();
        selection.try_push(Cell::new(0, 0));
        selection.try_push(Cell::new(0, 1));
        assert_eq!(selection.pop(), Some(Cell::new(0, 1)));
        assert!(selection.try_push(Cell::new(0, 1)));
        selection.clear();
        assert!(selection.is_empty());
    }

    fn cell_strategy() -> impl Strategy<Value = Cell> {
        (0..GRID_SIZE, 0..GRID_SIZE).prop_map(|(r, c)| Cell::new(r, c))
    }

    proptest! {
        #[test]
        fn prop_extension_iff_unused_and_adjacent(
            path in prop::collection::vec(cell_strategy(), 0..8),
            candidate in cell_strategy(),
        ) {
            let expected = match path.last() {
                None => true,
                Some(last) => {
                    !path.contains(&candidate)
                        && last.row.abs_diff(candidate.row) <= 1
                        && last.col.abs_diff(candidate.col) <= 1
                }
            };
            prop_assert_eq!(is_valid_extension(&path, candidate), expected);
        }

        #[test]
        fn prop_built_paths_are_always_legal(
            picks in prop::collection::vec(cell_strategy(), 0..30),
        ) {
            let mut selection = SelectionPath::new();
            for cell in picks {
                selection.try_push(cell);
            }
            let cells = selection.cells();
            for (i, pair) in cells.windows(2).enumerate() {
                prop_assert!(pair[0].is_adjacent(&pair[1]));
                prop_assert!(!cells[..=i].contains(&pair[1]));
            }
        }
    }
}
