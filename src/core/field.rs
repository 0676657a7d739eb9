//! Field module - the grid of locked cells
//!
//! The field is a 10x22 grid (20 visible rows plus 2 hidden spawn rows at the
//! top) stored as a flat array for cache locality and zero allocation.
//! Coordinates are (row, col): row 0 is the topmost hidden row, row 21 the
//! floor. Only two operations mutate the grid once a game is running: writing
//! a locked piece's cells, and removing full rows while refilling the top.

use arrayvec::ArrayVec;

use crate::types::{Cell, PieceKind, COLS, ROWS};

/// Total number of cells on the field.
const FIELD_SIZE: usize = ROWS * COLS;

/// The field of locked cells, row-major order (row * COLS + col).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    cells: [Cell; FIELD_SIZE],
}

impl Field {
    /// Create a new empty field.
    pub fn new() -> Self {
        Self {
            cells: [None; FIELD_SIZE],
        }
    }

    /// Calculate flat index from (row, col), `None` when out of bounds.
    #[inline(always)]
    fn index(row: i8, col: i8) -> Option<usize> {
        if row < 0 || row >= ROWS as i8 || col < 0 || col >= COLS as i8 {
            return None;
        }
        Some((row as usize) * COLS + (col as usize))
    }

    pub fn rows(&self) -> usize {
        ROWS
    }

    pub fn cols(&self) -> usize {
        COLS
    }

    /// Whether (row, col) lies inside the grid.
    pub fn contains(&self, row: i8, col: i8) -> bool {
        Self::index(row, col).is_some()
    }

    /// Get cell at (row, col). Returns `None` when out of bounds.
    pub fn get(&self, row: i8, col: i8) -> Option<Cell> {
        Self::index(row, col).map(|idx| self.cells[idx])
    }

    /// Set cell at (row, col). Returns false when out of bounds.
    pub fn set(&mut self, row: i8, col: i8, cell: Cell) -> bool {
        match Self::index(row, col) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Whether (row, col) is inside the grid and empty.
    pub fn is_open(&self, row: i8, col: i8) -> bool {
        matches!(self.get(row, col), Some(None))
    }

    /// Whether (row, col) is inside the grid and holds a locked cell.
    pub fn is_occupied(&self, row: i8, col: i8) -> bool {
        matches!(self.get(row, col), Some(Some(_)))
    }

    /// Write a locked piece's absolute cells into the grid.
    pub fn write_cells(&mut self, cells: &[(i8, i8)], kind: PieceKind) {
        for &(row, col) in cells {
            self.set(row, col, Some(kind));
        }
    }

    /// Whether every cell of `row` is occupied.
    pub fn is_row_full(&self, row: usize) -> bool {
        if row >= ROWS {
            return false;
        }
        let start = row * COLS;
        self.cells[start..start + COLS].iter().all(|c| c.is_some())
    }

    fn row_has_any(&self, row: usize) -> bool {
        let start = row * COLS;
        self.cells[start..start + COLS].iter().any(|c| c.is_some())
    }

    /// Find all full rows (top to bottom) and whether clearing them would
    /// leave the field entirely empty (a perfect clear).
    ///
    /// A lock adds at most four cells, so at most four rows can become full
    /// at once.
    pub fn full_rows(&self) -> (ArrayVec<usize, 4>, bool) {
        let mut full = ArrayVec::new();
        let mut outside_occupied = false;
        for row in 0..ROWS {
            if self.is_row_full(row) {
                full.push(row);
            } else if self.row_has_any(row) {
                outside_occupied = true;
            }
        }
        let perfect = !full.is_empty() && !outside_occupied;
        (full, perfect)
    }

    /// Remove the given rows and refill the top with empty rows.
    ///
    /// Order-independent in the input; surviving rows keep their relative
    /// order and the row count is unchanged. Uses a bottom-up write pointer
    /// so no index bookkeeping is needed during removal.
    pub fn clear_rows(&mut self, rows: &[usize]) {
        let mut remove = [false; ROWS];
        for &row in rows {
            if row < ROWS {
                remove[row] = true;
            }
        }

        let mut write = ROWS;
        for read in (0..ROWS).rev() {
            if remove[read] {
                continue;
            }
            write -= 1;
            if write != read {
                let src = read * COLS;
                self.cells.copy_within(src..src + COLS, write * COLS);
            }
        }

        for cell in &mut self.cells[..write * COLS] {
            *cell = None;
        }
    }

    /// Wipe the whole grid.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// Raw view of the cells, row-major.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

impl Default for Field {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_row(field: &mut Field, row: usize) {
        for col in 0..COLS {
            field.set(row as i8, col as i8, Some(PieceKind::I));
        }
    }

    #[test]
    fn test_new_field_is_empty() {
        let field = Field::new();
        for row in 0..ROWS as i8 {
            for col in 0..COLS as i8 {
                assert!(field.is_open(row, col));
            }
        }
    }

    #[test]
    fn test_index_bounds() {
        assert_eq!(Field::index(0, 0), Some(0));
        assert_eq!(Field::index(0, 9), Some(9));
        assert_eq!(Field::index(1, 0), Some(10));
        assert_eq!(Field::index(21, 9), Some(219));
        assert_eq!(Field::index(-1, 0), None);
        assert_eq!(Field::index(0, -1), None);
        assert_eq!(Field::index(22, 0), None);
        assert_eq!(Field::index(0, 10), None);
    }

    #[test]
    fn test_set_and_get() {
        let mut field = Field::new();
        assert!(field.set(5, 3, Some(PieceKind::T)));
        assert_eq!(field.get(5, 3), Some(Some(PieceKind::T)));
        assert!(field.is_occupied(5, 3));
        assert!(!field.is_open(5, 3));

        assert!(!field.set(-1, 0, Some(PieceKind::T)));
        assert_eq!(field.get(22, 0), None);
    }

    #[test]
    fn test_full_row_detection() {
        let mut field = Field::new();
        assert!(!field.is_row_full(21));

        fill_row(&mut field, 21);
        assert!(field.is_row_full(21));

        field.set(21, 4, None);
        assert!(!field.is_row_full(21));
    }

    #[test]
    fn test_full_rows_and_perfect_flag() {
        let mut field = Field::new();
        fill_row(&mut field, 20);
        fill_row(&mut field, 21);

        let (full, perfect) = field.full_rows();
        assert_eq!(full.as_slice(), &[20, 21]);
        assert!(perfect, "only full rows occupied, clear empties the field");

        // A stray cell above the full rows breaks the perfect clear.
        field.set(10, 0, Some(PieceKind::S));
        let (full, perfect) = field.full_rows();
        assert_eq!(full.as_slice(), &[20, 21]);
        assert!(!perfect);
    }

    #[test]
    fn test_full_rows_empty_field_not_perfect() {
        let field = Field::new();
        let (full, perfect) = field.full_rows();
        assert!(full.is_empty());
        assert!(!perfect);
    }

    #[test]
    fn test_clear_rows_preserves_survivor_order() {
        let mut field = Field::new();
        // Distinct markers on three survivor rows around two full rows.
        field.set(18, 0, Some(PieceKind::J));
        fill_row(&mut field, 19);
        field.set(20, 1, Some(PieceKind::L));
        fill_row(&mut field, 21);

        field.clear_rows(&[19, 21]);

        // Survivors shift down by the number of full rows below them.
        assert_eq!(field.get(20, 0), Some(Some(PieceKind::J)));
        assert_eq!(field.get(21, 1), Some(Some(PieceKind::L)));
        assert!(!field.is_row_full(19));
        assert!(!field.is_row_full(21));

        // Top rows refilled empty; row count is a constant so just spot-check.
        for col in 0..COLS as i8 {
            assert!(field.is_open(0, col));
            assert!(field.is_open(1, col));
        }
    }

    #[test]
    fn test_clear_rows_order_independent() {
        let mut a = Field::new();
        let mut b = Field::new();
        for f in [&mut a, &mut b] {
            f.set(17, 5, Some(PieceKind::Z));
            fill_row(f, 18);
            fill_row(f, 21);
        }
        a.clear_rows(&[18, 21]);
        b.clear_rows(&[21, 18]);
        assert_eq!(a, b);
        assert_eq!(a.get(19, 5), Some(Some(PieceKind::Z)));
    }

    #[test]
    fn test_write_cells() {
        let mut field = Field::new();
        field.write_cells(&[(20, 3), (20, 4), (21, 3), (21, 4)], PieceKind::O);
        assert!(field.is_occupied(20, 3));
        assert!(field.is_occupied(21, 4));
        assert_eq!(field.get(20, 3), Some(Some(PieceKind::O)));
    }

    #[test]
    fn test_clear_wipes_everything() {
        let mut field = Field::new();
        fill_row(&mut field, 21);
        field.clear();
        assert!(field.cells().iter().all(|c| c.is_none()));
    }
}
