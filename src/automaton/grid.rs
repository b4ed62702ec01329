//! Toroidal cell grid and the neighbor-counting pass

use crate::error::EngineError;
use std::fmt;

/// Cell state: 0 dead, 1 alive, anything above 1 is decaying.
pub type Cell = u8;

pub const DEAD: Cell = 0;
pub const ALIVE: Cell = 1;

/// Fixed-size toroidal grid.
///
/// States and cached neighbor counts are stored in two parallel flat arrays
/// indexed by `y * width + x`. Either dimension may be zero, in which case the
/// grid holds no cells and every pass over it is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    states: Vec<Cell>,
    neighbors: Vec<u8>,
}

impl Grid {
    /// Create a grid with every cell dead
    pub fn new(width: usize, height: usize) -> Self {
        let len = width * height;
        Self {
            width,
            height,
            states: vec![DEAD; len],
            neighbors: vec![0; len],
        }
    }

    /// Build a grid from rows of cell states; all rows must share a length
    pub fn from_rows(rows: &[&[Cell]]) -> Result<Self, EngineError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.len());
        if let Some((row, cells)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(EngineError::RaggedRows {
                row,
                len: cells.len(),
                expected: width,
            });
        }

        let mut grid = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, &state) in row.iter().enumerate() {
                grid.put(x, y, state);
            }
        }
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// True when either dimension is zero
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Cell state at `(x, y)`; out-of-bounds cells read as dead
    pub fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.states[self.index(x, y)]
        } else {
            DEAD
        }
    }

    /// Set the cell state at `(x, y)`
    pub fn set(&mut self, x: usize, y: usize, state: Cell) -> Result<(), EngineError> {
        if x >= self.width || y >= self.height {
            return Err(EngineError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        self.put(x, y, state);
        Ok(())
    }

    /// Unchecked write for callers that derive coordinates from the grid itself
    #[inline]
    pub(crate) fn put(&mut self, x: usize, y: usize, state: Cell) {
        let idx = self.index(x, y);
        self.states[idx] = state;
    }

    /// Kill every cell
    pub fn clear(&mut self) {
        self.states.fill(DEAD);
        self.neighbors.fill(0);
    }

    pub fn states(&self) -> &[Cell] {
        &self.states
    }

    pub(crate) fn states_mut(&mut self) -> &mut [Cell] {
        &mut self.states
    }

    /// States alongside the neighbor counts from the last counting pass
    pub(crate) fn states_and_counts_mut(&mut self) -> (&mut [Cell], &[u8]) {
        (&mut self.states, &self.neighbors)
    }

    /// Neighbor counts from the last [`count_neighbors`](Self::count_neighbors) pass
    pub fn neighbor_counts(&self) -> &[u8] {
        &self.neighbors
    }

    pub fn neighbor_count(&self, x: usize, y: usize) -> u8 {
        if x < self.width && y < self.height {
            self.neighbors[self.index(x, y)]
        } else {
            0
        }
    }

    /// Recompute every cell's count of toroidal neighbors in state exactly 1.
    ///
    /// Scatter pass: counts are zeroed, then each alive cell increments its eight
    /// wrapped neighbors. Decaying cells contribute nothing. On grids one or two
    /// cells wide (or tall) the wrapped offsets land on the same cell more than
    /// once, so a cell may count itself or a neighbor several times.
    pub fn count_neighbors(&mut self) {
        self.neighbors.fill(0);

        let (width, height) = (self.width, self.height);
        for y in 0..height {
            let top = if y == 0 { height - 1 } else { y - 1 };
            let bottom = if y + 1 == height { 0 } else { y + 1 };

            for x in 0..width {
                if self.states[y * width + x] != ALIVE {
                    continue;
                }

                let left = if x == 0 { width - 1 } else { x - 1 };
                let right = if x + 1 == width { 0 } else { x + 1 };

                for (nx, ny) in [
                    (left, top),
                    (x, top),
                    (right, top),
                    (left, y),
                    (right, y),
                    (left, bottom),
                    (x, bottom),
                    (right, bottom),
                ] {
                    self.neighbors[ny * width + nx] += 1;
                }
            }
        }
    }

    /// Coordinates `(x, y)` of every cell in state 1, row by row
    pub fn living_cells(&self) -> Vec<(usize, usize)> {
        let mut living = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if self.get(x, y) == ALIVE {
                    living.push((x, y));
                }
            }
        }
        living
    }

    /// Number of cells in state 1
    pub fn alive_count(&self) -> usize {
        self.states.iter().filter(|&&s| s == ALIVE).count()
    }

    /// Number of cells in a decaying state (> 1)
    pub fn decaying_count(&self) -> usize {
        self.states.iter().filter(|&&s| s > ALIVE).count()
    }

    /// True when no cell is alive or decaying
    pub fn is_extinct(&self) -> bool {
        self.states.iter().all(|&s| s == DEAD)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                let symbol = match self.get(x, y) {
                    DEAD => '·',
                    ALIVE => '█',
                    _ => '▒',
                };
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(4, 3);
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.len(), 12);
        assert!(grid.is_extinct());
        assert!(!grid.is_empty());
    }

    #[test]
    fn test_zero_dimension_grid() {
        let mut grid = Grid::new(0, 10);
        assert!(grid.is_empty());
        grid.count_neighbors();
        assert!(grid.neighbor_counts().is_empty());
        assert!(grid.set(0, 0, ALIVE).is_err());
    }

    #[test]
    fn test_from_rows() {
        let grid = Grid::from_rows(&[&[0, 1, 0], &[2, 0, 1]]).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.get(1, 0), ALIVE);
        assert_eq!(grid.get(0, 1), 2);
        assert_eq!(grid.alive_count(), 2);
        assert_eq!(grid.decaying_count(), 1);

        assert_eq!(
            Grid::from_rows(&[&[0, 1], &[1, 0], &[1]]),
            Err(EngineError::RaggedRows { row: 2, len: 1, expected: 2 })
        );
    }

    #[test]
    fn test_set_out_of_bounds() {
        let mut grid = Grid::new(3, 3);
        assert_eq!(
            grid.set(3, 0, ALIVE),
            Err(EngineError::OutOfBounds { x: 3, y: 0, width: 3, height: 3 })
        );
        assert_eq!(grid.get(7, 7), DEAD);
    }

    #[test]
    fn test_full_grid_counts_eight_everywhere() {
        let mut grid = Grid::new(7, 5);
        grid.states_mut().fill(ALIVE);
        grid.count_neighbors();

        assert!(grid.neighbor_counts().iter().all(|&n| n == 8));
        assert_eq!(grid.neighbor_count(0, 0), 8);
        assert_eq!(grid.neighbor_count(6, 4), 8);
    }

    #[test]
    fn test_corner_wraps() {
        let mut grid = Grid::new(5, 5);
        grid.set(0, 0, ALIVE).unwrap();
        grid.count_neighbors();

        for (x, y) in [(4, 4), (0, 4), (1, 4), (4, 0), (1, 0), (4, 1), (0, 1), (1, 1)] {
            assert_eq!(grid.neighbor_count(x, y), 1, "neighbor ({}, {})", x, y);
        }
        assert_eq!(grid.neighbor_count(0, 0), 0);
        assert_eq!(grid.neighbor_counts().iter().map(|&n| n as usize).sum::<usize>(), 8);
    }

    #[test]
    fn test_decaying_cells_do_not_count() {
        let mut grid = Grid::from_rows(&[
            &[0, 0, 0, 0],
            &[0, 2, 3, 0],
            &[0, 0, 0, 0],
            &[0, 0, 0, 0],
        ])
        .unwrap();
        grid.count_neighbors();
        assert!(grid.neighbor_counts().iter().all(|&n| n == 0));
    }

    #[test]
    fn test_single_cell_is_its_own_neighbor() {
        let mut grid = Grid::new(1, 1);
        grid.set(0, 0, ALIVE).unwrap();
        grid.count_neighbors();
        assert_eq!(grid.neighbor_count(0, 0), 8);
    }

    #[test]
    fn test_one_wide_column_wraps_onto_itself() {
        // 1x3: left and right both map to x = 0
        let mut grid = Grid::new(1, 3);
        grid.set(0, 1, ALIVE).unwrap();
        grid.count_neighbors();

        assert_eq!(grid.neighbor_count(0, 1), 2);
        assert_eq!(grid.neighbor_count(0, 0), 3);
        assert_eq!(grid.neighbor_count(0, 2), 3);
    }

    #[test]
    fn test_counts_reset_between_passes() {
        let mut grid = Grid::new(4, 4);
        grid.set(1, 1, ALIVE).unwrap();
        grid.count_neighbors();
        assert_eq!(grid.neighbor_count(2, 2), 1);

        grid.set(1, 1, DEAD).unwrap();
        grid.count_neighbors();
        assert_eq!(grid.neighbor_count(2, 2), 0);
    }

    #[test]
    fn test_display() {
        let grid = Grid::from_rows(&[&[1, 0], &[0, 3]]).unwrap();
        assert_eq!(grid.to_string(), "█·\n·▒\n");
    }

    proptest! {
        #[test]
        fn prop_full_grid_counts_eight(width in 1usize..12, height in 1usize..12) {
            let mut grid = Grid::new(width, height);
            grid.states_mut().fill(ALIVE);
            grid.count_neighbors();
            prop_assert!(grid.neighbor_counts().iter().all(|&n| n == 8));
        }

        #[test]
        fn prop_total_count_is_eight_per_alive_cell(
            width in 1usize..10,
            height in 1usize..10,
            cells in proptest::collection::vec(0u8..4, 100),
        ) {
            let mut grid = Grid::new(width, height);
            for (state, &value) in grid.states_mut().iter_mut().zip(&cells) {
                *state = value;
            }
            grid.count_neighbors();

            let total: usize = grid.neighbor_counts().iter().map(|&n| n as usize).sum();
            prop_assert_eq!(total, grid.alive_count() * 8);
            prop_assert!(grid.neighbor_counts().iter().all(|&n| n <= 8));
        }
    }
}
