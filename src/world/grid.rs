//! Grid - the rows x cols matrix of particle cells
//!
//! All accessors take signed coordinates so neighbor offsets can be applied
//! without pre-checking. Anything outside the grid reads as empty and writes
//! are dropped.

use super::Particle;

/// Dense particle grid, row-major
#[derive(Clone, Debug)]
pub struct Grid {
    rows: usize,
    cols: usize,
    /// Index = row * cols + col
    cells: Vec<Option<Particle>>,
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn in_bounds(&self, row: i32, col: i32) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.rows && (col as usize) < self.cols
    }

    #[inline]
    fn index(&self, row: i32, col: i32) -> Option<usize> {
        if self.in_bounds(row, col) {
            Some(row as usize * self.cols + col as usize)
        } else {
            None
        }
    }

    /// Particle at (row, col), `None` if empty or out of bounds
    #[inline]
    pub fn get(&self, row: i32, col: i32) -> Option<&Particle> {
        self.index(row, col).and_then(|i| self.cells[i].as_ref())
    }

    #[inline]
    pub fn get_mut(&mut self, row: i32, col: i32) -> Option<&mut Particle> {
        let i = self.index(row, col)?;
        self.cells[i].as_mut()
    }

    /// Whether (row, col) is inside the grid and holds nothing
    #[inline]
    pub fn is_empty_cell(&self, row: i32, col: i32) -> bool {
        self.index(row, col)
            .map(|i| self.cells[i].is_none())
            .unwrap_or(false)
    }

    /// Overwrite a cell. Out-of-bounds writes are ignored.
    #[inline]
    pub fn set(&mut self, row: i32, col: i32, particle: Option<Particle>) {
        if let Some(i) = self.index(row, col) {
            self.cells[i] = particle;
        }
    }

    /// Remove and return the particle at (row, col)
    #[inline]
    pub fn take(&mut self, row: i32, col: i32) -> Option<Particle> {
        let i = self.index(row, col)?;
        self.cells[i].take()
    }

    /// Exchange two cells. Returns false (and does nothing) if either is out of bounds.
    pub fn swap(&mut self, r1: i32, c1: i32, r2: i32, c2: i32) -> bool {
        match (self.index(r1, c1), self.index(r2, c2)) {
            (Some(a), Some(b)) => {
                self.cells.swap(a, b);
                true
            }
            _ => false,
        }
    }

    /// Move the particle at `from` into the empty cell `to`.
    ///
    /// Fails if the source is empty, the target is occupied, or either is out
    /// of bounds, so a particle is never duplicated or overwritten.
    pub fn move_particle(&mut self, from: (i32, i32), to: (i32, i32)) -> bool {
        match (self.index(from.0, from.1), self.index(to.0, to.1)) {
            (Some(a), Some(b)) if a != b && self.cells[a].is_some() && self.cells[b].is_none() => {
                self.cells.swap(a, b);
                true
            }
            _ => false,
        }
    }

    /// Count occupied cells
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Empty every cell
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = None);
    }

    /// Clear all "updated this tick" flags
    pub fn clear_update_flags(&mut self) {
        for particle in self.cells.iter_mut().flatten() {
            particle.clear_updated();
        }
    }

    /// Change dimensions, keeping the overlapping top-left region
    pub fn resize(&mut self, rows: usize, cols: usize) {
        let mut cells = vec![None; rows * cols];
        for r in 0..rows.min(self.rows) {
            for c in 0..cols.min(self.cols) {
                cells[r * cols + c] = self.cells[r * self.cols + c];
            }
        }
        self.rows = rows;
        self.cols = cols;
        self.cells = cells;
    }

    /// Iterate occupied cells as (row, col, particle)
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Particle)> {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(i, cell)| cell.as_ref().map(|p| (i / cols, i % cols, p)))
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(0, 0)
    }
}
