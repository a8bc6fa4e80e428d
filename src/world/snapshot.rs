//! Read-only view of the grid for renderers

use super::Grid;
use crate::simulation::Materials;

/// What a renderer needs to draw one occupied cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellView<'a> {
    pub color: [u8; 4],
    pub name: &'a str,
}

/// Borrowed, immutable view of the grid between ticks
#[derive(Clone, Copy)]
pub struct GridSnapshot<'a> {
    grid: &'a Grid,
    materials: &'a Materials,
}

impl<'a> GridSnapshot<'a> {
    pub(crate) fn new(grid: &'a Grid, materials: &'a Materials) -> Self {
        Self { grid, materials }
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    /// Color and material name at (row, col), `None` if empty or out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<CellView<'a>> {
        if row >= self.grid.rows() || col >= self.grid.cols() {
            return None;
        }
        self.grid
            .get(row as i32, col as i32)
            .map(|p| self.view(p.material_id))
    }

    fn view(&self, material_id: u16) -> CellView<'a> {
        let def = self.materials.get(material_id);
        CellView {
            color: def.color,
            name: &def.name,
        }
    }

    pub fn particle_count(&self) -> usize {
        self.grid.count()
    }

    /// Occupied cells as (row, col, view), row-major
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, CellView<'a>)> + 'a {
        let grid = self.grid;
        let materials = self.materials;
        grid.iter().map(move |(r, c, p)| {
            let def = materials.get(p.material_id);
            (
                r,
                c,
                CellView {
                    color: def.color,
                    name: &def.name,
                },
            )
        })
    }

    /// Number of cells holding the named material
    pub fn count_of(&self, name: &str) -> usize {
        self.iter().filter(|(_, _, view)| view.name == name).count()
    }
}
