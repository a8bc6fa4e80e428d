//! Explosion resolver - area clear on detonation

use crate::world::Grid;

/// Chebyshev radius of a detonation (7x7 block)
pub const BLAST_RADIUS: i32 = 3;

/// Clear every cell within `radius` of (row, col), clipped to the grid.
///
/// Cleared explosives are destroyed, not triggered. Returns the number of
/// particles removed, including the detonating one if still present.
pub fn detonate(grid: &mut Grid, row: i32, col: i32, radius: i32) -> usize {
    let mut destroyed = 0;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if grid.take(row + dy, col + dx).is_some() {
                destroyed += 1;
            }
        }
    }
    log::debug!(
        "Detonation at ({}, {}) destroyed {} particles",
        row,
        col,
        destroyed
    );
    destroyed
}
