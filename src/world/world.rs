//! Sandbox - owns the grid, the material registry and the tick loop

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

use super::{CellularAutomataUpdater, Grid, GridSnapshot, Particle, TickStats};
use crate::config::SandboxConfig;
use crate::error::{Result, SandboxError};
use crate::simulation::{MaterialDef, MaterialId, Materials, ReactionTable};

/// A falling-sand world of fixed size
pub struct Sandbox {
    grid: Grid,

    /// Material definitions
    materials: Materials,

    /// Class/flag keyed contact rules
    reactions: ReactionTable,

    rng: Xoshiro256StarStar,

    /// Ticks advanced since creation (or the last `clear`)
    tick_count: u64,

    last_stats: TickStats,
}

impl Sandbox {
    /// Empty sandbox with the default catalog and an entropy-seeded RNG
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::with_rng(rows, cols, Xoshiro256StarStar::from_entropy())
    }

    /// Empty sandbox whose runs are reproducible for a given seed
    pub fn with_seed(rows: usize, cols: usize, seed: u64) -> Self {
        log::debug!("Sandbox RNG seeded with {}", seed);
        Self::with_rng(rows, cols, Xoshiro256StarStar::seed_from_u64(seed))
    }

    pub fn from_config(config: &SandboxConfig) -> Self {
        match config.seed {
            Some(seed) => Self::with_seed(config.rows, config.cols, seed),
            None => Self::new(config.rows, config.cols),
        }
    }

    fn with_rng(rows: usize, cols: usize, rng: Xoshiro256StarStar) -> Self {
        let materials = Materials::new();
        log::info!(
            "Created {}x{} sandbox with {} materials",
            rows,
            cols,
            materials.len()
        );

        Self {
            grid: Grid::new(rows, cols),
            materials,
            reactions: ReactionTable::new(),
            rng,
            tick_count: 0,
            last_stats: TickStats::default(),
        }
    }

    /// Replace the material registry.
    ///
    /// Material ids change with the registry, so the grid is cleared. On error
    /// the previous registry and grid are kept.
    pub fn load_materials(&mut self, defs: Vec<MaterialDef>) -> Result<()> {
        let materials = Materials::load(defs)?;
        log::info!("Loaded {} materials, clearing grid", materials.len());
        self.materials = materials;
        self.grid.clear();
        Ok(())
    }

    pub fn materials(&self) -> &Materials {
        &self.materials
    }

    pub fn reactions(&self) -> &ReactionTable {
        &self.reactions
    }

    /// Contact rules, for registering extra ones
    pub fn reactions_mut(&mut self) -> &mut ReactionTable {
        &mut self.reactions
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    fn material_id(&self, name: &str) -> Result<MaterialId> {
        self.materials
            .id_of(name)
            .ok_or_else(|| SandboxError::UnknownMaterial(name.to_string()))
    }

    fn check_bounds(&self, row: usize, col: usize) -> Result<()> {
        if row < self.grid.rows() && col < self.grid.cols() {
            Ok(())
        } else {
            Err(SandboxError::OutOfBounds {
                row,
                col,
                rows: self.grid.rows(),
                cols: self.grid.cols(),
            })
        }
    }

    /// Place a fresh particle of `name` at (row, col), replacing whatever is there
    pub fn place_particle(&mut self, row: usize, col: usize, name: &str) -> Result<()> {
        let id = self.material_id(name)?;
        self.check_bounds(row, col)?;
        let particle = Particle::spawn(id, self.materials.get(id));
        self.grid.set(row as i32, col as i32, Some(particle));
        Ok(())
    }

    /// Fill a circular brush of `radius` around (row, col) with `name`.
    ///
    /// Cells outside the grid are skipped. Returns the number of cells painted.
    pub fn paint(&mut self, row: i32, col: i32, radius: i32, name: &str) -> Result<usize> {
        let id = self.material_id(name)?;
        let def = self.materials.get(id);

        // Only walk the part of the brush's bounding box that lies on the grid
        let r = i64::from(radius.max(0));
        let (row, col) = (i64::from(row), i64::from(col));
        let last_row = self.grid.rows() as i64 - 1;
        let last_col = self.grid.cols() as i64 - 1;

        let mut painted = 0;
        for y in (row - r).max(0)..=(row + r).min(last_row) {
            let dy = y - row;
            for x in (col - r).max(0)..=(col + r).min(last_col) {
                let dx = x - col;
                // Circular brush
                if dx * dx + dy * dy <= r * r {
                    self.grid.set(y as i32, x as i32, Some(Particle::spawn(id, def)));
                    painted += 1;
                }
            }
        }
        log::debug!("Painted {} cells of {} at ({}, {})", painted, name, row, col);
        Ok(painted)
    }

    /// Empty the cell at (row, col), returning what was there
    pub fn erase(&mut self, row: usize, col: usize) -> Result<Option<Particle>> {
        self.check_bounds(row, col)?;
        Ok(self.grid.take(row as i32, col as i32))
    }

    /// Remove every particle and reset the tick counter
    pub fn clear(&mut self) {
        self.grid.clear();
        self.tick_count = 0;
        self.last_stats = TickStats::default();
    }

    /// Change the grid dimensions, keeping particles in the overlapping region
    pub fn resize(&mut self, rows: usize, cols: usize) {
        log::info!(
            "Resizing sandbox {}x{} -> {}x{}",
            self.grid.rows(),
            self.grid.cols(),
            rows,
            cols
        );
        self.grid.resize(rows, cols);
    }

    /// Advance the simulation by one tick
    pub fn tick(&mut self) -> TickStats {
        let mut stats = TickStats::default();
        CellularAutomataUpdater::step(
            &mut self.grid,
            &self.materials,
            &self.reactions,
            &mut stats,
            &mut self.rng,
        );
        self.tick_count += 1;
        self.last_stats = stats;

        log::debug!("tick {}: {:?}", self.tick_count, stats);
        stats
    }

    /// Advance `ticks` ticks, returning the summed stats
    pub fn run(&mut self, ticks: u64) -> TickStats {
        let mut total = TickStats::default();
        for _ in 0..ticks {
            let stats = self.tick();
            total.accumulate(&stats);
        }
        log::debug!(
            "Ran {} ticks ({} total), {} particles remain",
            ticks,
            self.tick_count,
            self.grid.count()
        );
        total
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn last_tick_stats(&self) -> TickStats {
        self.last_stats
    }

    pub fn particle_count(&self) -> usize {
        self.grid.count()
    }

    /// Read-only view of the current grid
    pub fn snapshot(&self) -> GridSnapshot<'_> {
        GridSnapshot::new(&self.grid, &self.materials)
    }
}
