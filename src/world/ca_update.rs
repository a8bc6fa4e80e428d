//! Cellular automata update logic - one tick of the particle grid
//!
//! The grid is swept bottom row to top, left to right. Every particle is
//! processed at most once per tick: anything that moves, is swapped, or is
//! created during the sweep carries the UPDATED flag until the next tick.

use super::{Grid, Particle, SimStats, WorldRng};
use crate::simulation::{
    detonate, Contact, MaterialDef, MaterialFlags, MaterialId, Materials, PhysicalClass,
    ReactionTable, ResolvedEffect, BLAST_RADIUS,
};

/// Orthogonal neighbors as (row, col) offsets: up, down, left, right
const NEIGHBORS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Gas drift candidates: up, up-left, up-right, left, right
const GAS_MOVES: [(i32, i32); 5] = [(-1, 0), (-1, -1), (-1, 1), (0, -1), (0, 1)];

/// Momentum given to a solid that topples sideways
const TOPPLE_VX: f32 = 0.5;
const TOPPLE_VY: f32 = 0.5;

/// Cellular automata updater - handles per-tick particle physics
pub struct CellularAutomataUpdater;

impl CellularAutomataUpdater {
    /// Advance the whole grid by one tick
    pub fn step<R: WorldRng>(
        grid: &mut Grid,
        materials: &Materials,
        table: &ReactionTable,
        stats: &mut dyn SimStats,
        rng: &mut R,
    ) {
        grid.clear_update_flags();

        let rows = grid.rows() as i32;
        let cols = grid.cols() as i32;

        // Bottom to top so a falling particle lands in an already-swept row
        for row in (0..rows).rev() {
            for col in 0..cols {
                Self::update_cell(grid, row, col, materials, table, stats, rng);
            }
        }
    }

    /// Process the particle at (row, col), if any
    pub fn update_cell<R: WorldRng>(
        grid: &mut Grid,
        row: i32,
        col: i32,
        materials: &Materials,
        table: &ReactionTable,
        stats: &mut dyn SimStats,
        rng: &mut R,
    ) {
        let particle = match grid.get(row, col) {
            Some(p) if !p.is_updated() => *p,
            _ => return,
        };
        let def = materials.get(particle.material_id);

        if def.class == PhysicalClass::Fire {
            if Self::burn_down(grid, row, col, stats) {
                return;
            }
            Self::spread_fire(grid, row, col, particle.material_id, materials, stats);
        }

        if def.is_explosive() && Self::count_down(grid, row, col, stats) {
            return;
        }

        let (row, col) = match def.class {
            PhysicalClass::Solid => {
                Self::update_solid(grid, row, col, def, materials, table, stats)
            }
            PhysicalClass::Liquid => {
                Self::update_liquid(grid, row, col, def, materials, table, stats, rng)
            }
            PhysicalClass::Gas => Self::update_gas(grid, row, col, stats, rng),
            PhysicalClass::Fire | PhysicalClass::Explosive => (row, col),
        };

        if let Some(p) = grid.get_mut(row, col) {
            p.mark_updated();
        }

        Self::apply_contact_rules(grid, row, col, materials, table, stats);
        Self::apply_reactions(grid, row, col, materials, stats);
    }

    /// Decrement a fire's lifetime. Returns true if it burned out.
    fn burn_down(grid: &mut Grid, row: i32, col: i32, stats: &mut dyn SimStats) -> bool {
        let burned_out = match grid.get_mut(row, col) {
            Some(p) => {
                p.lifetime = p.lifetime.saturating_sub(1);
                p.lifetime == 0
            }
            None => return true,
        };

        if burned_out {
            grid.set(row, col, None);
            stats.record_extinguish();
        }
        burned_out
    }

    /// Replace flammable orthogonal neighbors with fresh fire
    fn spread_fire(
        grid: &mut Grid,
        row: i32,
        col: i32,
        fire_id: MaterialId,
        materials: &Materials,
        stats: &mut dyn SimStats,
    ) {
        let fire_def = materials.get(fire_id);
        for (dr, dc) in NEIGHBORS {
            let (nr, nc) = (row + dr, col + dc);
            let flammable = grid
                .get(nr, nc)
                .map(|n| materials.get(n.material_id).has(MaterialFlags::FLAMMABLE))
                .unwrap_or(false);

            if flammable {
                grid.set(nr, nc, Some(Particle::spawn(fire_id, fire_def).settled()));
                stats.record_ignition();
                log::trace!("Ignited ({}, {})", nr, nc);
            }
        }
    }

    /// Decrement an explosive's countdown. Returns true if it detonated.
    fn count_down(grid: &mut Grid, row: i32, col: i32, stats: &mut dyn SimStats) -> bool {
        let expired = match grid.get_mut(row, col) {
            Some(p) => {
                p.countdown = p.countdown.saturating_sub(1);
                p.countdown == 0
            }
            None => return true,
        };

        if expired {
            detonate(grid, row, col, BLAST_RADIUS);
            grid.set(row, col, None);
            stats.record_detonation();
        }
        expired
    }

    /// Update solid material (falls, sinks through liquids, topples off edges)
    #[allow(clippy::too_many_arguments)]
    fn update_solid(
        grid: &mut Grid,
        row: i32,
        col: i32,
        def: &MaterialDef,
        materials: &Materials,
        table: &ReactionTable,
        stats: &mut dyn SimStats,
    ) -> (i32, i32) {
        let weight = def.weight();
        if weight <= 0.0 {
            // No gravity = no movement
            return (row, col);
        }

        if grid.is_empty_cell(row + 1, col) {
            return Self::fall(grid, row, col, weight, stats);
        }

        // Resting on the floor
        if !grid.in_bounds(row + 1, col) {
            Self::rest(grid, row, col);
            return (row, col);
        }

        // A pending contact rule keeps the particle in place so the rule can fire
        if Self::reacts_with_below(grid, row, col, materials, table) {
            Self::rest(grid, row, col);
            return (row, col);
        }

        // Dense solids sink through liquid
        if def.has(MaterialFlags::SINKS_IN_LIQUID) && Self::liquid_at(grid, row + 1, col, materials)
        {
            grid.swap(row, col, row + 1, col);
            if let Some(displaced) = grid.get_mut(row, col) {
                displaced.mark_updated();
            }
            if let Some(p) = grid.get_mut(row + 1, col) {
                p.vy = 0.0;
            }
            stats.record_move();
            return (row + 1, col);
        }

        // Topple off an edge, left first
        for dx in [-1, 1] {
            let side = col + dx;
            if grid.is_empty_cell(row, side) && grid.is_empty_cell(row + 1, side) {
                grid.move_particle((row, col), (row, side));
                if let Some(p) = grid.get_mut(row, side) {
                    p.vx = dx as f32 * TOPPLE_VX;
                    p.vy = TOPPLE_VY;
                }
                stats.record_move();
                return (row, side);
            }
        }

        Self::rest(grid, row, col);
        (row, col)
    }

    /// Update liquid material (falls, then flows sideways in a random direction)
    #[allow(clippy::too_many_arguments)]
    fn update_liquid<R: WorldRng>(
        grid: &mut Grid,
        row: i32,
        col: i32,
        def: &MaterialDef,
        materials: &Materials,
        table: &ReactionTable,
        stats: &mut dyn SimStats,
        rng: &mut R,
    ) -> (i32, i32) {
        let weight = def.weight();

        if weight > 0.0 && grid.is_empty_cell(row + 1, col) {
            return Self::fall(grid, row, col, weight, stats);
        }

        if Self::reacts_with_below(grid, row, col, materials, table) {
            Self::rest(grid, row, col);
            return (row, col);
        }

        // Try to flow horizontally (random direction first)
        let dx = if rng.gen_bool() { -1 } else { 1 };
        for side in [col + dx, col - dx] {
            if grid.move_particle((row, col), (row, side)) {
                stats.record_move();
                return (row, side);
            }
        }

        Self::rest(grid, row, col);
        (row, col)
    }

    /// Update gas material (drifts to one random candidate cell if it's free)
    fn update_gas<R: WorldRng>(
        grid: &mut Grid,
        row: i32,
        col: i32,
        stats: &mut dyn SimStats,
        rng: &mut R,
    ) -> (i32, i32) {
        let (dr, dc) = GAS_MOVES[rng.gen_index(GAS_MOVES.len())];
        let (nr, nc) = (row + dr, col + dc);

        if grid.move_particle((row, col), (nr, nc)) {
            stats.record_move();
            (nr, nc)
        } else {
            (row, col)
        }
    }

    /// Accelerate and fall `floor(vy)` cells, stopping above the first obstacle.
    ///
    /// Below one cell per tick the particle holds its cell and keeps its speed.
    fn fall(
        grid: &mut Grid,
        row: i32,
        col: i32,
        weight: f32,
        stats: &mut dyn SimStats,
    ) -> (i32, i32) {
        let steps = match grid.get_mut(row, col) {
            Some(p) => {
                p.vy += weight;
                p.vy.floor() as i32
            }
            None => return (row, col),
        };
        if steps < 1 {
            return (row, col);
        }

        let mut target = row;
        while target - row < steps && grid.is_empty_cell(target + 1, col) {
            target += 1;
        }

        if grid.move_particle((row, col), (target, col)) {
            if let Some(p) = grid.get_mut(target, col) {
                p.vx = 0.0;
            }
            stats.record_move();
            (target, col)
        } else {
            (row, col)
        }
    }

    /// Blocked: drop accumulated fall speed
    fn rest(grid: &mut Grid, row: i32, col: i32) {
        if let Some(p) = grid.get_mut(row, col) {
            p.vy = 0.0;
        }
    }

    fn liquid_at(grid: &Grid, row: i32, col: i32, materials: &Materials) -> bool {
        grid.get(row, col)
            .map(|p| materials.get(p.material_id).class == PhysicalClass::Liquid)
            .unwrap_or(false)
    }

    /// Whether a contact rule matches the particle at (row, col) and the one beneath it
    fn reacts_with_below(
        grid: &Grid,
        row: i32,
        col: i32,
        materials: &Materials,
        table: &ReactionTable,
    ) -> bool {
        match (grid.get(row, col), grid.get(row + 1, col)) {
            (Some(p), Some(below)) => table
                .find_rule(materials, p.material_id, below.material_id, Contact::Below)
                .is_some(),
            _ => false,
        }
    }

    /// Apply class/flag keyed contact rules for the particle at (row, col)
    fn apply_contact_rules(
        grid: &mut Grid,
        row: i32,
        col: i32,
        materials: &Materials,
        table: &ReactionTable,
        stats: &mut dyn SimStats,
    ) {
        for contact in Contact::ALL {
            let subject = match grid.get(row, col) {
                Some(p) => p.material_id,
                None => return,
            };
            let (dr, dc) = contact.offset();
            let (or, oc) = (row + dr, col + dc);
            let other = match grid.get(or, oc) {
                Some(p) => p.material_id,
                None => continue,
            };

            let Some((rule, effect)) = table.find_rule(materials, subject, other, contact) else {
                continue;
            };

            match effect {
                ResolvedEffect::TransformSubject(result) => {
                    let fresh = Particle::spawn(result, materials.get(result)).settled();
                    grid.set(row, col, Some(fresh));
                    stats.record_reaction();
                }
                ResolvedEffect::ClearOther => {
                    grid.set(or, oc, None);
                    stats.record_dissolve();
                }
            }
            log::trace!("Contact rule {} fired at ({}, {})", rule.name, row, col);
        }
    }

    /// Apply the particle's own adjacency reactions against its four neighbors.
    ///
    /// Rules come from the particle as it was before any replacement, so a
    /// later match can still fire after an earlier one rewrote this cell.
    fn apply_reactions(
        grid: &mut Grid,
        row: i32,
        col: i32,
        materials: &Materials,
        stats: &mut dyn SimStats,
    ) {
        let rules = match grid.get(row, col) {
            Some(p) => materials.reactions(p.material_id),
            None => return,
        };
        if rules.is_empty() {
            return;
        }

        for (dr, dc) in NEIGHBORS {
            let (nr, nc) = (row + dr, col + dc);
            let neighbor = match grid.get(nr, nc) {
                Some(n) => n.material_id,
                None => continue,
            };

            for rxn in rules.iter().filter(|rxn| rxn.with == neighbor) {
                let fresh = Particle::spawn(rxn.result, materials.get(rxn.result)).settled();
                grid.set(row, col, Some(fresh));
                grid.set(nr, nc, Some(fresh));
                stats.record_reaction();
                log::trace!("Reaction at ({}, {}) with ({}, {})", row, col, nr, nc);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{MaterialDef, Reaction};
    use crate::world::{NoopStats, TickStats};

    /// Test RNG that returns scripted values
    struct TestRng {
        bool_value: bool,
        index_value: usize,
    }

    impl TestRng {
        fn new(bool_value: bool) -> Self {
            Self {
                bool_value,
                index_value: 0,
            }
        }

        fn with_index(index_value: usize) -> Self {
            Self {
                bool_value: true,
                index_value,
            }
        }
    }

    impl WorldRng for TestRng {
        fn gen_bool(&mut self) -> bool {
            self.bool_value
        }

        fn gen_index(&mut self, len: usize) -> usize {
            self.index_value % len
        }
    }

    struct Fixture {
        grid: Grid,
        materials: Materials,
        table: ReactionTable,
    }

    impl Fixture {
        fn new(rows: usize, cols: usize) -> Self {
            Self {
                grid: Grid::new(rows, cols),
                materials: Materials::new(),
                table: ReactionTable::new(),
            }
        }

        fn place(&mut self, row: i32, col: i32, name: &str) {
            let id = self.materials.id_of(name).unwrap();
            let particle = Particle::spawn(id, self.materials.get(id));
            self.grid.set(row, col, Some(particle));
        }

        fn name_at(&self, row: i32, col: i32) -> Option<&str> {
            self.grid
                .get(row, col)
                .map(|p| self.materials.get(p.material_id).name.as_str())
        }

        fn step(&mut self, rng: &mut TestRng) -> TickStats {
            let mut stats = TickStats::default();
            CellularAutomataUpdater::step(
                &mut self.grid,
                &self.materials,
                &self.table,
                &mut stats,
                rng,
            );
            stats
        }
    }

    #[test]
    fn test_solid_gathers_speed_before_falling() {
        let mut world = Fixture::new(10, 3);
        world.place(0, 1, "sand");

        let stats = world.step(&mut TestRng::new(true));

        // 0.1 cells per tick isn't enough to leave the cell yet
        assert_eq!(world.name_at(0, 1), Some("sand"));
        assert_eq!(stats.moves, 0);
        assert!((world.grid.get(0, 1).unwrap().vy - 0.1).abs() < 1e-6);

        world.grid.get_mut(0, 1).unwrap().vy = 0.95;
        let stats = world.step(&mut TestRng::new(true));

        assert_eq!(world.name_at(0, 1), None);
        assert_eq!(world.name_at(1, 1), Some("sand"));
        assert_eq!(stats.moves, 1);
    }

    #[test]
    fn test_slow_particle_does_not_slide() {
        let mut world = Fixture::new(3, 3);
        world.place(0, 1, "water");

        world.step(&mut TestRng::new(true));

        // Empty below but too slow to fall: no sideways flow either
        assert_eq!(world.name_at(0, 1), Some("water"));
        assert_eq!(world.grid.count(), 1);
    }

    #[test]
    fn test_reaction_fires_before_movable_particle_falls() {
        let mut world = Fixture::new(5, 5);
        world.place(0, 0, "water");
        world.place(0, 1, "fire");

        let stats = world.step(&mut TestRng::new(true));

        assert_eq!(world.name_at(0, 0), Some("steam"));
        assert_eq!(world.name_at(0, 1), Some("steam"));
        assert_eq!(world.name_at(1, 0), None);
        assert_eq!(stats.reactions, 1);
    }

    #[test]
    fn test_solid_accelerates() {
        let mut world = Fixture::new(100, 1);
        world.place(0, 0, "sand");
        world.grid.get_mut(0, 0).unwrap().vy = 2.95;

        world.step(&mut TestRng::new(true));

        // vy = 3.05 → three cells
        assert_eq!(world.name_at(3, 0), Some("sand"));
    }

    #[test]
    fn test_fast_fall_stops_above_obstacle() {
        let mut world = Fixture::new(10, 1);
        world.place(0, 0, "sand");
        world.place(3, 0, "stone");
        world.grid.get_mut(0, 0).unwrap().vy = 5.0;

        world.step(&mut TestRng::new(true));

        assert_eq!(world.name_at(2, 0), Some("sand"));
        assert_eq!(world.name_at(3, 0), Some("stone"));
    }

    #[test]
    fn test_solid_rests_on_floor() {
        let mut world = Fixture::new(3, 3);
        world.place(2, 1, "sand");
        world.grid.get_mut(2, 1).unwrap().vy = 1.5;

        world.step(&mut TestRng::new(true));

        assert_eq!(world.name_at(2, 1), Some("sand"));
        assert_eq!(world.grid.get(2, 1).unwrap().vy, 0.0);
    }

    #[test]
    fn test_solid_topples_left_first() {
        let mut world = Fixture::new(3, 3);
        world.place(2, 1, "stone");
        world.place(1, 1, "sand");

        world.step(&mut TestRng::new(false));

        assert_eq!(world.name_at(1, 1), None);
        let p = world.grid.get(1, 0).unwrap();
        assert_eq!(p.vx, -TOPPLE_VX);
        assert_eq!(p.vy, TOPPLE_VY);
    }

    #[test]
    fn test_solid_topples_right_when_left_supported() {
        let mut world = Fixture::new(3, 3);
        world.place(2, 0, "stone");
        world.place(2, 1, "stone");
        world.place(1, 1, "sand");

        world.step(&mut TestRng::new(true));

        assert_eq!(world.name_at(1, 2), Some("sand"));
        assert_eq!(world.grid.get(1, 2).unwrap().vx, TOPPLE_VX);
    }

    #[test]
    fn test_solid_rests_on_flat_surface() {
        let mut world = Fixture::new(3, 3);
        for c in 0..3 {
            world.place(2, c, "stone");
        }
        world.place(1, 1, "sand");

        world.step(&mut TestRng::new(true));

        assert_eq!(world.name_at(1, 1), Some("sand"));
        assert_eq!(world.grid.get(1, 1).unwrap().vy, 0.0);
    }

    #[test]
    fn test_static_solid_never_moves() {
        let mut world = Fixture::new(5, 1);
        world.place(0, 0, "stone");

        for _ in 0..10 {
            world.step(&mut TestRng::new(true));
        }
        assert_eq!(world.name_at(0, 0), Some("stone"));
    }

    #[test]
    fn test_sand_sinks_through_water() {
        let mut world = Fixture::new(2, 1);
        world.place(0, 0, "sand");
        world.place(1, 0, "water");

        let stats = world.step(&mut TestRng::new(true));

        assert_eq!(world.name_at(1, 0), Some("sand"));
        assert_eq!(world.name_at(0, 0), Some("water"));
        assert_eq!(stats.moves, 1);
    }

    #[test]
    fn test_liquid_flows_in_random_direction() {
        let mut world = Fixture::new(1, 3);
        world.place(0, 1, "water");
        world.step(&mut TestRng::new(true));
        assert_eq!(world.name_at(0, 0), Some("water"));

        let mut world = Fixture::new(1, 3);
        world.place(0, 1, "water");
        world.step(&mut TestRng::new(false));
        assert_eq!(world.name_at(0, 2), Some("water"));
    }

    #[test]
    fn test_liquid_tries_other_side() {
        let mut world = Fixture::new(1, 3);
        world.place(0, 0, "stone");
        world.place(0, 1, "water");

        // Prefers left, which is taken
        world.step(&mut TestRng::new(true));
        assert_eq!(world.name_at(0, 2), Some("water"));
    }

    #[test]
    fn test_liquid_boxed_in_rests() {
        let mut world = Fixture::new(1, 3);
        world.place(0, 0, "stone");
        world.place(0, 1, "water");
        world.place(0, 2, "stone");
        world.grid.get_mut(0, 1).unwrap().vy = 0.7;

        world.step(&mut TestRng::new(true));

        assert_eq!(world.name_at(0, 1), Some("water"));
        assert_eq!(world.grid.get(0, 1).unwrap().vy, 0.0);
    }

    #[test]
    fn test_moved_particle_processed_once() {
        let mut world = Fixture::new(1, 6);
        world.place(0, 0, "water");

        // Flows right; without the updated flag it would be revisited along the row
        world.step(&mut TestRng::new(false));

        assert_eq!(world.name_at(0, 1), Some("water"));
        assert_eq!(world.grid.count(), 1);
    }

    #[test]
    fn test_gas_moves_to_chosen_cell() {
        // index 1 = up-left
        let mut world = Fixture::new(3, 3);
        world.place(1, 1, "smoke");
        world.step(&mut TestRng::with_index(1));
        assert_eq!(world.name_at(0, 0), Some("smoke"));

        // index 4 = right
        let mut world = Fixture::new(3, 3);
        world.place(1, 1, "smoke");
        world.step(&mut TestRng::with_index(4));
        assert_eq!(world.name_at(1, 2), Some("smoke"));
    }

    #[test]
    fn test_gas_stays_when_chosen_cell_blocked() {
        let mut world = Fixture::new(3, 3);
        world.place(1, 1, "smoke");
        world.place(0, 1, "stone");

        world.step(&mut TestRng::with_index(0));
        assert_eq!(world.name_at(1, 1), Some("smoke"));

        // Out of bounds upward
        let mut world = Fixture::new(3, 3);
        world.place(0, 1, "steam");
        world.step(&mut TestRng::with_index(0));
        assert_eq!(world.name_at(0, 1), Some("steam"));
    }

    #[test]
    fn test_fire_burns_out_after_lifetime() {
        let mut world = Fixture::new(3, 3);
        world.place(1, 1, "fire");
        world.grid.get_mut(1, 1).unwrap().lifetime = 3;

        world.step(&mut TestRng::new(true));
        world.step(&mut TestRng::new(true));
        assert_eq!(world.name_at(1, 1), Some("fire"));
        assert_eq!(world.grid.get(1, 1).unwrap().lifetime, 1);

        let stats = world.step(&mut TestRng::new(true));
        assert_eq!(world.name_at(1, 1), None);
        assert_eq!(stats.extinguished, 1);
    }

    #[test]
    fn test_fire_ignites_flammable_neighbors() {
        let mut world = Fixture::new(3, 3);
        world.place(1, 1, "fire");
        world.place(0, 1, "wood");
        world.place(1, 0, "wood");
        world.place(1, 2, "stone");

        let stats = world.step(&mut TestRng::new(true));

        assert_eq!(world.name_at(0, 1), Some("fire"));
        assert_eq!(world.name_at(1, 0), Some("fire"));
        assert_eq!(world.name_at(1, 2), Some("stone"));
        assert_eq!(stats.ignitions, 2);

        // Fresh fire starts at the full lifetime and isn't aged on its first tick
        let lifetime = world.materials.by_name("fire").unwrap().initial_lifetime;
        assert_eq!(world.grid.get(0, 1).unwrap().lifetime, lifetime);
    }

    #[test]
    fn test_fire_spreads_one_cell_per_tick() {
        let mut world = Fixture::new(5, 1);
        for r in 0..4 {
            world.place(r, 0, "wood");
        }
        world.place(4, 0, "fire");

        world.step(&mut TestRng::new(true));
        assert_eq!(world.name_at(3, 0), Some("fire"));
        assert_eq!(world.name_at(2, 0), Some("wood"));
    }

    #[test]
    fn test_explosive_detonates_on_countdown() {
        let mut world = Fixture::new(9, 9);
        for r in 0..9 {
            for c in 0..9 {
                world.place(r, c, "stone");
            }
        }
        world.place(4, 4, "tnt");
        world.grid.get_mut(4, 4).unwrap().countdown = 2;

        world.step(&mut TestRng::new(true));
        assert_eq!(world.grid.count(), 81);

        let stats = world.step(&mut TestRng::new(true));
        assert_eq!(stats.detonations, 1);
        // Outer ring survives
        assert_eq!(world.grid.count(), 81 - 49);
        assert_eq!(world.name_at(0, 0), Some("stone"));
        assert_eq!(world.name_at(4, 4), None);
    }

    #[test]
    fn test_blast_does_not_chain() {
        let mut world = Fixture::new(1, 10);
        world.place(0, 0, "tnt");
        world.place(0, 2, "tnt");
        world.grid.get_mut(0, 0).unwrap().countdown = 1;

        let stats = world.step(&mut TestRng::new(true));
        assert_eq!(stats.detonations, 1);
        assert_eq!(world.grid.count(), 0);
    }

    #[test]
    fn test_adjacency_reaction_converts_both() {
        let mut world = Fixture::new(1, 2);
        world.place(0, 0, "water");
        world.place(0, 1, "fire");

        let stats = world.step(&mut TestRng::new(true));

        assert_eq!(world.name_at(0, 0), Some("steam"));
        assert_eq!(world.name_at(0, 1), Some("steam"));
        assert_eq!(stats.reactions, 1);
    }

    #[test]
    fn test_reaction_rules_read_before_replacement() {
        let defs = vec![
            MaterialDef {
                name: "a".to_string(),
                weight: Some(0.0),
                reactions: vec![Reaction::new("b", Some("r")), Reaction::new("c", Some("s"))],
                ..Default::default()
            },
            MaterialDef {
                name: "b".to_string(),
                weight: Some(0.0),
                ..Default::default()
            },
            MaterialDef {
                name: "c".to_string(),
                weight: Some(0.0),
                ..Default::default()
            },
            MaterialDef {
                name: "r".to_string(),
                weight: Some(0.0),
                ..Default::default()
            },
            MaterialDef {
                name: "s".to_string(),
                weight: Some(0.0),
                ..Default::default()
            },
        ];
        let mut world = Fixture {
            grid: Grid::new(1, 3),
            materials: Materials::load(defs).unwrap(),
            table: ReactionTable::empty(),
        };
        world.place(0, 1, "a");
        world.place(0, 0, "b");
        world.place(0, 2, "c");

        world.step(&mut TestRng::new(true));

        // Left neighbor matched first, then the right one still matched a's rules
        assert_eq!(world.name_at(0, 0), Some("r"));
        assert_eq!(world.name_at(0, 2), Some("s"));
        assert_eq!(world.name_at(0, 1), Some("s"));
    }

    #[test]
    fn test_sand_landing_on_lava_vitrifies() {
        let mut world = Fixture::new(3, 1);
        world.place(0, 0, "sand");
        world.place(2, 0, "lava");
        world.grid.get_mut(0, 0).unwrap().vy = 0.95;

        world.step(&mut TestRng::new(true));

        assert_eq!(world.name_at(1, 0), Some("glass"));
        assert_eq!(world.name_at(2, 0), Some("lava"));
    }

    #[test]
    fn test_sand_on_lava_vitrifies_instead_of_sinking() {
        let mut world = Fixture::new(2, 1);
        world.place(0, 0, "sand");
        world.place(1, 0, "lava");

        world.step(&mut TestRng::new(true));

        assert_eq!(world.name_at(0, 0), Some("glass"));
        assert_eq!(world.name_at(1, 0), Some("lava"));
    }

    #[test]
    fn test_water_on_lava_quenches() {
        let mut world = Fixture::new(2, 1);
        world.place(0, 0, "water");
        world.place(1, 0, "lava");

        world.step(&mut TestRng::new(true));

        assert_eq!(world.name_at(0, 0), Some("stone"));
        assert_eq!(world.name_at(1, 0), Some("lava"));
    }

    #[test]
    fn test_acid_dissolves_solid_below() {
        let mut world = Fixture::new(3, 1);
        world.place(0, 0, "acid");
        world.place(1, 0, "stone");
        world.place(2, 0, "stone");

        let stats = world.step(&mut TestRng::new(true));
        assert_eq!(stats.dissolved, 1);
        assert_eq!(world.name_at(0, 0), Some("acid"));
        assert_eq!(world.name_at(1, 0), None);

        // Falls into the hole once it has picked up speed, eating the next block
        for _ in 0..20 {
            world.step(&mut TestRng::new(true));
        }
        assert_eq!(world.name_at(2, 0), Some("acid"));
        assert_eq!(world.grid.count(), 1);
    }

    #[test]
    fn test_boundary_cells_are_safe() {
        let mut world = Fixture::new(4, 4);
        let names = ["sand", "water", "smoke", "fire", "tnt", "acid"];
        let mut i = 0;
        for r in 0..4 {
            for c in 0..4 {
                if r == 0 || r == 3 || c == 0 || c == 3 {
                    world.place(r, c, names[i % names.len()]);
                    i += 1;
                }
            }
        }

        for index in 0..5 {
            world.step(&mut TestRng::with_index(index));
        }
        assert!(world.grid.count() <= 12);
    }

    #[test]
    fn test_noop_stats_step() {
        let mut grid = Grid::new(4, 4);
        let materials = Materials::new();
        let table = ReactionTable::new();
        let sand = materials.id_of("sand").unwrap();
        grid.set(0, 0, Some(Particle::spawn(sand, materials.get(sand))));

        CellularAutomataUpdater::step(
            &mut grid,
            &materials,
            &table,
            &mut NoopStats,
            &mut TestRng::new(true),
        );
        assert!(grid.get(1, 0).is_some());
    }
}
