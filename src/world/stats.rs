//! Simulation statistics collection

/// Trait for collecting simulation statistics
///
/// The updater records events through this so callers decide whether
/// counting is worth it.
pub trait SimStats {
    /// Record that a particle changed cells (fall, topple, flow, drift, sink)
    fn record_move(&mut self);

    /// Record that a reaction or contact rule transformed particles
    fn record_reaction(&mut self);

    /// Record that fire took over a flammable cell
    fn record_ignition(&mut self);

    /// Record that a fire burned out
    fn record_extinguish(&mut self);

    /// Record that an explosive detonated
    fn record_detonation(&mut self);

    /// Record that a solid was dissolved
    fn record_dissolve(&mut self);
}

/// A no-op implementation for when stats collection is not needed
#[derive(Default)]
pub struct NoopStats;

impl SimStats for NoopStats {
    fn record_move(&mut self) {}
    fn record_reaction(&mut self) {}
    fn record_ignition(&mut self) {}
    fn record_extinguish(&mut self) {}
    fn record_detonation(&mut self) {}
    fn record_dissolve(&mut self) {}
}

/// Event counts for one tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    pub moves: u32,
    pub reactions: u32,
    pub ignitions: u32,
    pub extinguished: u32,
    pub detonations: u32,
    pub dissolved: u32,
}

impl TickStats {
    /// Add another tick's counts to this one
    pub fn accumulate(&mut self, other: &TickStats) {
        self.moves += other.moves;
        self.reactions += other.reactions;
        self.ignitions += other.ignitions;
        self.extinguished += other.extinguished;
        self.detonations += other.detonations;
        self.dissolved += other.dissolved;
    }
}

impl SimStats for TickStats {
    fn record_move(&mut self) {
        self.moves += 1;
    }

    fn record_reaction(&mut self) {
        self.reactions += 1;
    }

    fn record_ignition(&mut self) {
        self.ignitions += 1;
    }

    fn record_extinguish(&mut self) {
        self.extinguished += 1;
    }

    fn record_detonation(&mut self) {
        self.detonations += 1;
    }

    fn record_dissolve(&mut self) {
        self.dissolved += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_stats_all_methods() {
        let mut stats = NoopStats;
        for _ in 0..100 {
            stats.record_move();
            stats.record_reaction();
            stats.record_ignition();
            stats.record_extinguish();
            stats.record_detonation();
            stats.record_dissolve();
        }
    }

    #[test]
    fn test_tick_stats_counts() {
        let mut stats = TickStats::default();

        stats.record_move();
        stats.record_move();
        stats.record_reaction();
        stats.record_detonation();

        assert_eq!(stats.moves, 2);
        assert_eq!(stats.reactions, 1);
        assert_eq!(stats.detonations, 1);
        assert_eq!(stats.ignitions, 0);
    }

    #[test]
    fn test_accumulate() {
        let mut total = TickStats::default();
        let tick = TickStats {
            moves: 3,
            dissolved: 1,
            ..Default::default()
        };
        total.accumulate(&tick);
        total.accumulate(&tick);
        assert_eq!(total.moves, 6);
        assert_eq!(total.dissolved, 2);
    }
}
