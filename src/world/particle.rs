//! Particle - the mutable per-cell instance of a material

use serde::{Deserialize, Serialize};

use crate::simulation::{MaterialDef, MaterialId};

/// A single particle in the grid: a material reference plus mutable state
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub material_id: MaterialId,
    /// State flags (updated this tick)
    pub flags: u16,
    /// Ticks left before a fire goes out
    pub lifetime: u32,
    /// Ticks left before an explosive detonates
    pub countdown: u32,
    /// Sideways momentum picked up when toppling
    pub vx: f32,
    /// Accumulated fall speed, in cells per tick
    pub vy: f32,
}

impl Particle {
    /// Bare particle with zeroed timers
    pub fn new(material_id: MaterialId) -> Self {
        Self {
            material_id,
            flags: 0,
            lifetime: 0,
            countdown: 0,
            vx: 0.0,
            vy: 0.0,
        }
    }

    /// Fresh particle with timers taken from the material's defaults
    pub fn spawn(material_id: MaterialId, def: &MaterialDef) -> Self {
        Self {
            lifetime: def.initial_lifetime,
            countdown: def.initial_countdown,
            ..Self::new(material_id)
        }
    }

    #[inline]
    pub fn is_updated(&self) -> bool {
        self.flags & particle_flags::UPDATED != 0
    }

    #[inline]
    pub fn mark_updated(&mut self) {
        self.flags |= particle_flags::UPDATED;
    }

    #[inline]
    pub fn clear_updated(&mut self) {
        self.flags &= !particle_flags::UPDATED;
    }

    /// Same particle, marked as already processed this tick
    #[inline]
    pub fn settled(mut self) -> Self {
        self.mark_updated();
        self
    }
}

/// Flag bits for particle state
pub mod particle_flags {
    pub const UPDATED: u16 = 1 << 0; // Already processed this tick
}
