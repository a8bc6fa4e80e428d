//! # Sandtick - falling-sand particle simulation
//!
//! A rectangular grid where every cell holds at most one particle of some
//! material. Each tick, particles fall, flow, drift, burn, react and explode
//! according to their material's physical class.

pub mod config;
pub mod error;
pub mod levels;
pub mod simulation;
pub mod world;

pub use config::SandboxConfig;
pub use error::{Result, SandboxError};
pub use world::Sandbox;

/// Common imports for internal use
pub mod prelude {
    pub use crate::simulation::{
        MaterialDef, MaterialFlags, MaterialId, Materials, PhysicalClass, Reaction,
    };
    pub use crate::world::{CellView, GridSnapshot, Particle, Sandbox, TickStats};
    pub use crate::{SandboxConfig, SandboxError};
}
