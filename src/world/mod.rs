//! World - the particle grid and its per-tick simulation

mod ca_update;
mod grid;
mod particle;
pub mod rng_trait;
mod snapshot;
pub mod stats;
#[allow(clippy::module_inception)]
mod world;

pub use ca_update::CellularAutomataUpdater;
pub use grid::Grid;
pub use particle::{particle_flags, Particle};
pub use rng_trait::WorldRng;
pub use snapshot::{CellView, GridSnapshot};
pub use stats::{NoopStats, SimStats, TickStats};
pub use world::Sandbox;
