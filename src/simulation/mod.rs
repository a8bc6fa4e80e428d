//! Simulation data and resolvers - materials, reactions, explosions

pub mod explosion;
mod materials;
pub mod reactions;

pub use explosion::{detonate, BLAST_RADIUS};
pub use materials::{
    default_catalog, MaterialDef, MaterialFlags, MaterialId, Materials, PhysicalClass,
    ResolvedReaction, DEFAULT_LIQUID_WEIGHT, DEFAULT_SOLID_WEIGHT, DEFAULT_TIMER,
};
pub use reactions::{
    Contact, ContactRule, Effect, Reaction, ReactionTable, ResolvedEffect, Selector,
};
