//! Demo levels - prebuilt scenes for the headless runner and benchmarks

pub mod demo_levels;
mod level_def;

pub use level_def::{LevelDef, LevelManager};
