//! Level definition and selection

use super::demo_levels::DEMO_LEVELS;
use crate::error::Result;
use crate::world::Sandbox;

/// A named scene and the function that builds it into an empty sandbox
pub struct LevelDef {
    pub name: &'static str,
    pub description: &'static str,
    pub build: fn(&mut Sandbox) -> Result<()>,
}

/// Picks a level out of a fixed table and loads it into a sandbox
pub struct LevelManager {
    levels: &'static [LevelDef],
    current: usize,
}

impl LevelManager {
    /// Manager over the built-in demo levels
    pub fn new() -> Self {
        Self::with_levels(DEMO_LEVELS)
    }

    pub fn with_levels(levels: &'static [LevelDef]) -> Self {
        Self { levels, current: 0 }
    }

    pub fn levels(&self) -> &'static [LevelDef] {
        self.levels
    }

    /// The level most recently loaded (the first one before any load)
    pub fn current(&self) -> Option<&'static LevelDef> {
        self.levels.get(self.current)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Look up a level by name (case-insensitive) or by its index
    pub fn find(&self, key: &str) -> Option<usize> {
        match key.parse::<usize>() {
            Ok(index) => (index < self.levels.len()).then_some(index),
            Err(_) => self
                .levels
                .iter()
                .position(|level| level.name.eq_ignore_ascii_case(key)),
        }
    }

    /// Clear the sandbox and build level `index` into it.
    ///
    /// An index past the table leaves the sandbox and selection untouched.
    pub fn load(&mut self, index: usize, sandbox: &mut Sandbox) -> Result<()> {
        let Some(level) = self.levels.get(index) else {
            log::warn!("No level {} (have {})", index, self.levels.len());
            return Ok(());
        };

        sandbox.clear();
        (level.build)(sandbox)?;
        self.current = index;
        log::info!(
            "Loaded level {} ({}): {} particles",
            index,
            level.name,
            sandbox.particle_count()
        );
        Ok(())
    }
}

impl Default for LevelManager {
    fn default() -> Self {
        Self::new()
    }
}
