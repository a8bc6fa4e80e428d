//! RNG trait abstraction for the sandbox
//!
//! Allows the updater to work with both:
//! - an entropy-seeded generator (the default, runs differ)
//! - a fixed-seed generator or a scripted test double (reproducible runs)

/// Random number generator trait for the cellular automaton
pub trait WorldRng {
    /// Generate random boolean with 50% probability
    fn gen_bool(&mut self) -> bool;

    /// Uniform index in [0, len). `len` must be non-zero.
    fn gen_index(&mut self, len: usize) -> usize;
}

// Blanket implementation for any type implementing rand::Rng
impl<T: ?Sized + rand::Rng> WorldRng for T {
    fn gen_bool(&mut self) -> bool {
        rand::Rng::r#gen(self)
    }

    fn gen_index(&mut self, len: usize) -> usize {
        rand::Rng::gen_range(self, 0..len)
    }
}
