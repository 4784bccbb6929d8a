use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// The randomness a cache node consumes: uniform draws for xi-gated renewal,
/// uniform positions for 2-random-sample eviction, and a fair coin for tie
/// breaks.
///
/// Kept as a narrow trait so tests can script the exact draws a decision or
/// an eviction will see.
pub trait CacheRng {
  /// Uniform value in `[0, 1)`.
  fn next_f64(&mut self) -> f64;

  /// Uniform index in `[0, bound)`. `bound` must be non-zero.
  fn next_index(&mut self, bound: usize) -> usize;

  /// Fair coin flip.
  fn coin(&mut self) -> bool {
    self.next_index(2) == 0
  }
}

/// The per-node pseudo-random source. Not cryptographically secure; a fixed
/// seed makes a whole run deterministic.
#[derive(Debug)]
pub struct NodeRng(SmallRng);

impl NodeRng {
  /// Explicitly seeded source, for reproducible runs.
  pub fn seeded(seed: u64) -> Self {
    Self(SmallRng::seed_from_u64(seed))
  }

  /// OS-seeded source.
  pub fn from_entropy() -> Self {
    Self(SmallRng::from_os_rng())
  }
}

impl CacheRng for NodeRng {
  fn next_f64(&mut self) -> f64 {
    self.0.random::<f64>()
  }

  fn next_index(&mut self, bound: usize) -> usize {
    self.0.random_range(0..bound)
  }
}
