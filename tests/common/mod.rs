use std::collections::VecDeque;

use ccn_cache::chunk::{ChunkId, IncomingUnit};
use ccn_cache::rng::CacheRng;
use ccn_cache::{CacheNode, CacheNodeBuilder};

/// A random source whose draws are fixed up front, so tests can force a
/// specific renewal decision, eviction position pair, or tie-break coin.
/// Drawing past the script is a test bug and panics.
pub struct ScriptedRng {
  f64s: VecDeque<f64>,
  indices: VecDeque<usize>,
  coins: VecDeque<bool>,
}

impl ScriptedRng {
  pub fn new() -> Self {
    Self {
      f64s: VecDeque::new(),
      indices: VecDeque::new(),
      coins: VecDeque::new(),
    }
  }

  pub fn with_indices(positions: &[usize]) -> Self {
    let mut rng = Self::new();
    rng.indices.extend(positions);
    rng
  }

  pub fn push_f64(mut self, value: f64) -> Self {
    self.f64s.push_back(value);
    self
  }

  pub fn push_coin(mut self, value: bool) -> Self {
    self.coins.push_back(value);
    self
  }
}

impl CacheRng for ScriptedRng {
  fn next_f64(&mut self) -> f64 {
    self.f64s.pop_front().expect("scripted rng ran out of f64 draws")
  }

  fn next_index(&mut self, bound: usize) -> usize {
    let index = self
      .indices
      .pop_front()
      .expect("scripted rng ran out of index draws");
    assert!(index < bound, "scripted index {index} out of bound {bound}");
    index
  }

  fn coin(&mut self) -> bool {
    self.coins.pop_front().expect("scripted rng ran out of coins")
  }
}

pub fn unit(object: u32, cost: f64) -> IncomingUnit {
  IncomingUnit::new(ChunkId::new(object, 0), cost)
}

pub fn lce_node(capacity: usize) -> CacheNode {
  CacheNodeBuilder::new()
    .capacity(capacity)
    .policy("lce")
    .seed(1)
    .build()
    .unwrap()
}

pub fn cost_tail_node(capacity: usize, xi: f64, alpha: f64, seed: u64) -> CacheNode {
  CacheNodeBuilder::new()
    .capacity(capacity)
    .policy(&format!("costprobtail{xi}"))
    .catalog_alpha(alpha)
    .seed(seed)
    .strict(true)
    .build()
    .unwrap()
}
