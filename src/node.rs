use core::fmt;

use crate::chunk::{ChunkId, IncomingUnit};
use crate::metrics::{MetricsSnapshot, NodeMetrics, ObjectStats};
use crate::policy::{Decision, DecisionPolicy};
use crate::recency::RecencyAccess;
use crate::rng::NodeRng;
use crate::store::ContentStore;

/// The composition root of a cache node: one content store, one decision
/// policy, the outcome counters, and the node's pseudo-random source.
///
/// Built through [`CacheNodeBuilder`](crate::builder::CacheNodeBuilder).
/// Ownership is strictly per-node; every operation runs to completion before
/// the next event is processed.
pub struct CacheNode {
  store: Box<dyn ContentStore>,
  policy: Box<dyn DecisionPolicy>,
  metrics: NodeMetrics,
  rng: NodeRng,
}

// Manual Debug implementation: the store and policy are trait objects.
impl fmt::Debug for CacheNode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("CacheNode")
      .field("store", &self.store.kind())
      .field("capacity", &self.store.capacity())
      .field("occupied_slots", &self.store.occupied_slots())
      .field("policy", &self.policy.name())
      .finish_non_exhaustive()
  }
}

impl CacheNode {
  pub(crate) fn new(
    store: Box<dyn ContentStore>,
    policy: Box<dyn DecisionPolicy>,
    metrics: NodeMetrics,
    rng: NodeRng,
  ) -> Self {
    Self {
      store,
      policy,
      metrics,
      rng,
    }
  }

  /// Looks up an interest's content id in the local store, refreshing
  /// recency on a hit and accounting hit/miss statistics. Returns whether
  /// the content was resident.
  pub fn handle_interest(&mut self, id: ChunkId) -> bool {
    let key = id.strip_representation();
    let hit = self.store.touch(key);
    if hit {
      self.metrics.record_hit(key.object_id());
    } else {
      self.metrics.record_miss(key.object_id());
    }
    hit
  }

  /// Routes an incoming data unit through the decision policy and, on an
  /// admit, performs the physical insert followed by the post-insertion
  /// annotation step. Returns whether the unit is resident afterwards.
  ///
  /// A unit that is already resident only refreshes its recency; no
  /// admit/reject decision is consumed.
  pub fn handle_data(&mut self, unit: &IncomingUnit) -> bool {
    let key = unit.id.strip_representation();
    if self.store.contains(key) {
      self.store.touch(key);
      return true;
    }

    match self.policy.decide(unit, self.store.as_ref(), &mut self.rng) {
      Decision::Admit { annotation } => {
        self.metrics.record_admit();
        self.store.store(unit, &mut self.rng);
        self.policy.after_insertion(self.store.as_mut(), annotation);
        true
      }
      Decision::Reject => {
        self.metrics.record_reject();
        false
      }
    }
  }

  /// The store's recency accessors, when the discipline has them.
  pub fn recency(&self) -> Option<&dyn RecencyAccess> {
    self.store.recency()
  }

  /// Presence check without statistics or recency side effects.
  pub fn is_resident(&self, id: ChunkId) -> bool {
    self.store.contains(id.strip_representation())
  }

  pub fn occupied_slots(&self) -> usize {
    self.store.occupied_slots()
  }

  pub fn capacity(&self) -> usize {
    self.store.capacity()
  }

  /// The policy's acceptance-ratio adjustment term (0 for variants without
  /// ratio control).
  pub fn correction_factor(&self) -> f64 {
    self.policy.correction_factor()
  }

  pub fn metrics(&self) -> MetricsSnapshot {
    self.metrics.snapshot()
  }

  pub fn object_stats(&self, object_id: u32) -> Option<ObjectStats> {
    self.metrics.object_stats(object_id)
  }

  /// Clears all statistics, e.g. at the start of a measurement window.
  pub fn clear_metrics(&mut self) {
    self.metrics.clear();
  }
}
