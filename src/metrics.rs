use std::collections::HashMap;

/// Per-object hit/miss tally, kept for objects inside the tracked prefix of
/// the catalog.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ObjectStats {
  pub hits: u64,
  pub misses: u64,
}

impl ObjectStats {
  pub fn rate(&self) -> f64 {
    let total = self.hits + self.misses;
    if total == 0 {
      0.0
    } else {
      self.hits as f64 / total as f64
    }
  }
}

/// Counters a cache node accumulates: lookup hits/misses and admit/reject
/// decision outcomes. All counters are monotone and reset only by
/// [`NodeMetrics::clear`] (e.g. at the start of a statistics window).
///
/// The core is single-threaded, so these are plain integers.
#[derive(Debug)]
pub struct NodeMetrics {
  hits: u64,
  misses: u64,
  admits: u64,
  rejects: u64,
  /// Objects with id below this bound get per-object tallies; 0 disables.
  tracked_objects: u32,
  per_object: HashMap<u32, ObjectStats>,
}

impl NodeMetrics {
  pub fn new(tracked_objects: u32) -> Self {
    Self {
      hits: 0,
      misses: 0,
      admits: 0,
      rejects: 0,
      tracked_objects,
      per_object: HashMap::new(),
    }
  }

  pub fn record_hit(&mut self, object_id: u32) {
    self.hits += 1;
    if object_id < self.tracked_objects {
      self.per_object.entry(object_id).or_default().hits += 1;
    }
  }

  pub fn record_miss(&mut self, object_id: u32) {
    self.misses += 1;
    if object_id < self.tracked_objects {
      self.per_object.entry(object_id).or_default().misses += 1;
    }
  }

  pub fn record_admit(&mut self) {
    self.admits += 1;
  }

  pub fn record_reject(&mut self) {
    self.rejects += 1;
  }

  pub fn object_stats(&self, object_id: u32) -> Option<ObjectStats> {
    self.per_object.get(&object_id).copied()
  }

  /// Resets every counter, including the per-object tallies.
  pub fn clear(&mut self) {
    self.hits = 0;
    self.misses = 0;
    self.admits = 0;
    self.rejects = 0;
    self.per_object.clear();
  }

  /// Point-in-time snapshot with the derived ratios the reporting
  /// collaborator consumes at end of run.
  pub fn snapshot(&self) -> MetricsSnapshot {
    let lookups = self.hits + self.misses;
    let decisions = self.admits + self.rejects;
    MetricsSnapshot {
      hits: self.hits,
      misses: self.misses,
      hit_ratio: if lookups == 0 {
        0.0
      } else {
        self.hits as f64 / lookups as f64
      },
      admits: self.admits,
      rejects: self.rejects,
      decision_ratio: if decisions == 0 {
        0.0
      } else {
        self.admits as f64 / decisions as f64
      },
    }
  }
}

/// A point-in-time copy of a node's counters and derived ratios.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsSnapshot {
  pub hits: u64,
  pub misses: u64,
  pub hit_ratio: f64,
  pub admits: u64,
  pub rejects: u64,
  /// `admits / (admits + rejects)`, 0 when no decisions were made.
  pub decision_ratio: f64,
}
