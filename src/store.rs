use std::collections::HashMap;

use crate::chunk::{ChunkId, IncomingUnit};
use crate::recency::RecencyAccess;
use crate::rng::CacheRng;

/// Sentinel for a cost annotation that has not been set yet. Kept negative so
/// it can never be mistaken for a real (non-negative) retrieval cost.
pub const UNSET_COST: f64 = -1.0;

/// The store discipline a cache node drives: occupancy accounting, lookup,
/// and the physical insert (including any discipline-specific eviction).
///
/// Decision policies read the store through this trait but never mutate it;
/// the node performs the actual insert/evict after the decision.
pub trait ContentStore {
  /// Short discipline name, used in construction-error messages.
  fn kind(&self) -> &'static str;

  fn capacity(&self) -> usize;

  fn occupied_slots(&self) -> usize;

  fn is_full(&self) -> bool {
    self.occupied_slots() == self.capacity()
  }

  /// Mask-stripped presence check with no side effects.
  fn contains(&self, id: ChunkId) -> bool;

  /// Lookup that refreshes recency where the discipline tracks it. Returns
  /// whether the id was resident.
  fn touch(&mut self, id: ChunkId) -> bool;

  /// Physically stores the unit, evicting per the discipline if the store is
  /// full. The admission decision has already been made by the caller.
  fn store(&mut self, unit: &IncomingUnit, rng: &mut dyn CacheRng);

  /// Least/most-recently-used accessors, for stores that order entries by
  /// recency. Policies that need them verify this capability at construction.
  fn recency(&self) -> Option<&dyn RecencyAccess> {
    None
  }

  fn recency_mut(&mut self) -> Option<&mut dyn RecencyAccess> {
    None
  }
}

#[derive(Debug)]
struct Slot<D> {
  /// Representation mask the entry was stored with. The table itself always
  /// indexes on the stripped id.
  repr: u16,
  descr: D,
}

/// The authoritative mapping from content identifier to stored-entry
/// descriptor: one entry per (object id, chunk number), plus occupancy
/// bookkeeping. Ordering is not this table's business.
///
/// `D` is whatever the surrounding store needs to find the entry again (the
/// recency-list index for the LRU store, nothing for the flat two-choice
/// sequence).
#[derive(Debug)]
pub struct SlotTable<D> {
  slots: HashMap<ChunkId, Slot<D>, ahash::RandomState>,
  occupied_slots: usize,
  capacity: usize,
  strict: bool,
}

impl<D> SlotTable<D> {
  pub fn new(capacity: usize, strict: bool) -> Self {
    Self {
      slots: HashMap::default(),
      occupied_slots: 0,
      capacity,
      strict,
    }
  }

  pub fn capacity(&self) -> usize {
    self.capacity
  }

  pub fn occupied_slots(&self) -> usize {
    self.occupied_slots
  }

  pub fn is_full(&self) -> bool {
    self.occupied_slots == self.capacity
  }

  /// Stores a descriptor under the stripped id and accounts for `size` slots.
  ///
  /// In strict mode, inserting over an existing entry whose stored
  /// representation mask is equal or higher is a consistency error: entries
  /// are indexed purely on (object id, chunk number), so such an insert would
  /// silently shadow a better representation.
  pub fn insert(&mut self, id: ChunkId, descr: D, size: usize) {
    let key = id.strip_representation();
    let repr = id.representation_mask();
    if self.strict {
      if let Some(existing) = self.slots.get(&key) {
        if existing.repr >= repr {
          panic!(
            "consistency error: representation {:#06x} of {:?} is already stored; \
             refusing to insert representation {:#06x} over it",
            existing.repr, key, repr
          );
        }
      }
    }
    self.slots.insert(key, Slot { repr, descr });
    self.occupied_slots += size;
  }

  /// Removes the entry (mask stripped first) and releases `size` slots.
  /// Callers own the size bookkeeping and must not double-remove.
  pub fn remove(&mut self, id: ChunkId, size: usize) -> Option<D> {
    let removed = self.slots.remove(&id.strip_representation());
    if removed.is_some() {
      self.occupied_slots -= size;
    }
    removed.map(|slot| slot.descr)
  }

  /// Mask-sensitive lookup: the caller must have stripped the representation
  /// mask already. A non-zero mask here is a usage error, reported in strict
  /// mode.
  pub fn get(&self, id: ChunkId) -> Option<&D> {
    self.check_stripped(id);
    self.slots.get(&id).map(|slot| &slot.descr)
  }

  pub fn contains(&self, id: ChunkId) -> bool {
    self.check_stripped(id);
    self.slots.contains_key(&id)
  }

  fn check_stripped(&self, id: ChunkId) {
    if self.strict && id.representation_mask() != 0 {
      panic!(
        "consistency error: lookup key {:?} must be representation-agnostic \
         (representation mask must be zero)",
        id
      );
    }
  }
}
