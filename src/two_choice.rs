use crate::chunk::{ChunkId, IncomingUnit};
use crate::rng::CacheRng;
use crate::store::{ContentStore, SlotTable};

/// A capacity-bounded store that keeps entries in a flat insertion-order
/// sequence and evicts with the 2-random-sample discipline: sample two
/// resident positions uniformly (with replacement), compare the candidates'
/// object ranks, and evict the higher-ranked (less popular) of the two,
/// breaking exact ties with a coin flip. The evicted slot is overwritten in
/// place by the incoming id.
///
/// Eviction is O(1) and approximates popularity-aware retention without any
/// ranking structure. There is no recency ordering, so this store exposes no
/// recency capability and cannot back the cost-aware tail policy.
#[derive(Debug)]
pub struct TwoChoiceStore {
  table: SlotTable<()>,
  sequence: Vec<ChunkId>,
}

impl TwoChoiceStore {
  pub fn new(capacity: usize, strict: bool) -> Self {
    Self {
      table: SlotTable::new(capacity, strict),
      sequence: Vec::with_capacity(capacity),
    }
  }
}

impl ContentStore for TwoChoiceStore {
  fn kind(&self) -> &'static str {
    "two_choice"
  }

  fn capacity(&self) -> usize {
    self.table.capacity()
  }

  fn occupied_slots(&self) -> usize {
    self.table.occupied_slots()
  }

  fn contains(&self, id: ChunkId) -> bool {
    self.table.contains(id.strip_representation())
  }

  /// No recency tracking: a lookup is just a presence check.
  fn touch(&mut self, id: ChunkId) -> bool {
    self.contains(id)
  }

  fn store(&mut self, unit: &IncomingUnit, rng: &mut dyn CacheRng) {
    let storage = 1; // slots one chunk requires
    let id = unit.id.strip_representation();

    // The incoming id is registered first; when the sequence is at capacity
    // the eviction below releases the victim's slot again.
    self.table.insert(unit.id, (), storage);

    if self.sequence.len() == self.capacity() {
      let pos1 = rng.next_index(self.sequence.len());
      let pos2 = rng.next_index(self.sequence.len());
      let candidate1 = self.sequence[pos1];
      let candidate2 = self.sequence[pos2];

      // Lower object rank = more popular in this catalog model; the less
      // popular candidate is evicted.
      let (victim, pos) = if candidate1.rank() > candidate2.rank() {
        (candidate1, pos1)
      } else if candidate1.rank() == candidate2.rank() {
        if rng.coin() {
          (candidate1, pos1)
        } else {
          (candidate2, pos2)
        }
      } else {
        (candidate2, pos2)
      };

      tracing::trace!(?victim, pos, "2-random-sample eviction");
      self.sequence[pos] = id;
      self.table.remove(victim, storage);
    } else {
      self.sequence.push(id);
    }
  }
}
