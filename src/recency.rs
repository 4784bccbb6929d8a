use generational_arena::{Arena, Index};

use crate::chunk::{ChunkId, IncomingUnit};
use crate::rng::CacheRng;
use crate::store::{ContentStore, SlotTable, UNSET_COST};

/// A least- or most-recently-used position as seen by a decision policy:
/// the resident id plus its cost annotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecencyEntry {
  pub id: ChunkId,
  pub cost: f64,
}

/// The capability a recency-ordered store exposes to decision policies:
/// read the tail (LRU) and head (MRU) positions, and overwrite the head's
/// cost in the post-insertion step.
///
/// This replaces a downcast to a concrete store type: the builder checks the
/// capability once at construction and fails fast if it is absent.
pub trait RecencyAccess {
  fn lru_entry(&self) -> Option<RecencyEntry>;

  fn mru_entry(&self) -> Option<RecencyEntry>;

  /// Overwrites the most-recently-used entry's cost annotation. No-op on an
  /// empty store.
  fn set_mru_cost(&mut self, cost: f64);
}

#[derive(Debug)]
struct Node {
  id: ChunkId,
  cost: f64,
  next: Option<Index>,
  prev: Option<Index>,
}

/// An arena-backed doubly-linked list ordered by recency. Head is the
/// most-recently-used entry, tail the least-recently-used. Key-to-node
/// resolution lives in the surrounding store's slot table, not here.
#[derive(Debug)]
pub struct RecencyList {
  nodes: Arena<Node>,
  head: Option<Index>,
  tail: Option<Index>,
}

impl RecencyList {
  pub fn new() -> Self {
    Self {
      nodes: Arena::new(),
      head: None,
      tail: None,
    }
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  // Unlinks a node from its neighbors without touching the arena.
  fn unlink(&mut self, index: Index) {
    let node = &self.nodes[index];
    let prev_idx = node.prev;
    let next_idx = node.next;

    if let Some(prev) = prev_idx {
      self.nodes[prev].next = next_idx;
    } else {
      self.head = next_idx;
    }

    if let Some(next) = next_idx {
      self.nodes[next].prev = prev_idx;
    } else {
      self.tail = prev_idx;
    }
  }

  fn link_front(&mut self, index: Index) {
    let old_head = self.head;
    self.nodes[index].next = old_head;
    self.nodes[index].prev = None;
    self.head = Some(index);

    if let Some(old_head) = old_head {
      self.nodes[old_head].prev = Some(index);
    }
    if self.tail.is_none() {
      self.tail = Some(index);
    }
  }

  /// Inserts a new entry at the most-recently-used position.
  pub fn push_front(&mut self, id: ChunkId, cost: f64) -> Index {
    let index = self.nodes.insert(Node {
      id,
      cost,
      next: None,
      prev: None,
    });
    self.link_front(index);
    index
  }

  pub fn move_to_front(&mut self, index: Index) {
    if self.head != Some(index) {
      self.unlink(index);
      self.link_front(index);
    }
  }

  /// Removes and returns the least-recently-used entry.
  pub fn pop_back(&mut self) -> Option<(ChunkId, f64)> {
    let tail = self.tail?;
    self.unlink(tail);
    let node = self.nodes.remove(tail)?;
    Some((node.id, node.cost))
  }

  pub fn front(&self) -> Option<RecencyEntry> {
    self.entry_at(self.head)
  }

  pub fn back(&self) -> Option<RecencyEntry> {
    self.entry_at(self.tail)
  }

  fn entry_at(&self, index: Option<Index>) -> Option<RecencyEntry> {
    index.and_then(|idx| self.nodes.get(idx)).map(|node| RecencyEntry {
      id: node.id,
      cost: node.cost,
    })
  }

  pub fn set_front_cost(&mut self, cost: f64) {
    if let Some(head) = self.head {
      self.nodes[head].cost = cost;
    }
  }

  #[cfg(test)]
  fn ids_mru_to_lru(&self) -> Vec<ChunkId> {
    let mut ids = Vec::with_capacity(self.nodes.len());
    let mut cursor = self.head;
    while let Some(idx) = cursor {
      ids.push(self.nodes[idx].id);
      cursor = self.nodes[idx].next;
    }
    ids
  }
}

/// A recency-ordered content store: slot table for lookup and occupancy,
/// recency list for ordering. A full store evicts its LRU entry to make room.
#[derive(Debug)]
pub struct LruStore {
  table: SlotTable<Index>,
  list: RecencyList,
}

impl LruStore {
  pub fn new(capacity: usize, strict: bool) -> Self {
    Self {
      table: SlotTable::new(capacity, strict),
      list: RecencyList::new(),
    }
  }
}

impl ContentStore for LruStore {
  fn kind(&self) -> &'static str {
    "lru"
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

  fn touch(&mut self, id: ChunkId) -> bool {
    let key = id.strip_representation();
    match self.table.get(key).copied() {
      Some(index) => {
        self.list.move_to_front(index);
        true
      }
      None => false,
    }
  }

  fn store(&mut self, unit: &IncomingUnit, _rng: &mut dyn CacheRng) {
    let storage = 1; // slots one chunk occupies

    if self.table.is_full() {
      if let Some((victim, _)) = self.list.pop_back() {
        tracing::trace!(?victim, "evicting least-recently-used entry");
        self.table.remove(victim, storage);
      }
    }

    let index = self
      .list
      .push_front(unit.id.strip_representation(), unit.cost.unwrap_or(UNSET_COST));
    self.table.insert(unit.id, index, storage);
  }

  fn recency(&self) -> Option<&dyn RecencyAccess> {
    Some(self)
  }

  fn recency_mut(&mut self) -> Option<&mut dyn RecencyAccess> {
    Some(self)
  }
}

impl RecencyAccess for LruStore {
  fn lru_entry(&self) -> Option<RecencyEntry> {
    self.list.back()
  }

  fn mru_entry(&self) -> Option<RecencyEntry> {
    self.list.front()
  }

  fn set_mru_cost(&mut self, cost: f64) {
    self.list.set_front_cost(cost);
  }
}
