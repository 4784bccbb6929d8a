use core::fmt;

/// Number of bits reserved for the chunk number.
const CHUNK_BITS: u64 = 16;
/// Number of bits reserved for the representation mask.
const REPR_BITS: u64 = 16;

const REPR_MASK: u64 = (1 << REPR_BITS) - 1;
const CHUNK_MASK: u64 = ((1 << CHUNK_BITS) - 1) << REPR_BITS;

/// The addressable unit of cached content, packed into a single `u64`:
/// object identifier in the high 32 bits, chunk number in the next 16, and
/// the representation mask in the low 16.
///
/// The object identifier doubles as the catalog rank (lower id = more
/// popular). The representation mask distinguishes alternative encodings of
/// the same object/chunk and must be cleared to zero before the id is used as
/// a cache index; [`ChunkId::strip_representation`] does that.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkId(u64);

impl ChunkId {
  /// Builds an identifier with a zero representation mask.
  pub fn new(object_id: u32, chunk_number: u16) -> Self {
    Self(((object_id as u64) << (CHUNK_BITS + REPR_BITS)) | ((chunk_number as u64) << REPR_BITS))
  }

  /// Builds an identifier carrying a representation mask.
  pub fn with_representation(object_id: u32, chunk_number: u16, representation: u16) -> Self {
    Self(Self::new(object_id, chunk_number).0 | representation as u64)
  }

  pub fn object_id(self) -> u32 {
    (self.0 >> (CHUNK_BITS + REPR_BITS)) as u32
  }

  pub fn chunk_number(self) -> u16 {
    ((self.0 & CHUNK_MASK) >> REPR_BITS) as u16
  }

  pub fn representation_mask(self) -> u16 {
    (self.0 & REPR_MASK) as u16
  }

  /// Returns the id with the representation mask cleared. All slot-table and
  /// recency-list operations index on the stripped id.
  pub fn strip_representation(self) -> Self {
    Self(self.0 & !REPR_MASK)
  }

  /// The catalog rank of the object this chunk belongs to. Rank 0 is clamped
  /// to 1 so it stays usable as the base of a power law.
  pub fn rank(self) -> u32 {
    self.object_id().max(1)
  }
}

impl fmt::Debug for ChunkId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "ChunkId({}/{}#{:x})",
      self.object_id(),
      self.chunk_number(),
      self.representation_mask()
    )
  }
}

/// An incoming content unit presented to a cache node: an identifier plus an
/// optional retrieval cost.
///
/// `cost: None` is the unset sentinel. It is valid for policies that ignore
/// cost, but it must never reach a weight model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncomingUnit {
  pub id: ChunkId,
  pub cost: Option<f64>,
}

impl IncomingUnit {
  pub fn new(id: ChunkId, cost: f64) -> Self {
    Self { id, cost: Some(cost) }
  }

  /// A unit with no retrieval-cost annotation.
  pub fn without_cost(id: ChunkId) -> Self {
    Self { id, cost: None }
  }
}
