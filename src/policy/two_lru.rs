use super::{Decision, DecisionPolicy};
use crate::chunk::IncomingUnit;
use crate::error::BuildError;
use crate::recency::LruStore;
use crate::rng::CacheRng;
use crate::store::ContentStore;

/// 2-LRU meta-caching: a small identifier-only name cache gates admission
/// into the main store. A unit is admitted only when its id is already in the
/// name cache (i.e. it has been seen recently); otherwise the id is recorded
/// there and the unit itself is rejected. One-hit wonders thus never displace
/// resident content.
///
/// The name cache is policy-private state, so recording an id during
/// `decide` does not touch the main store.
#[derive(Debug)]
pub struct TwoLru {
  name_cache: LruStore,
}

impl TwoLru {
  /// `name_cache_capacity` is the number of identifiers the name cache
  /// holds. Zero would make the gate reject forever, so it is a
  /// configuration error.
  pub fn new(name_cache_capacity: usize) -> Result<Self, BuildError> {
    if name_cache_capacity == 0 {
      return Err(BuildError::ZeroNameCacheCapacity);
    }
    Ok(Self {
      name_cache: LruStore::new(name_cache_capacity, false),
    })
  }
}

impl DecisionPolicy for TwoLru {
  fn name(&self) -> &'static str {
    "two_lru"
  }

  fn decide(
    &mut self,
    unit: &IncomingUnit,
    _store: &dyn ContentStore,
    rng: &mut dyn CacheRng,
  ) -> Decision {
    let key = unit.id.strip_representation();
    if self.name_cache.touch(key) {
      tracing::trace!(id = ?key, "name cache hit, admitting into main store");
      Decision::Admit {
        annotation: unit.cost.map(super::CostAnnotation),
      }
    } else {
      self.name_cache.store(&IncomingUnit::without_cost(key), rng);
      Decision::Reject
    }
  }
}
