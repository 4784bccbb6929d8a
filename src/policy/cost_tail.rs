use super::{CostAnnotation, Decision, DecisionPolicy};
use crate::chunk::IncomingUnit;
use crate::error::BuildError;
use crate::rng::CacheRng;
use crate::store::ContentStore;
use crate::weight::{WeightModel, ZipfCostWeight};

/// Cost-aware probabilistic tail policy.
///
/// While the store has room, everything is admitted. Once it is full, the
/// incoming unit's weight is compared against the weight of the current
/// least-recently-used resident (the entry an admission would displace):
///
/// - strictly heavier → admit, deterministically;
/// - equal or lighter → reject with probability `xi`, admit otherwise.
///
/// A small `xi` renews the cache aggressively whenever a comparison is lost;
/// `xi = 1` turns the policy into a strict better-or-nothing filter, which
/// would freeze the cache around its current occupants were it not for the
/// deterministic branch. Every admit records the unit's retrieval cost, and
/// the post-insertion hook writes that cost onto the most-recently-used
/// position so the next LRU weight computation reads the value belonging to
/// the entry actually occupying the slot.
pub struct CostProbTail {
  xi: f64,
  weight: Box<dyn WeightModel>,
  strict: bool,
}

impl CostProbTail {
  /// Builds the policy with the default Zipf-by-cost weight model.
  ///
  /// `alpha` is the catalog popularity shape the content-distribution
  /// provider supplies once at node initialization. Fails on `xi` outside
  /// `[0, 1]`, a missing alpha, or a store without recency accessors.
  pub fn new(
    xi: f64,
    alpha: Option<f64>,
    store: &dyn ContentStore,
    strict: bool,
  ) -> Result<Self, BuildError> {
    let alpha = alpha.ok_or(BuildError::MissingCatalogAlpha("costprobtail"))?;
    Self::with_weight_model(xi, Box::new(ZipfCostWeight::new(alpha)), store, strict)
  }

  /// Builds the policy with an injected weight model. The comparison
  /// protocol is fixed; only the formula varies.
  pub fn with_weight_model(
    xi: f64,
    weight: Box<dyn WeightModel>,
    store: &dyn ContentStore,
    strict: bool,
  ) -> Result<Self, BuildError> {
    if !(0.0..=1.0).contains(&xi) {
      return Err(BuildError::InvalidRenewalProbability(xi));
    }
    if store.recency().is_none() {
      return Err(BuildError::IncompatibleStore {
        policy: "costprobtail",
        store: store.kind(),
      });
    }
    Ok(Self { xi, weight, strict })
  }

  fn resolve_cost(&self, unit: &IncomingUnit) -> f64 {
    match unit.cost {
      Some(cost) => cost,
      None => {
        if self.strict {
          panic!(
            "consistency error: unit {:?} reached the weight model with an unset retrieval cost",
            unit.id
          );
        }
        0.0
      }
    }
  }
}

impl DecisionPolicy for CostProbTail {
  fn name(&self) -> &'static str {
    "costprobtail"
  }

  fn decide(
    &mut self,
    unit: &IncomingUnit,
    store: &dyn ContentStore,
    rng: &mut dyn CacheRng,
  ) -> Decision {
    // Room left: no victim to compare against.
    if !store.is_full() {
      return Decision::Admit {
        annotation: unit.cost.map(CostAnnotation),
      };
    }

    let cost = self.resolve_cost(unit);
    let w_new = self
      .weight
      .weight(unit.id.strip_representation(), cost);

    // Capability verified at construction.
    let recency = store
      .recency()
      .expect("costprobtail runs only on recency-ordered stores");
    let lru = recency
      .lru_entry()
      .expect("a full recency store has an LRU entry");
    let w_lru = self.weight.weight(lru.id, lru.cost);

    let admit = if w_new > w_lru {
      // Strictly more valuable than the weakest resident; it will displace
      // the LRU entry through the store's normal eviction.
      true
    } else {
      // Probabilistic renewal: rejecting every lost comparison would freeze
      // the cache around its current occupants.
      rng.next_f64() >= self.xi
    };

    tracing::trace!(id = ?unit.id, w_new, w_lru, admit, "tail comparison");

    if admit {
      Decision::Admit {
        annotation: Some(CostAnnotation(cost)),
      }
    } else {
      Decision::Reject
    }
  }

  /// Annotates the freshly inserted entry (now at the MRU position) with the
  /// cost accepted at decision time.
  fn after_insertion(&mut self, store: &mut dyn ContentStore, annotation: Option<CostAnnotation>) {
    let Some(CostAnnotation(cost)) = annotation else {
      if self.strict {
        panic!(
          "consistency error: post-insertion hook ran without an accepted cost; \
           the decision step must record one on every admit"
        );
      }
      return;
    };
    let recency = store
      .recency_mut()
      .expect("costprobtail runs only on recency-ordered stores");
    recency.set_mru_cost(cost);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::chunk::ChunkId;
  use crate::recency::LruStore;
  use crate::rng::NodeRng;
  use crate::two_choice::TwoChoiceStore;

  fn full_store(costs: &[(u32, f64)]) -> LruStore {
    let mut store = LruStore::new(costs.len(), true);
    let mut rng = NodeRng::seeded(0);
    for &(object, cost) in costs {
      store.store(&IncomingUnit::new(ChunkId::new(object, 0), cost), &mut rng);
    }
    store
  }

  #[test]
  fn test_xi_outside_unit_interval_is_rejected() {
    let store = LruStore::new(2, true);
    assert!(matches!(
      CostProbTail::new(1.01, Some(1.0), &store, true),
      Err(BuildError::InvalidRenewalProbability(_))
    ));
    assert!(matches!(
      CostProbTail::new(-0.01, Some(1.0), &store, true),
      Err(BuildError::InvalidRenewalProbability(_))
    ));
    assert!(CostProbTail::new(0.0, Some(1.0), &store, true).is_ok());
    assert!(CostProbTail::new(1.0, Some(1.0), &store, true).is_ok());
  }

  #[test]
  fn test_missing_alpha_is_rejected() {
    let store = LruStore::new(2, true);
    assert!(matches!(
      CostProbTail::new(0.5, None, &store, true),
      Err(BuildError::MissingCatalogAlpha(_))
    ));
  }

  #[test]
  fn test_store_without_recency_accessors_is_rejected() {
    let store = TwoChoiceStore::new(2, true);
    assert!(matches!(
      CostProbTail::new(0.5, Some(1.0), &store, true),
      Err(BuildError::IncompatibleStore {
        policy: "costprobtail",
        store: "two_choice",
      })
    ));
  }

  #[test]
  fn test_admits_unconditionally_while_not_full() {
    let store = LruStore::new(4, true);
    let mut policy = CostProbTail::new(1.0, Some(1.0), &store, true).unwrap();
    let mut rng = NodeRng::seeded(0);

    // xi = 1 would reject every lost comparison, but the store has room.
    let worthless = IncomingUnit::new(ChunkId::new(u32::MAX, 0), 1e-9);
    assert!(policy.decide(&worthless, &store, &mut rng).is_admit());
  }

  #[test]
  fn test_heavier_unit_is_admitted_deterministically() {
    // LRU entry: object 100 at cost 1.0.
    let store = full_store(&[(100, 1.0), (2, 5.0)]);
    let mut policy = CostProbTail::new(1.0, Some(1.0), &store, true).unwrap();
    let mut rng = NodeRng::seeded(0);

    // Object 1 at cost 10.0 outweighs the LRU under any draw.
    let unit = IncomingUnit::new(ChunkId::new(1, 0), 10.0);
    for _ in 0..100 {
      assert!(policy.decide(&unit, &store, &mut rng).is_admit());
    }
  }

  #[test]
  fn test_xi_one_rejects_every_lost_comparison() {
    let store = full_store(&[(1, 10.0), (2, 10.0)]);
    let mut policy = CostProbTail::new(1.0, Some(1.0), &store, true).unwrap();
    let mut rng = NodeRng::seeded(0);

    let unit = IncomingUnit::new(ChunkId::new(500, 0), 0.01);
    for _ in 0..100 {
      assert_eq!(policy.decide(&unit, &store, &mut rng), Decision::Reject);
    }
  }

  #[test]
  fn test_xi_zero_admits_every_lost_comparison() {
    let store = full_store(&[(1, 10.0), (2, 10.0)]);
    let mut policy = CostProbTail::new(0.0, Some(1.0), &store, true).unwrap();
    let mut rng = NodeRng::seeded(0);

    let unit = IncomingUnit::new(ChunkId::new(500, 0), 0.01);
    for _ in 0..100 {
      assert!(policy.decide(&unit, &store, &mut rng).is_admit());
    }
  }

  #[test]
  fn test_admit_records_the_accepted_cost() {
    let store = full_store(&[(100, 1.0), (2, 5.0)]);
    let mut policy = CostProbTail::new(1.0, Some(1.0), &store, true).unwrap();
    let mut rng = NodeRng::seeded(0);

    let unit = IncomingUnit::new(ChunkId::new(1, 0), 10.0);
    match policy.decide(&unit, &store, &mut rng) {
      Decision::Admit { annotation } => assert_eq!(annotation, Some(CostAnnotation(10.0))),
      Decision::Reject => panic!("expected admit"),
    }
  }

  #[test]
  fn test_after_insertion_overwrites_mru_cost() {
    let mut store = full_store(&[(7, 1.0), (8, 2.0)]);
    let mut policy = CostProbTail::new(0.5, Some(1.0), &store, true).unwrap();
    let mut rng = NodeRng::seeded(0);

    store.store(&IncomingUnit::without_cost(ChunkId::new(9, 0)), &mut rng);
    policy.after_insertion(&mut store, Some(CostAnnotation(42.0)));

    let mru = store.recency().unwrap().mru_entry().unwrap();
    assert_eq!(mru.id, ChunkId::new(9, 0));
    assert_eq!(mru.cost, 42.0);
  }

  #[test]
  #[should_panic(expected = "post-insertion hook ran without an accepted cost")]
  fn test_strict_after_insertion_without_annotation_panics() {
    let mut store = full_store(&[(7, 1.0)]);
    let mut policy = CostProbTail::new(0.5, Some(1.0), &store, true).unwrap();
    policy.after_insertion(&mut store, None);
  }

  #[test]
  #[should_panic(expected = "unset retrieval cost")]
  fn test_strict_unset_cost_on_full_store_panics() {
    let store = full_store(&[(7, 1.0), (8, 2.0)]);
    let mut policy = CostProbTail::new(0.5, Some(1.0), &store, true).unwrap();
    let mut rng = NodeRng::seeded(0);
    policy.decide(&IncomingUnit::without_cost(ChunkId::new(9, 0)), &store, &mut rng);
  }
}
