use crate::error::BuildError;
use crate::metrics::NodeMetrics;
use crate::node::CacheNode;
use crate::policy::cost_tail::CostProbTail;
use crate::policy::fix::Fix;
use crate::policy::trivial::{Always, Never};
use crate::policy::two_lru::TwoLru;
use crate::policy::{DecisionPolicy, PolicySpec};
use crate::recency::LruStore;
use crate::rng::NodeRng;
use crate::store::ContentStore;
use crate::two_choice::TwoChoiceStore;
use crate::weight::WeightModel;

/// The replacement discipline backing a node's content store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replacement {
  /// Recency-ordered store; exposes LRU/MRU accessors.
  Lru,
  /// Flat sequence with 2-random-sample popularity-biased eviction.
  TwoChoice,
}

/// A builder for [`CacheNode`] instances.
///
/// ```
/// use ccn_cache::CacheNodeBuilder;
///
/// let node = CacheNodeBuilder::new()
///   .capacity(128)
///   .policy("costprobtail0.3")
///   .catalog_alpha(0.8)
///   .seed(42)
///   .build()
///   .unwrap();
/// assert_eq!(node.capacity(), 128);
/// ```
pub struct CacheNodeBuilder {
  capacity: usize,
  policy: String,
  replacement: Replacement,
  catalog_alpha: Option<f64>,
  weight_model: Option<Box<dyn WeightModel>>,
  name_cache_capacity: usize,
  tracked_objects: u32,
  seed: Option<u64>,
  strict: bool,
}

impl Default for CacheNodeBuilder {
  fn default() -> Self {
    Self {
      capacity: 0,
      policy: "lce".to_owned(),
      replacement: Replacement::Lru,
      catalog_alpha: None,
      weight_model: None,
      name_cache_capacity: 0,
      tracked_objects: 0,
      seed: None,
      strict: cfg!(debug_assertions),
    }
  }
}

impl CacheNodeBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  /// Number of slots the store holds. Must be non-zero.
  pub fn capacity(mut self, capacity: usize) -> Self {
    self.capacity = capacity;
    self
  }

  /// Decision-policy selection by name plus optional numeric suffix:
  /// `lce`/`always`, `never`, `fix0.01`, `two_lru`, `costprobtail0.3`.
  pub fn policy(mut self, policy: &str) -> Self {
    self.policy = policy.to_owned();
    self
  }

  pub fn replacement(mut self, replacement: Replacement) -> Self {
    self.replacement = replacement;
    self
  }

  /// Popularity-shape parameter supplied by the content-distribution
  /// provider. Read once here; immutable for the node's lifetime, and
  /// required by the cost-aware tail policy.
  pub fn catalog_alpha(mut self, alpha: f64) -> Self {
    self.catalog_alpha = Some(alpha);
    self
  }

  /// Overrides the cost-aware tail policy's weight formula. When set,
  /// `catalog_alpha` is not required.
  pub fn weight_model<W: WeightModel + 'static>(mut self, model: W) -> Self {
    self.weight_model = Some(Box::new(model));
    self
  }

  /// Capacity of the 2-LRU name cache. Required (non-zero) for `two_lru`.
  pub fn name_cache_capacity(mut self, capacity: usize) -> Self {
    self.name_cache_capacity = capacity;
    self
  }

  /// Enables per-object hit/miss tallies for objects with id below `bound`.
  pub fn tracked_objects(mut self, bound: u32) -> Self {
    self.tracked_objects = bound;
    self
  }

  /// Seeds the node's random source for deterministic runs.
  pub fn seed(mut self, seed: u64) -> Self {
    self.seed = Some(seed);
    self
  }

  /// Enables the strict invariant checks at the checked API boundaries
  /// (insert, lookup, post-insertion). Defaults to on in debug builds.
  pub fn strict(mut self, strict: bool) -> Self {
    self.strict = strict;
    self
  }

  pub fn build(self) -> Result<CacheNode, BuildError> {
    if self.capacity == 0 {
      return Err(BuildError::ZeroCapacity);
    }

    let spec = PolicySpec::parse(&self.policy)?;

    let store: Box<dyn ContentStore> = match self.replacement {
      Replacement::Lru => Box::new(LruStore::new(self.capacity, self.strict)),
      Replacement::TwoChoice => Box::new(TwoChoiceStore::new(self.capacity, self.strict)),
    };

    let policy: Box<dyn DecisionPolicy> = match spec {
      PolicySpec::Always => Box::new(Always),
      PolicySpec::Never => Box::new(Never),
      PolicySpec::Fix { target_ratio } => Box::new(Fix::new(target_ratio)?),
      PolicySpec::TwoLru => Box::new(TwoLru::new(self.name_cache_capacity)?),
      PolicySpec::CostProbTail { xi } => match self.weight_model {
        Some(model) => {
          Box::new(CostProbTail::with_weight_model(xi, model, store.as_ref(), self.strict)?)
        }
        None => Box::new(CostProbTail::new(
          xi,
          self.catalog_alpha,
          store.as_ref(),
          self.strict,
        )?),
      },
    };

    let rng = match self.seed {
      Some(seed) => NodeRng::seeded(seed),
      None => NodeRng::from_entropy(),
    };

    tracing::debug!(
      capacity = self.capacity,
      policy = policy.name(),
      store = store.kind(),
      strict = self.strict,
      "cache node built"
    );

    Ok(CacheNode::new(
      store,
      policy,
      NodeMetrics::new(self.tracked_objects),
      rng,
    ))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_zero_capacity_is_rejected() {
    let err = CacheNodeBuilder::new().policy("lce").build().unwrap_err();
    assert_eq!(err, BuildError::ZeroCapacity);
  }

  #[test]
  fn test_unknown_policy_is_rejected() {
    let err = CacheNodeBuilder::new()
      .capacity(8)
      .policy("prob_cache")
      .build()
      .unwrap_err();
    assert!(matches!(err, BuildError::UnknownPolicy(_)));
  }

  #[test]
  fn test_cost_tail_requires_recency_store() {
    let err = CacheNodeBuilder::new()
      .capacity(8)
      .policy("costprobtail0.3")
      .catalog_alpha(1.0)
      .replacement(Replacement::TwoChoice)
      .build()
      .unwrap_err();
    assert!(matches!(err, BuildError::IncompatibleStore { .. }));
  }

  #[test]
  fn test_cost_tail_requires_alpha() {
    let err = CacheNodeBuilder::new()
      .capacity(8)
      .policy("costprobtail0.3")
      .build()
      .unwrap_err();
    assert!(matches!(err, BuildError::MissingCatalogAlpha(_)));
  }

  #[test]
  fn test_two_lru_requires_name_cache_capacity() {
    let err = CacheNodeBuilder::new()
      .capacity(8)
      .policy("two_lru")
      .build()
      .unwrap_err();
    assert_eq!(err, BuildError::ZeroNameCacheCapacity);
  }

  #[test]
  fn test_built_node_is_debug_formattable() {
    // Keeps `unwrap_err()` usable on `Result<CacheNode, BuildError>`.
    let node = CacheNodeBuilder::new()
      .capacity(8)
      .policy("lce")
      .build()
      .unwrap();
    let repr = format!("{node:?}");
    assert!(repr.contains("lce"));
    assert!(repr.contains("lru"));
  }

  #[test]
  fn test_valid_configurations_build() {
    for policy in ["lce", "never", "fix0.5"] {
      assert!(CacheNodeBuilder::new().capacity(8).policy(policy).build().is_ok());
    }
    assert!(CacheNodeBuilder::new()
      .capacity(8)
      .policy("two_lru")
      .name_cache_capacity(4)
      .build()
      .is_ok());
    assert!(CacheNodeBuilder::new()
      .capacity(8)
      .policy("costprobtail1.0")
      .catalog_alpha(0.8)
      .replacement(Replacement::Lru)
      .build()
      .is_ok());
  }
}
