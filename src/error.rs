use thiserror::Error;

/// Errors that can occur when building a cache node.
///
/// All of these are configuration or programming mistakes: they abort
/// construction and are never retried or defaulted away.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BuildError {
  /// The node was configured with a capacity of zero slots.
  #[error("cache capacity cannot be zero")]
  ZeroCapacity,

  /// The 2-LRU meta-cache was configured with a zero-slot name cache.
  #[error("name cache capacity cannot be zero")]
  ZeroNameCacheCapacity,

  /// The decision-policy name did not match any known variant.
  #[error("unknown decision policy {0:?}")]
  UnknownPolicy(String),

  /// A policy that requires a numeric suffix was given none
  /// (e.g. `fix` instead of `fix0.01`).
  #[error("decision policy {policy:?} requires a numeric parameter, e.g. {example:?}")]
  MissingParameter {
    policy: &'static str,
    example: &'static str,
  },

  /// A policy suffix was present but did not parse as a number.
  #[error("malformed numeric parameter {value:?} for decision policy {policy:?}")]
  MalformedParameter { policy: &'static str, value: String },

  /// The target acceptance ratio for ratio control must lie in (0, 1].
  #[error("target acceptance ratio {0} is outside (0, 1]")]
  InvalidAcceptanceRatio(f64),

  /// The renewal probability for the cost-aware tail policy must lie in [0, 1].
  #[error("renewal probability xi={0} is outside [0, 1]")]
  InvalidRenewalProbability(f64),

  /// The cost-aware tail policy needs the catalog's popularity shape, which
  /// the content-distribution provider supplies once at initialization.
  #[error("decision policy {0:?} requires a catalog alpha")]
  MissingCatalogAlpha(&'static str),

  /// The selected policy requires a store capability (least/most-recently-used
  /// accessors) the selected replacement discipline does not expose.
  #[error("decision policy {policy:?} requires a recency-ordered store, but the {store:?} store has no recency accessors")]
  IncompatibleStore {
    policy: &'static str,
    store: &'static str,
  },
}
