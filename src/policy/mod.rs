pub mod cost_tail;
pub mod fix;
pub mod trivial;
pub mod two_lru;

use crate::chunk::IncomingUnit;
use crate::error::BuildError;
use crate::rng::CacheRng;
use crate::store::ContentStore;

/// Cost recorded at decision time, threaded by the node into the
/// post-insertion hook. This is the explicit hand-off between the two phases
/// of an admission: decide, physically insert, annotate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostAnnotation(pub f64);

/// The outcome of an admission decision.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
  Admit { annotation: Option<CostAnnotation> },
  Reject,
}

impl Decision {
  pub fn is_admit(&self) -> bool {
    matches!(self, Decision::Admit { .. })
  }
}

/// A pluggable admission algorithm.
///
/// `decide` is a pure function of the incoming unit and the current store
/// state: it must not mutate the store (policy-private state such as the
/// 2-LRU name cache may change). The node performs the physical insert after
/// an admit and then invokes `after_insertion` with the annotation the
/// decision produced.
pub trait DecisionPolicy {
  /// Configuration name of the variant, for logs and error messages.
  fn name(&self) -> &'static str;

  fn decide(
    &mut self,
    unit: &IncomingUnit,
    store: &dyn ContentStore,
    rng: &mut dyn CacheRng,
  ) -> Decision;

  /// Invoked only after an admit has been carried out by the caller. Default
  /// is a no-op; cost-aware variants propagate the accepted cost into the
  /// freshly inserted entry here.
  fn after_insertion(&mut self, store: &mut dyn ContentStore, annotation: Option<CostAnnotation>) {
    let _ = (store, annotation);
  }

  /// Adjustment term for callers that track acceptance-ratio targets.
  /// Variants without ratio control return the neutral 0.
  fn correction_factor(&self) -> f64 {
    0.0
  }
}

/// A parsed decision-policy selection: variant name plus its numeric
/// parameter where the variant takes one (`fix0.01`, `costprobtail0.3`).
///
/// Parsing rejects unknown names and missing or malformed suffixes; range
/// validation happens in the policy constructors.
#[derive(Debug, Clone, PartialEq)]
pub enum PolicySpec {
  Always,
  Never,
  Fix { target_ratio: f64 },
  TwoLru,
  CostProbTail { xi: f64 },
}

impl PolicySpec {
  pub fn parse(name: &str) -> Result<Self, BuildError> {
    match name {
      "lce" | "always" => return Ok(PolicySpec::Always),
      "never" => return Ok(PolicySpec::Never),
      "two_lru" => return Ok(PolicySpec::TwoLru),
      _ => {}
    }

    if let Some(suffix) = name.strip_prefix("costprobtail") {
      let xi = parse_suffix("costprobtail", "costprobtail0.3", suffix)?;
      return Ok(PolicySpec::CostProbTail { xi });
    }
    if let Some(suffix) = name.strip_prefix("fix") {
      let target_ratio = parse_suffix("fix", "fix0.01", suffix)?;
      return Ok(PolicySpec::Fix { target_ratio });
    }

    Err(BuildError::UnknownPolicy(name.to_owned()))
  }
}

fn parse_suffix(
  policy: &'static str,
  example: &'static str,
  suffix: &str,
) -> Result<f64, BuildError> {
  if suffix.is_empty() {
    return Err(BuildError::MissingParameter { policy, example });
  }
  suffix.parse::<f64>().map_err(|_| BuildError::MalformedParameter {
    policy,
    value: suffix.to_owned(),
  })
}
