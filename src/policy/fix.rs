use super::{Decision, DecisionPolicy};
use crate::chunk::IncomingUnit;
use crate::error::BuildError;
use crate::rng::CacheRng;
use crate::store::ContentStore;

/// Deterministic ratio control: admits with a target frequency, independent
/// of content. A credit accumulator gains `target_ratio` per decision and an
/// admit spends one whole credit, so over `n` decisions exactly
/// `floor(n * target_ratio)` are admitted.
#[derive(Debug)]
pub struct Fix {
  target_ratio: f64,
  credit: f64,
}

impl Fix {
  pub fn new(target_ratio: f64) -> Result<Self, BuildError> {
    if !(target_ratio > 0.0 && target_ratio <= 1.0) {
      return Err(BuildError::InvalidAcceptanceRatio(target_ratio));
    }
    Ok(Self {
      target_ratio,
      credit: 0.0,
    })
  }
}

impl DecisionPolicy for Fix {
  fn name(&self) -> &'static str {
    "fix"
  }

  fn decide(
    &mut self,
    unit: &IncomingUnit,
    _store: &dyn ContentStore,
    _rng: &mut dyn CacheRng,
  ) -> Decision {
    self.credit += self.target_ratio;
    if self.credit >= 1.0 {
      self.credit -= 1.0;
      Decision::Admit {
        annotation: unit.cost.map(super::CostAnnotation),
      }
    } else {
      Decision::Reject
    }
  }

  /// Inverse acceptance frequency, so acceptance-ratio-tracking callers can
  /// de-bias observed admission counts.
  fn correction_factor(&self) -> f64 {
    1.0 / self.target_ratio
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::chunk::ChunkId;
  use crate::recency::LruStore;
  use crate::rng::NodeRng;

  #[test]
  fn test_ratio_must_lie_in_unit_interval() {
    assert!(Fix::new(0.5).is_ok());
    assert!(Fix::new(1.0).is_ok());
    assert!(matches!(
      Fix::new(0.0),
      Err(BuildError::InvalidAcceptanceRatio(_))
    ));
    assert!(matches!(
      Fix::new(-0.1),
      Err(BuildError::InvalidAcceptanceRatio(_))
    ));
    assert!(matches!(
      Fix::new(1.5),
      Err(BuildError::InvalidAcceptanceRatio(_))
    ));
  }

  #[test]
  fn test_admits_at_exactly_the_target_frequency() {
    let mut policy = Fix::new(0.25).unwrap();
    let store = LruStore::new(4, true);
    let mut rng = NodeRng::seeded(0);
    let unit = IncomingUnit::new(ChunkId::new(1, 0), 1.0);

    let admitted = (0..1000)
      .filter(|_| policy.decide(&unit, &store, &mut rng).is_admit())
      .count();
    assert_eq!(admitted, 250);
  }

  #[test]
  fn test_ratio_one_admits_everything() {
    let mut policy = Fix::new(1.0).unwrap();
    let store = LruStore::new(4, true);
    let mut rng = NodeRng::seeded(0);
    let unit = IncomingUnit::new(ChunkId::new(1, 0), 1.0);

    for _ in 0..100 {
      assert!(policy.decide(&unit, &store, &mut rng).is_admit());
    }
  }

  #[test]
  fn test_correction_factor_is_inverse_ratio() {
    let policy = Fix::new(0.2).unwrap();
    assert!((policy.correction_factor() - 5.0).abs() < 1e-12);
  }
}
