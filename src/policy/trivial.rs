use super::{Decision, DecisionPolicy};
use crate::chunk::IncomingUnit;
use crate::rng::CacheRng;
use crate::store::ContentStore;

/// Leave-copy-everywhere: admits every unit.
#[derive(Debug, Default)]
pub struct Always;

impl DecisionPolicy for Always {
  fn name(&self) -> &'static str {
    "lce"
  }

  fn decide(
    &mut self,
    unit: &IncomingUnit,
    _store: &dyn ContentStore,
    _rng: &mut dyn CacheRng,
  ) -> Decision {
    Decision::Admit {
      annotation: unit.cost.map(super::CostAnnotation),
    }
  }
}

/// Admits nothing.
#[derive(Debug, Default)]
pub struct Never;

impl DecisionPolicy for Never {
  fn name(&self) -> &'static str {
    "never"
  }

  fn decide(
    &mut self,
    _unit: &IncomingUnit,
    _store: &dyn ContentStore,
    _rng: &mut dyn CacheRng,
  ) -> Decision {
    Decision::Reject
  }
}
