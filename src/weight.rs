use crate::chunk::ChunkId;

/// Maps a content identifier and a retrieval cost to a scalar desirability
/// score: higher weight = more valuable to keep cached.
///
/// This is the extension point of the cost-aware tail policy. The comparison
/// protocol (incoming unit vs. least-recently-used resident) is fixed by the
/// policy; only the formula varies. Implementations must be pure and monotone
/// in both estimated popularity and cost.
pub trait WeightModel {
  fn weight(&self, id: ChunkId, cost: f64) -> f64;
}

/// The default weight model: retrieval cost scaled by a Zipf popularity
/// estimate,
///
/// ```text
/// w(id, cost) = cost * rank^(-alpha)
/// ```
///
/// where `rank` is the object identifier (clamped to 1) and `alpha` is the
/// catalog's popularity shape. A popular object (low rank) that was expensive
/// to retrieve scores highest; an unpopular cheap one scores lowest.
#[derive(Debug, Clone, Copy)]
pub struct ZipfCostWeight {
  alpha: f64,
}

impl ZipfCostWeight {
  pub fn new(alpha: f64) -> Self {
    Self { alpha }
  }
}

impl WeightModel for ZipfCostWeight {
  fn weight(&self, id: ChunkId, cost: f64) -> f64 {
    cost * (id.rank() as f64).powf(-self.alpha)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_weight_decreases_with_rank() {
    let model = ZipfCostWeight::new(0.8);
    let popular = model.weight(ChunkId::new(1, 0), 10.0);
    let unpopular = model.weight(ChunkId::new(1000, 0), 10.0);
    assert!(popular > unpopular);
  }

  #[test]
  fn test_weight_increases_with_cost() {
    let model = ZipfCostWeight::new(0.8);
    let id = ChunkId::new(50, 0);
    assert!(model.weight(id, 20.0) > model.weight(id, 10.0));
  }

  #[test]
  fn test_alpha_zero_ignores_popularity() {
    let model = ZipfCostWeight::new(0.0);
    assert_eq!(
      model.weight(ChunkId::new(1, 0), 5.0),
      model.weight(ChunkId::new(999, 0), 5.0)
    );
  }
}
