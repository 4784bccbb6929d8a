//! Admission and eviction decision core for chunk-level content cache nodes.
//!
//! A [`CacheNode`] routes interest (lookup) and data (store) events through a
//! pluggable [`DecisionPolicy`](policy::DecisionPolicy) sitting on top of a
//! capacity-bounded content store. The crate provides:
//!
//! - **Decision policies**: constant `lce`/`never`, deterministic ratio
//!   control (`fix<ratio>`), 2-LRU meta-caching (`two_lru`), and a cost-aware
//!   probabilistic tail policy (`costprobtail<xi>`) that compares the incoming
//!   unit's desirability against the least-recently-used resident and renews
//!   the cache probabilistically when the comparison is lost.
//! - **Store disciplines**: a recency-ordered [`LruStore`](recency::LruStore)
//!   and a flat-sequence [`TwoChoiceStore`](two_choice::TwoChoiceStore) with
//!   2-random-sample popularity-biased eviction.
//! - **Deterministic randomness**: every node owns a single seedable RNG, so
//!   simulation runs reproduce exactly.
//!
//! The core is single-threaded and synchronous; ownership is strictly
//! per-node. Nothing here locks, blocks, or yields.

pub mod builder;
pub mod chunk;
pub mod error;
pub mod metrics;
pub mod policy;
pub mod recency;
pub mod rng;
pub mod store;
pub mod two_choice;
pub mod weight;

mod node;

pub use builder::{CacheNodeBuilder, Replacement};
pub use chunk::{ChunkId, IncomingUnit};
pub use error::BuildError;
pub use metrics::MetricsSnapshot;
pub use node::CacheNode;
