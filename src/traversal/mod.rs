//! Bounded single-source cost expansion over the road graph.

pub mod engine;

pub use engine::{EdgeCostRecord, GraphTraversalEngine, TraversalResult};
