//! News impact scoring.
//!
//! Combines the external sentiment score with the technical state of the
//! ticker into a [`NewsImpactRecord`](newsflow_core::types::NewsImpactRecord).

mod scorer;

pub use scorer::{ImpactScorer, ImpactWeights};
