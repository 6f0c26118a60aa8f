// Module declarations
pub mod blocking;
pub mod comparisons;
pub mod normalize;
pub mod scorer;
pub mod weights;

// Re-export the scoring entry points
pub use blocking::{candidate_pairs, BlockingRule, DEFAULT_BLOCKING_RULES};
pub use scorer::{score_pair, score_pairs, DEFAULT_PROBABILITY_FLOOR};
pub use weights::MatchWeights;

/// Tracing target for pair scoring
pub const TARGET_MATCH: &str = "match_scoring";
