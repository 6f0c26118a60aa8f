// Module declarations
pub mod error;
pub mod partition;
pub mod summary;
pub mod types;
mod union_find;

// Re-export all types from types module
pub use types::*;

// Re-export key functions from modules
pub use error::InvalidInput;
pub use partition::{cluster, cluster_at_thresholds};
pub use summary::{cluster_sizes, size_histogram, summarize, ClusterSummary, RunReport};

/// Match-probability cutoffs used when the caller configures none
pub const DEFAULT_THRESHOLDS: [f64; 3] = [0.95, 0.90, 0.80];
