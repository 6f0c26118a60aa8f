use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use super::types::ThresholdClusters;

/// Aggregate statistics for one clustering run.
#[derive(Debug, Clone, Serialize)]
pub struct ClusterSummary {
    pub threshold: f64,
    pub total_records: usize,
    pub total_clusters: usize,
    pub multi_record_clusters: usize,
    pub singleton_clusters: usize,
    pub largest_cluster_size: usize,
}

/// Top-level report for one resolution run, serialized into `reports/`.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub total_records: usize,
    pub scored_edges: usize,
    pub summaries: Vec<ClusterSummary>,
}

/// Summarize a partition: cluster counts, singletons, the largest cluster.
pub fn summarize<I: Eq + Hash>(clusters: &ThresholdClusters<I>) -> ClusterSummary {
    let sizes = cluster_sizes(&clusters.assignments);
    let multi_record_clusters = sizes.values().filter(|&&members| members > 1).count();

    ClusterSummary {
        threshold: clusters.threshold,
        total_records: clusters.assignments.len(),
        total_clusters: sizes.len(),
        multi_record_clusters,
        singleton_clusters: sizes.len() - multi_record_clusters,
        largest_cluster_size: sizes.values().copied().max().unwrap_or(0),
    }
}

/// Number of members per cluster id.
pub fn cluster_sizes<I: Eq + Hash>(assignments: &HashMap<I, I>) -> HashMap<&I, usize> {
    let mut sizes = HashMap::new();
    for cluster_id in assignments.values() {
        *sizes.entry(cluster_id).or_insert(0) += 1;
    }
    sizes
}

/// Histogram keyed by cluster size: how many clusters have 1 member, 2
/// members, and so on. Sorted for display.
pub fn size_histogram<I: Eq + Hash>(assignments: &HashMap<I, I>) -> BTreeMap<usize, usize> {
    let mut histogram = BTreeMap::new();
    for members in cluster_sizes(assignments).values() {
        *histogram.entry(*members).or_insert(0) += 1;
    }
    histogram
}
