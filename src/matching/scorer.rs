use std::collections::HashMap;

use tracing::{debug, info};

use crate::clustering::MatchEdge;
use crate::records::PersonRecord;

use super::blocking::{candidate_pairs, BlockingRule};
use super::comparisons::{
    compare_city, compare_dob, compare_email, compare_first_name, compare_surname,
};
use super::weights::MatchWeights;
use super::TARGET_MATCH;

/// Edges scoring below this floor are dropped from the edge list outright.
/// Clustering applies its own thresholds on top; the floor only keeps clear
/// non-matches from inflating the edge set.
pub const DEFAULT_PROBABILITY_FLOOR: f64 = 0.2;

/// Score every candidate pair under the blocking rules and keep edges at or
/// above `floor`.
///
/// # Arguments
/// * `records` - Input records; `unique_id` must be unique
/// * `rules` - Blocking rules deciding which pairs get scored
/// * `weights` - Field weights combining agreement into a probability
/// * `floor` - Minimum probability for an edge to be kept
///
/// # Returns
/// * Edge list for the cluster builder, smaller id on the left
pub fn score_pairs(
    records: &[PersonRecord],
    rules: &[BlockingRule],
    weights: &MatchWeights,
    floor: f64,
) -> Vec<MatchEdge<i64>> {
    let by_id: HashMap<i64, &PersonRecord> =
        records.iter().map(|record| (record.unique_id, record)).collect();

    let pairs = candidate_pairs(records, rules);
    info!(
        target: TARGET_MATCH,
        "Scoring {} candidate pairs from {} records",
        pairs.len(),
        records.len()
    );

    let mut edges = Vec::new();
    for (left_id, right_id) in pairs {
        let probability = score_pair(by_id[&left_id], by_id[&right_id], weights);
        if probability >= floor {
            edges.push(MatchEdge::new(left_id, right_id, probability));
        }
    }

    info!(
        target: TARGET_MATCH,
        "Kept {} edges at or above probability {:.2}",
        edges.len(),
        floor
    );
    edges
}

/// Match probability for one record pair.
pub fn score_pair(left: &PersonRecord, right: &PersonRecord, weights: &MatchWeights) -> f64 {
    let fields = [
        (
            weights.first_name,
            compare_first_name(left.first_name.as_deref(), right.first_name.as_deref()),
        ),
        (
            weights.surname,
            compare_surname(left.surname.as_deref(), right.surname.as_deref()),
        ),
        (
            weights.dob,
            compare_dob(left.dob.as_deref(), right.dob.as_deref()),
        ),
        (
            weights.city,
            compare_city(left.city.as_deref(), right.city.as_deref()),
        ),
        (
            weights.email,
            compare_email(left.email.as_deref(), right.email.as_deref()),
        ),
    ];

    let probability = weights.combine(&fields);
    debug!(
        target: TARGET_MATCH,
        "Pair ({}, {}) scored {:.4}",
        left.unique_id,
        right.unique_id,
        probability
    );
    probability
}
