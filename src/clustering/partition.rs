use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

use tracing::debug;

use super::error::InvalidInput;
use super::types::{MatchEdge, ThresholdClusters};
use super::union_find::UnionFind;

/// Partition `identifiers` into clusters of records transitively connected
/// by edges whose match probability meets `threshold`.
///
/// Every identifier lands in exactly one cluster; records touched by no
/// qualifying edge become singletons. The cluster id is the smallest member
/// identifier, so identical inputs always yield identical assignments
/// regardless of edge order. Duplicate edges for the same pair need no
/// special handling: the pair merges iff its best edge clears the threshold.
///
/// # Arguments
/// * `identifiers` - Every record id in scope; must cover all edge endpoints
/// * `edges` - Scored pairs from the pairwise scorer
/// * `threshold` - Match-probability cutoff in [0.0, 1.0]
///
/// # Returns
/// * `Ok(assignments)` - Map from record id to cluster id
/// * `Err(InvalidInput)` - Out-of-range threshold or an edge referencing an
///   unknown id; nothing is clustered in that case
pub fn cluster<I>(
    identifiers: &HashSet<I>,
    edges: &[MatchEdge<I>],
    threshold: f64,
) -> Result<HashMap<I, I>, InvalidInput>
where
    I: Clone + Eq + Hash + Ord + Debug,
{
    validate(identifiers, edges, threshold)?;

    // Dense index per identifier, assigned in id order so that a set's
    // smallest index is also its smallest identifier.
    let mut sorted: Vec<&I> = identifiers.iter().collect();
    sorted.sort();
    let index: HashMap<&I, usize> = sorted
        .iter()
        .enumerate()
        .map(|(position, id)| (*id, position))
        .collect();

    let mut sets = UnionFind::new(sorted.len());
    let mut joined = 0usize;
    for edge in edges {
        if edge.probability >= threshold && edge.left != edge.right {
            sets.union(index[&edge.left], index[&edge.right]);
            joined += 1;
        }
    }
    debug!(
        "{} of {} edges at or above threshold {}",
        joined,
        edges.len(),
        threshold
    );

    // Ascending scan: the first index seen for a root is the smallest
    // member, which becomes the canonical cluster id.
    let mut canonical: HashMap<usize, usize> = HashMap::new();
    for position in 0..sorted.len() {
        let root = sets.find(position);
        canonical.entry(root).or_insert(position);
    }

    let mut assignments = HashMap::with_capacity(sorted.len());
    for position in 0..sorted.len() {
        let root = sets.find(position);
        assignments.insert(
            sorted[position].clone(),
            sorted[canonical[&root]].clone(),
        );
    }

    Ok(assignments)
}

/// Run `cluster` once per threshold, in the order given.
///
/// Runs are fully independent: each starts from a fresh disjoint-set rather
/// than reusing state from a previous threshold, and the inputs are never
/// mutated, so callers may fan the thresholds out across workers.
pub fn cluster_at_thresholds<I>(
    identifiers: &HashSet<I>,
    edges: &[MatchEdge<I>],
    thresholds: &[f64],
) -> Result<Vec<ThresholdClusters<I>>, InvalidInput>
where
    I: Clone + Eq + Hash + Ord + Debug,
{
    thresholds
        .iter()
        .map(|&threshold| {
            cluster(identifiers, edges, threshold).map(|assignments| ThresholdClusters {
                threshold,
                assignments,
            })
        })
        .collect()
}

fn validate<I>(
    identifiers: &HashSet<I>,
    edges: &[MatchEdge<I>],
    threshold: f64,
) -> Result<(), InvalidInput>
where
    I: Clone + Eq + Hash + Ord + Debug,
{
    if !(0.0..=1.0).contains(&threshold) {
        return Err(InvalidInput::ThresholdOutOfRange(threshold));
    }

    for edge in edges {
        if !identifiers.contains(&edge.left) || !identifiers.contains(&edge.right) {
            return Err(InvalidInput::DanglingEdge {
                left: format!("{:?}", edge.left),
                right: format!("{:?}", edge.right),
            });
        }
    }

    Ok(())
}
