use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;

/// One scored record pair produced by the pairwise scorer.
///
/// Edges are undirected: `(left, right)` and `(right, left)` describe the
/// same pair. When a pair appears more than once in an edge list, its best
/// probability decides whether the pair merges at a given threshold, so the
/// highest-scoring duplicate wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEdge<I> {
    pub left: I,
    pub right: I,
    pub probability: f64,
}

impl<I> MatchEdge<I> {
    pub fn new(left: I, right: I, probability: f64) -> Self {
        Self {
            left,
            right,
            probability,
        }
    }
}

/// The partition produced by one clustering run.
///
/// `assignments` maps every input identifier to its cluster id, which is the
/// smallest identifier among the cluster's members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdClusters<I: Eq + Hash> {
    pub threshold: f64,
    pub assignments: HashMap<I, I>,
}
