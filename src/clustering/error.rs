use thiserror::Error;

/// Validation failure detected before any clustering work begins.
///
/// These are the only errors the clustering operations surface; once the
/// inputs pass validation a run cannot fail, and a validation failure aborts
/// the whole call with no partial result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidInput {
    /// The match threshold must be a probability.
    #[error("match threshold {0} is outside [0.0, 1.0]")]
    ThresholdOutOfRange(f64),

    /// An edge referenced a record id missing from the identifier set.
    #[error("edge ({left}, {right}) references a record id missing from the identifier set")]
    DanglingEdge { left: String, right: String },
}
