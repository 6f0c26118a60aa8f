use anyhow::{bail, Result};
use tracing::info;

use crate::clustering::{cluster_at_thresholds, summarize, RunReport};
use crate::db::{cluster, records, Database};
use crate::matching::{score_pairs, MatchWeights, DEFAULT_BLOCKING_RULES, DEFAULT_PROBABILITY_FLOOR};

/// Check that seeded raw data is available.
pub async fn check_raw_data(db: &Database) -> Result<bool> {
    let count = records::count_person_records(db).await?;
    info!("Found {} records in person_records", count);
    Ok(count > 0)
}

/// Score and cluster everything in the database, persisting one assignment
/// set per threshold.
pub async fn resolve_records(
    db: &Database,
    weights: &MatchWeights,
    thresholds: &[f64],
) -> Result<RunReport> {
    let people = records::fetch_person_records(db).await?;
    let edges = score_pairs(
        &people,
        &DEFAULT_BLOCKING_RULES,
        weights,
        DEFAULT_PROBABILITY_FLOOR,
    );

    let identifiers = people.iter().map(|record| record.unique_id).collect();
    let runs = cluster_at_thresholds(&identifiers, &edges, thresholds)?;

    let mut summaries = Vec::with_capacity(runs.len());
    for run in &runs {
        cluster::replace_cluster_assignments(db, run).await?;
        summaries.push(summarize(run));
    }

    Ok(RunReport {
        total_records: people.len(),
        scored_edges: edges.len(),
        summaries,
    })
}

/// Verify persisted results: every record assigned exactly once per
/// threshold.
pub async fn validate_results(db: &Database, thresholds: &[f64]) -> Result<()> {
    let total = records::count_person_records(db).await?;

    for &threshold in thresholds {
        let (assigned, clusters) = cluster::assignment_stats(db, threshold).await?;
        info!(
            "Threshold {}: {} assignments across {} clusters",
            threshold, assigned, clusters
        );
        if assigned != total {
            bail!(
                "Validation failed at threshold {}: {} assignments for {} records",
                threshold,
                assigned,
                total
            );
        }
    }

    info!("Validation successful");
    Ok(())
}

/// The daily resolution job: check raw data, resolve, validate.
pub async fn run_daily_pipeline(
    db: &Database,
    weights: &MatchWeights,
    thresholds: &[f64],
) -> Result<RunReport> {
    if !check_raw_data(db).await? {
        bail!("No rows in person_records; seed the database first");
    }

    let report = resolve_records(db, weights, thresholds).await?;
    validate_results(db, thresholds).await?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::db::records::insert_person_records;
    use crate::records::generate_demo_records;

    #[tokio::test]
    async fn pipeline_runs_end_to_end() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pipeline.db");
        let db = Database::new(path.to_str().unwrap()).await.unwrap();

        let records = generate_demo_records(80, 9);
        insert_person_records(&db, &records).await.unwrap();

        let thresholds = [0.95, 0.8];
        let report = run_daily_pipeline(&db, &MatchWeights::default(), &thresholds)
            .await
            .unwrap();

        assert_eq!(report.total_records, 80);
        assert_eq!(report.summaries.len(), 2);
        for summary in &report.summaries {
            // Totality: one assignment per record at every threshold
            assert_eq!(summary.total_records, 80);
        }

        // The stricter threshold never has fewer clusters
        assert!(report.summaries[0].total_clusters >= report.summaries[1].total_clusters);
    }

    #[tokio::test]
    async fn pipeline_refuses_an_empty_database() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.db");
        let db = Database::new(path.to_str().unwrap()).await.unwrap();

        let result = run_daily_pipeline(&db, &MatchWeights::default(), &[0.9]).await;
        assert!(result.is_err());
    }
}
