use anyhow::Result;
use chrono::Utc;
use sqlx::Row;
use tracing::info;

use crate::clustering::ThresholdClusters;
use crate::TARGET_DB;

use super::core::Database;

/// Persist one threshold's assignments, replacing any earlier run at the
/// same threshold.
///
/// # Arguments
/// * `db` - Database handle
/// * `clusters` - Partition to persist
///
/// # Returns
/// * `Ok(written)` - Number of assignment rows written
/// * `Err` - If there was an error during the write
pub async fn replace_cluster_assignments(
    db: &Database,
    clusters: &ThresholdClusters<i64>,
) -> Result<u64> {
    let created_at = Utc::now().to_rfc3339();
    let mut tx = db.pool().begin().await?;

    sqlx::query("DELETE FROM cluster_assignments WHERE threshold = ?")
        .bind(clusters.threshold)
        .execute(&mut *tx)
        .await?;

    let mut rows: Vec<(&i64, &i64)> = clusters.assignments.iter().collect();
    rows.sort();
    for (record_id, cluster_id) in rows {
        sqlx::query(
            r#"
            INSERT INTO cluster_assignments (record_id, cluster_id, threshold, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(*record_id)
        .bind(*cluster_id)
        .bind(clusters.threshold)
        .bind(&created_at)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    let written = clusters.assignments.len() as u64;
    info!(
        target: TARGET_DB,
        "Persisted {} assignments at threshold {}",
        written,
        clusters.threshold
    );
    Ok(written)
}

/// Assignment count and distinct cluster count at a threshold.
pub async fn assignment_stats(db: &Database, threshold: f64) -> Result<(i64, i64)> {
    let row = sqlx::query(
        r#"
        SELECT COUNT(*) AS assigned, COUNT(DISTINCT cluster_id) AS clusters
        FROM cluster_assignments
        WHERE threshold = ?
        "#,
    )
    .bind(threshold)
    .fetch_one(db.pool())
    .await?;

    Ok((row.get("assigned"), row.get("clusters")))
}

/// Thresholds that currently have persisted assignments, strictest first.
pub async fn thresholds_present(db: &Database) -> Result<Vec<f64>> {
    let rows = sqlx::query(
        "SELECT DISTINCT threshold FROM cluster_assignments ORDER BY threshold DESC",
    )
    .fetch_all(db.pool())
    .await?;

    Ok(rows.into_iter().map(|row| row.get("threshold")).collect())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tempfile::tempdir;

    use super::*;

    fn partition(threshold: f64) -> ThresholdClusters<i64> {
        ThresholdClusters {
            threshold,
            assignments: HashMap::from([(1, 1), (2, 1), (3, 3)]),
        }
    }

    // Assignments reference person_records, so the ids must exist first
    async fn seed_ids(db: &Database, ids: &[i64]) {
        for id in ids {
            sqlx::query("INSERT INTO person_records (unique_id) VALUES (?)")
                .bind(*id)
                .execute(db.pool())
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn persisting_twice_replaces_the_run() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::new(path.to_str().unwrap()).await.unwrap();
        seed_ids(&db, &[1, 2, 3]).await;

        replace_cluster_assignments(&db, &partition(0.9)).await.unwrap();
        replace_cluster_assignments(&db, &partition(0.9)).await.unwrap();

        let (assigned, clusters) = assignment_stats(&db, 0.9).await.unwrap();
        assert_eq!(assigned, 3);
        assert_eq!(clusters, 2);
    }

    #[tokio::test]
    async fn runs_at_different_thresholds_coexist() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::new(path.to_str().unwrap()).await.unwrap();
        seed_ids(&db, &[1, 2, 3]).await;

        replace_cluster_assignments(&db, &partition(0.95)).await.unwrap();
        replace_cluster_assignments(&db, &partition(0.8)).await.unwrap();

        assert_eq!(thresholds_present(&db).await.unwrap(), vec![0.95, 0.8]);
    }
}
