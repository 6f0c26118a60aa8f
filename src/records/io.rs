use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::clustering::ThresholdClusters;

use super::types::PersonRecord;

/// Read person records from a CSV file with the demo dataset header
/// (`unique_id,first_name,surname,dob,city,email,cluster`).
pub fn read_records_csv(path: &Path) -> Result<Vec<PersonRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open records CSV {}", path.display()))?;

    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: PersonRecord =
            row.with_context(|| format!("Malformed record row in {}", path.display()))?;
        records.push(record.tidy());
    }

    info!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Write person records as CSV, creating parent directories as needed.
pub fn write_records_csv(path: &Path, records: &[PersonRecord]) -> Result<()> {
    ensure_parent_dir(path)?;
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create records CSV {}", path.display()))?;

    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Write one threshold's assignments as `(record_id, cluster_id, threshold)`
/// rows, sorted by record id.
pub fn write_assignments_csv(path: &Path, clusters: &ThresholdClusters<i64>) -> Result<()> {
    ensure_parent_dir(path)?;
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create assignments CSV {}", path.display()))?;

    writer.write_record(["record_id", "cluster_id", "threshold"])?;
    let mut rows: Vec<(&i64, &i64)> = clusters.assignments.iter().collect();
    rows.sort();
    for (record_id, cluster_id) in rows {
        writer.write_record([
            record_id.to_string(),
            cluster_id.to_string(),
            clusters.threshold.to_string(),
        ])?;
    }
    writer.flush()?;

    info!(
        "Wrote {} assignments at threshold {} to {}",
        clusters.assignments.len(),
        clusters.threshold,
        path.display()
    );
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn records_round_trip_through_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("people.csv");

        let records = vec![
            PersonRecord {
                unique_id: 1,
                first_name: Some("Ana".into()),
                surname: Some("Silva".into()),
                dob: Some("1990-01-01".into()),
                city: None,
                email: Some("ana@x.com".into()),
                cluster: Some(0),
            },
            PersonRecord {
                unique_id: 2,
                first_name: None,
                surname: Some("Okafor".into()),
                dob: None,
                city: Some("porto".into()),
                email: None,
                cluster: None,
            },
        ];

        write_records_csv(&path, &records).unwrap();
        let read_back = read_records_csv(&path).unwrap();
        assert_eq!(read_back, records);
    }

    #[test]
    fn assignments_csv_has_the_expected_shape() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("clusters.csv");

        let clusters = ThresholdClusters {
            threshold: 0.9,
            assignments: HashMap::from([(2, 1), (1, 1), (3, 3)]),
        };
        write_assignments_csv(&path, &clusters).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = raw.lines().collect();
        assert_eq!(lines[0], "record_id,cluster_id,threshold");
        assert_eq!(lines[1], "1,1,0.9");
        assert_eq!(lines[2], "2,1,0.9");
        assert_eq!(lines[3], "3,3,0.9");
    }
}
