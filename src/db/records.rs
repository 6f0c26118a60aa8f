use anyhow::Result;
use sqlx::Row;
use tracing::info;

use crate::records::PersonRecord;
use crate::TARGET_DB;

use super::core::Database;

/// Batch-insert person records, skipping ids already present.
///
/// # Arguments
/// * `db` - Database handle
/// * `records` - Records to insert
///
/// # Returns
/// * `Ok(inserted)` - Number of rows actually written
/// * `Err` - If there was an error during insertion
pub async fn insert_person_records(db: &Database, records: &[PersonRecord]) -> Result<u64> {
    let mut tx = db.pool().begin().await?;
    let mut inserted = 0u64;

    for record in records {
        let result = sqlx::query(
            r#"
            INSERT INTO person_records (unique_id, first_name, surname, dob, city, email, cluster)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (unique_id) DO NOTHING
            "#,
        )
        .bind(record.unique_id)
        .bind(record.first_name.as_deref())
        .bind(record.surname.as_deref())
        .bind(record.dob.as_deref())
        .bind(record.city.as_deref())
        .bind(record.email.as_deref())
        .bind(record.cluster)
        .execute(&mut *tx)
        .await?;
        inserted += result.rows_affected();
    }

    tx.commit().await?;
    info!(
        target: TARGET_DB,
        "Inserted {} of {} person records",
        inserted,
        records.len()
    );
    Ok(inserted)
}

/// Number of seeded person records.
pub async fn count_person_records(db: &Database) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM person_records")
        .fetch_one(db.pool())
        .await?;
    Ok(row.get("count"))
}

/// Fetch every person record, ordered by id.
pub async fn fetch_person_records(db: &Database) -> Result<Vec<PersonRecord>> {
    let rows = sqlx::query(
        r#"
        SELECT unique_id, first_name, surname, dob, city, email, cluster
        FROM person_records
        ORDER BY unique_id
        "#,
    )
    .fetch_all(db.pool())
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| PersonRecord {
            unique_id: row.get("unique_id"),
            first_name: row.get("first_name"),
            surname: row.get("surname"),
            dob: row.get("dob"),
            city: row.get("city"),
            email: row.get("email"),
            cluster: row.get("cluster"),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::records::generate_demo_records;

    #[tokio::test]
    async fn insert_fetch_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::new(path.to_str().unwrap()).await.unwrap();

        let records = generate_demo_records(25, 5);
        let inserted = insert_person_records(&db, &records).await.unwrap();
        assert_eq!(inserted, 25);
        assert_eq!(count_person_records(&db).await.unwrap(), 25);

        let fetched = fetch_person_records(&db).await.unwrap();
        assert_eq!(fetched, records);
    }

    #[tokio::test]
    async fn reseeding_skips_existing_ids() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::new(path.to_str().unwrap()).await.unwrap();

        let records = generate_demo_records(10, 5);
        insert_person_records(&db, &records).await.unwrap();
        let inserted_again = insert_person_records(&db, &records).await.unwrap();

        assert_eq!(inserted_again, 0);
        assert_eq!(count_person_records(&db).await.unwrap(), 10);
    }
}
