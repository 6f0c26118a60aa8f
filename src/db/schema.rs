use super::core::Database;

impl Database {
    pub(crate) async fn initialize_schema(&self) -> Result<(), sqlx::Error> {
        let mut conn = self.pool().acquire().await?;
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS person_records (
                unique_id INTEGER PRIMARY KEY,
                first_name TEXT,
                surname TEXT,
                dob TEXT,
                city TEXT,
                email TEXT,
                cluster INTEGER
            );
            CREATE INDEX IF NOT EXISTS idx_person_records_surname ON person_records (surname);
            CREATE INDEX IF NOT EXISTS idx_person_records_email ON person_records (email);

            -- Cluster assignments, one row per record per clustering threshold
            CREATE TABLE IF NOT EXISTS cluster_assignments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                record_id INTEGER NOT NULL,
                cluster_id INTEGER NOT NULL,
                threshold REAL NOT NULL,
                created_at TEXT NOT NULL,
                UNIQUE (record_id, threshold),
                FOREIGN KEY (record_id) REFERENCES person_records (unique_id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_cluster_assignments_threshold ON cluster_assignments (threshold);
            CREATE INDEX IF NOT EXISTS idx_cluster_assignments_cluster_id ON cluster_assignments (cluster_id);
            "#,
        )
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}
