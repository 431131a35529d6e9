//! Processing record repository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::Result;
use crate::database::models::{ProcessingDbModel, ProcessingStatus};
use crate::database::retry::retry_on_sqlite_busy;

/// Processing record repository trait.
#[async_trait]
pub trait ProcessingRepository: Send + Sync {
    /// Insert a record, or replace the live record for the same resource path.
    ///
    /// On conflict the row takes the new record's id, so writes keyed by the
    /// previous id no longer match it. Status goes back to `queued`, any build
    /// URL is cleared and `started_at` is reset.
    async fn upsert_by_path(&self, record: &ProcessingDbModel) -> Result<ProcessingDbModel>;

    async fn find_by_id(&self, id: &str) -> Result<Option<ProcessingDbModel>>;

    async fn find_by_paths(&self, paths: &[String]) -> Result<Vec<ProcessingDbModel>>;

    async fn find_by_paths_and_statuses(
        &self,
        paths: &[String],
        statuses: &[ProcessingStatus],
    ) -> Result<Vec<ProcessingDbModel>>;

    /// Records in any of `statuses`, most recently started first.
    async fn find_by_statuses_ordered(
        &self,
        statuses: &[ProcessingStatus],
    ) -> Result<Vec<ProcessingDbModel>>;

    async fn mark_building(&self, id: &str, build_url: &str) -> Result<()>;

    /// Delete a record. Returns whether a row was removed.
    async fn delete(&self, id: &str) -> Result<bool>;
}

/// SQLx implementation of ProcessingRepository.
pub struct SqlxProcessingRepository {
    pool: SqlitePool,
    write_pool: SqlitePool,
}

impl SqlxProcessingRepository {
    pub fn new(pool: SqlitePool, write_pool: SqlitePool) -> Self {
        Self { pool, write_pool }
    }
}

fn status_list(statuses: &[ProcessingStatus]) -> Result<String> {
    let values: Vec<&str> = statuses.iter().map(|s| s.as_str()).collect();
    Ok(serde_json::to_string(&values)?)
}

#[async_trait]
impl ProcessingRepository for SqlxProcessingRepository {
    async fn upsert_by_path(&self, record: &ProcessingDbModel) -> Result<ProcessingDbModel> {
        retry_on_sqlite_busy("upsert_processing_by_path", || async {
            let row = sqlx::query_as::<_, ProcessingDbModel>(
                r#"
                INSERT INTO processing_records (
                    id, resource_path, job_name, trigger_method, queue_url, build_url, status, started_at
                ) VALUES (?, ?, ?, ?, ?, NULL, 'queued', ?)
                ON CONFLICT(resource_path) DO UPDATE SET
                    id = excluded.id,
                    job_name = excluded.job_name,
                    trigger_method = excluded.trigger_method,
                    queue_url = excluded.queue_url,
                    build_url = NULL,
                    status = 'queued',
                    started_at = excluded.started_at
                RETURNING *
                "#,
            )
            .bind(&record.id)
            .bind(&record.resource_path)
            .bind(&record.job_name)
            .bind(&record.trigger_method)
            .bind(&record.queue_url)
            .bind(record.started_at)
            .fetch_one(&self.write_pool)
            .await?;
            Ok(row)
        })
        .await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ProcessingDbModel>> {
        let record = sqlx::query_as::<_, ProcessingDbModel>(
            "SELECT * FROM processing_records WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    async fn find_by_paths(&self, paths: &[String]) -> Result<Vec<ProcessingDbModel>> {
        if paths.is_empty() {
            return Ok(Vec::new());
        }
        let records = sqlx::query_as::<_, ProcessingDbModel>(
            r#"
            SELECT * FROM processing_records
            WHERE resource_path IN (SELECT value FROM json_each(?))
            "#,
        )
        .bind(serde_json::to_string(paths)?)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    async fn find_by_paths_and_statuses(
        &self,
        paths: &[String],
        statuses: &[ProcessingStatus],
    ) -> Result<Vec<ProcessingDbModel>> {
        if paths.is_empty() || statuses.is_empty() {
            return Ok(Vec::new());
        }
        let records = sqlx::query_as::<_, ProcessingDbModel>(
            r#"
            SELECT * FROM processing_records
            WHERE resource_path IN (SELECT value FROM json_each(?))
              AND status IN (SELECT value FROM json_each(?))
            "#,
        )
        .bind(serde_json::to_string(paths)?)
        .bind(status_list(statuses)?)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    async fn find_by_statuses_ordered(
        &self,
        statuses: &[ProcessingStatus],
    ) -> Result<Vec<ProcessingDbModel>> {
        if statuses.is_empty() {
            return Ok(Vec::new());
        }
        let records = sqlx::query_as::<_, ProcessingDbModel>(
            r#"
            SELECT * FROM processing_records
            WHERE status IN (SELECT value FROM json_each(?))
            ORDER BY started_at DESC
            "#,
        )
        .bind(status_list(statuses)?)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    async fn mark_building(&self, id: &str, build_url: &str) -> Result<()> {
        retry_on_sqlite_busy("mark_processing_building", || async {
            sqlx::query(
                "UPDATE processing_records SET status = 'building', build_url = ? WHERE id = ?",
            )
            .bind(build_url)
            .bind(id)
            .execute(&self.write_pool)
            .await?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        retry_on_sqlite_busy("delete_processing", || async {
            let result = sqlx::query("DELETE FROM processing_records WHERE id = ?")
                .bind(id)
                .execute(&self.write_pool)
                .await?;
            Ok(result.rows_affected() > 0)
        })
        .await
    }
}
