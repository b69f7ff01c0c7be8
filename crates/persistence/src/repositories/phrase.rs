//! Phrase repository for database operations.

use sqlx::SqlitePool;

use crate::entities::PhraseEntity;
use crate::metrics::QueryTimer;
use domain::models::NewPhrase;

/// Repository for phrase-related database operations.
#[derive(Clone)]
pub struct PhraseRepository {
    pool: SqlitePool,
}

impl PhraseRepository {
    /// Creates a new PhraseRepository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List every phrase, newest first.
    pub async fn list_all(&self) -> Result<Vec<PhraseEntity>, sqlx::Error> {
        let timer = QueryTimer::start("list_phrases");
        let result = sqlx::query_as::<_, PhraseEntity>(
            r#"
            SELECT id, title, content, created_at
            FROM phrases
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.finish(result)
    }

    /// Insert one phrase. Id and creation time are assigned by the database.
    pub async fn create(&self, title: &str, content: &str) -> Result<PhraseEntity, sqlx::Error> {
        let timer = QueryTimer::start("create_phrase");
        let result = sqlx::query_as::<_, PhraseEntity>(
            r#"
            INSERT INTO phrases (title, content)
            VALUES (?, ?)
            RETURNING id, title, content, created_at
            "#,
        )
        .bind(title)
        .bind(content)
        .fetch_one(&self.pool)
        .await;
        timer.finish(result)
    }

    /// Append several phrases in one transaction, in the given order.
    ///
    /// Callers filter out incomplete items first. Returns the number of rows
    /// inserted. On error nothing is committed.
    pub async fn create_batch(&self, phrases: &[NewPhrase]) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::start("create_phrases_batch");
        timer.finish(self.insert_all(phrases).await)
    }

    async fn insert_all(&self, phrases: &[NewPhrase]) -> Result<u64, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for phrase in phrases {
            let result = sqlx::query(
                r#"
                INSERT INTO phrases (title, content)
                VALUES (?, ?)
                "#,
            )
            .bind(&phrase.title)
            .bind(&phrase.content)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::warn!(title = %phrase.title, error = %e, "Batch insert failed, rolling back");
                e
            })?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    /// Replace title and content of a phrase.
    /// Returns the number of rows updated (0 when the id is unknown).
    pub async fn update(&self, id: i64, title: &str, content: &str) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::start("update_phrase");
        let result = sqlx::query(
            r#"
            UPDATE phrases SET title = ?, content = ?
            WHERE id = ?
            "#,
        )
        .bind(title)
        .bind(content)
        .bind(id)
        .execute(&self.pool)
        .await;
        Ok(timer.finish(result)?.rows_affected())
    }

    /// Delete a phrase.
    /// Returns the number of rows deleted (0 or 1).
    pub async fn delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::start("delete_phrase");
        let result = sqlx::query(
            r#"
            DELETE FROM phrases WHERE id = ?
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await;
        Ok(timer.finish(result)?.rows_affected())
    }

    /// Count stored phrases.
    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::start("count_phrases");
        let result: Result<(i64,), _> = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM phrases
            "#,
        )
        .fetch_one(&self.pool)
        .await;
        Ok(timer.finish(result)?.0)
    }
}
