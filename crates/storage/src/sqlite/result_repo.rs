use chrono::{DateTime, Utc};
use quiz_core::model::{QuizId, SessionResult};

use super::SqliteRepository;
use super::mapping::{count_to_i64, map_result_row, quiz_id_to_i64, ser};
use crate::repository::{ResultRepository, StorageError, StoredResult};

#[async_trait::async_trait]
impl ResultRepository for SqliteRepository {
    async fn store_result(
        &self,
        quiz_id: QuizId,
        result: &SessionResult,
        stored_at: DateTime<Utc>,
    ) -> Result<StoredResult, StorageError> {
        let items_json = serde_json::to_string(result.items()).map_err(ser)?;
        let log_json = serde_json::to_string(result.answer_log()).map_err(ser)?;

        sqlx::query(
            r"
                INSERT INTO quiz_results (
                    quiz_id, total, correct, wrong, items_json, answer_log_json, stored_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                ON CONFLICT(quiz_id) DO UPDATE SET
                    total = excluded.total,
                    correct = excluded.correct,
                    wrong = excluded.wrong,
                    items_json = excluded.items_json,
                    answer_log_json = excluded.answer_log_json,
                    stored_at = excluded.stored_at
            ",
        )
        .bind(quiz_id_to_i64(quiz_id)?)
        .bind(count_to_i64("total", result.total())?)
        .bind(count_to_i64("correct", result.correct())?)
        .bind(count_to_i64("wrong", result.wrong())?)
        .bind(items_json)
        .bind(log_json)
        .bind(stored_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(StoredResult::new(quiz_id, result.clone(), stored_at))
    }

    async fn get_result(&self, quiz_id: QuizId) -> Result<Option<StoredResult>, StorageError> {
        let row = sqlx::query(
            r"
                SELECT
                    quiz_id, total, correct, wrong, items_json, answer_log_json, stored_at
                FROM quiz_results
                WHERE quiz_id = ?1
            ",
        )
        .bind(quiz_id_to_i64(quiz_id)?)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        row.as_ref().map(map_result_row).transpose()
    }

    async fn clear_result(&self, quiz_id: QuizId) -> Result<bool, StorageError> {
        let res = sqlx::query("DELETE FROM quiz_results WHERE quiz_id = ?1")
            .bind(quiz_id_to_i64(quiz_id)?)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(res.rows_affected() > 0)
    }

    async fn take_result(&self, quiz_id: QuizId) -> Result<Option<StoredResult>, StorageError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let row = sqlx::query(
            r"
                DELETE FROM quiz_results
                WHERE quiz_id = ?1
                RETURNING
                    quiz_id, total, correct, wrong, items_json, answer_log_json, stored_at
            ",
        )
        .bind(quiz_id_to_i64(quiz_id)?)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let stored = row.as_ref().map(map_result_row).transpose()?;
        tx.commit()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(stored)
    }
}
