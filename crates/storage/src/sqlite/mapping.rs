use quiz_core::model::{AnswerLog, QuestionItem, QuizId, SessionResult};
use sqlx::Row;

use crate::repository::{StorageError, StoredResult};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn quiz_id_to_i64(id: QuizId) -> Result<i64, StorageError> {
    i64::try_from(id.value()).map_err(|_| StorageError::Serialization("quiz_id overflow".into()))
}

pub(crate) fn quiz_id_from_i64(v: i64) -> Result<QuizId, StorageError> {
    u64::try_from(v)
        .map(QuizId::new)
        .map_err(|_| StorageError::Serialization(format!("invalid quiz_id: {v}")))
}

pub(crate) fn count_to_i64(field: &'static str, v: usize) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

fn count_from_i64(field: &'static str, v: i64) -> Result<usize, StorageError> {
    usize::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn map_result_row(row: &sqlx::sqlite::SqliteRow) -> Result<StoredResult, StorageError> {
    let quiz_id = quiz_id_from_i64(row.try_get::<i64, _>("quiz_id").map_err(ser)?)?;
    let total = count_from_i64("total", row.try_get::<i64, _>("total").map_err(ser)?)?;
    let correct = count_from_i64("correct", row.try_get::<i64, _>("correct").map_err(ser)?)?;
    let wrong = count_from_i64("wrong", row.try_get::<i64, _>("wrong").map_err(ser)?)?;
    let items_json: String = row.try_get("items_json").map_err(ser)?;
    let log_json: String = row.try_get("answer_log_json").map_err(ser)?;
    let stored_at = row.try_get("stored_at").map_err(ser)?;

    let items: Vec<QuestionItem> = serde_json::from_str(&items_json).map_err(ser)?;
    let answer_log: AnswerLog = serde_json::from_str(&log_json).map_err(ser)?;
    let result = SessionResult::from_parts(total, correct, wrong, items, answer_log).map_err(ser)?;

    Ok(StoredResult::new(quiz_id, result, stored_at))
}
