use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::{QuizId, SessionResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// A finished-session result as held by the persister.
///
/// Serializes in the camelCase shape a results screen reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredResult {
    pub quiz_id: QuizId,
    pub result: SessionResult,
    pub stored_at: DateTime<Utc>,
}

impl StoredResult {
    #[must_use]
    pub fn new(quiz_id: QuizId, result: SessionResult, stored_at: DateTime<Utc>) -> Self {
        Self {
            quiz_id,
            result,
            stored_at,
        }
    }
}

/// Hand-off slot for finished-session results, one per quiz.
///
/// A result is written once when a session finishes, read by a results view,
/// and cleared when a retry consumes it. Writing again for the same quiz
/// replaces the previous result.
#[async_trait]
pub trait ResultRepository: Send + Sync {
    /// Store the result of a finished session for `quiz_id`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the result cannot be stored.
    async fn store_result(
        &self,
        quiz_id: QuizId,
        result: &SessionResult,
        stored_at: DateTime<Utc>,
    ) -> Result<StoredResult, StorageError>;

    /// Fetch the stored result for `quiz_id`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for backend failures; a missing result is `Ok(None)`.
    async fn get_result(&self, quiz_id: QuizId) -> Result<Option<StoredResult>, StorageError>;

    /// Remove the stored result for `quiz_id`. Returns whether one existed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for backend failures.
    async fn clear_result(&self, quiz_id: QuizId) -> Result<bool, StorageError>;

    /// Read the stored result and clear it.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for backend failures.
    async fn take_result(&self, quiz_id: QuizId) -> Result<Option<StoredResult>, StorageError> {
        let stored = self.get_result(quiz_id).await?;
        if stored.is_some() {
            self.clear_result(quiz_id).await?;
        }
        Ok(stored)
    }
}

/// In-memory result store for tests and hosts without a database.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    results: Arc<Mutex<HashMap<QuizId, StoredResult>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResultRepository for InMemoryRepository {
    async fn store_result(
        &self,
        quiz_id: QuizId,
        result: &SessionResult,
        stored_at: DateTime<Utc>,
    ) -> Result<StoredResult, StorageError> {
        let stored = StoredResult::new(quiz_id, result.clone(), stored_at);
        let mut guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(quiz_id, stored.clone());
        Ok(stored)
    }

    async fn get_result(&self, quiz_id: QuizId) -> Result<Option<StoredResult>, StorageError> {
        let guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&quiz_id).cloned())
    }

    async fn clear_result(&self, quiz_id: QuizId) -> Result<bool, StorageError> {
        let mut guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.remove(&quiz_id).is_some())
    }

    async fn take_result(&self, quiz_id: QuizId) -> Result<Option<StoredResult>, StorageError> {
        let mut guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.remove(&quiz_id))
    }
}

/// Repositories behind trait objects so backends can be swapped.
#[derive(Clone)]
pub struct Storage {
    pub results: Arc<dyn ResultRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            results: Arc::new(InMemoryRepository::new()),
        }
    }
}
