use std::sync::Arc;

use tracing::info;

use quiz_storage::repository::Storage;

use crate::Clock;
use crate::config::QuizConfig;
use crate::error::AppServicesError;
use crate::sessions::QuizLoopService;

/// Assembles app-facing services over the configured storage.
#[derive(Clone)]
pub struct AppServices {
    storage: Storage,
    quiz_loop: Arc<QuizLoopService>,
}

impl AppServices {
    /// Build services from `config`: `SQLite` when a database URL is set,
    /// in-memory storage otherwise.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the database file or connection cannot be
    /// prepared.
    pub async fn from_config(config: &QuizConfig, clock: Clock) -> Result<Self, AppServicesError> {
        match config.db_url.as_deref() {
            Some(db_url) => {
                config.prepare_database_file()?;
                Self::new_sqlite(db_url, clock).await
            }
            None => {
                info!("no database configured, keeping results in memory");
                Ok(Self::in_memory(clock))
            }
        }
    }

    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::with_storage(storage, clock))
    }

    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::with_storage(Storage::in_memory(), clock)
    }

    #[must_use]
    pub fn with_storage(storage: Storage, clock: Clock) -> Self {
        let quiz_loop = Arc::new(QuizLoopService::new(clock, Arc::clone(&storage.results)));
        Self { storage, quiz_loop }
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }
}
