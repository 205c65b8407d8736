use std::path::{Path, PathBuf};

use crate::error::AppServicesError;

/// Environment variable naming the `SQLite` database for stored results.
pub const DB_URL_ENV: &str = "QUIZ_DB_URL";

const MEMORY_URL: &str = "sqlite::memory:";

/// Host configuration for [`crate::AppServices`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizConfig {
    /// Normalized `sqlite://` URL; `None` keeps results in memory.
    pub db_url: Option<String>,
}

impl QuizConfig {
    /// Read configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, treating blank values as unset.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let db_url = lookup(DB_URL_ENV)
            .map(|raw| raw.trim().to_owned())
            .filter(|raw| !raw.is_empty())
            .map(normalize_sqlite_url);
        Self { db_url }
    }

    #[must_use]
    pub fn with_db_url(mut self, raw: impl Into<String>) -> Self {
        self.db_url = Some(normalize_sqlite_url(raw.into()));
        self
    }

    /// Create the database file and its parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::InvalidDbUrl` if the URL has no file path and
    /// `AppServicesError::Io` if the file cannot be created.
    pub fn prepare_database_file(&self) -> Result<(), AppServicesError> {
        let Some(db_url) = self.db_url.as_deref() else {
            return Ok(());
        };
        if db_url == MEMORY_URL {
            return Ok(());
        }
        let path = database_path(db_url)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        if !path.exists() {
            std::fs::OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(false)
                .open(&path)?;
        }
        Ok(())
    }
}

/// Turn `sqlite:relative.db` or a bare path into an absolute `sqlite://` URL.
#[must_use]
pub fn normalize_sqlite_url(raw: String) -> String {
    if raw == MEMORY_URL || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim();
    let path = Path::new(trimmed.strip_prefix("sqlite:").unwrap_or(trimmed));
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn database_path(db_url: &str) -> Result<PathBuf, AppServicesError> {
    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| AppServicesError::InvalidDbUrl(db_url.to_owned()))?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(AppServicesError::InvalidDbUrl(db_url.to_owned()));
    }
    Ok(PathBuf::from(path))
}
