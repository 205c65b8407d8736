//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::QuizId;
use quiz_core::selector::EmptySelectionError;
use quiz_storage::repository::StorageError;
use quiz_storage::sqlite::SqliteInitError;

use crate::sessions::{SessionEvent, SessionPhase};

/// Errors emitted by session services.
///
/// Every variant is a rejection of the triggering call: the session state is
/// left exactly as it was before the call.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("category selection yielded no questions")]
    EmptySelection,
    #[error("{event} is not allowed while {phase}")]
    InvalidTransition {
        event: SessionEvent,
        phase: SessionPhase,
    },
    #[error("no option selected")]
    NoSelection,
    #[error("option {0:?} is not one of the current question's options")]
    UnknownOption(String),
    #[error("no wrong answers to retry")]
    NothingToRetry,
    #[error("no session in progress")]
    NoActiveSession,
    #[error("no stored result for quiz {0}")]
    ResultNotFound(QuizId),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<EmptySelectionError> for SessionError {
    fn from(_: EmptySelectionError) -> Self {
        SessionError::EmptySelection
    }
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error("invalid QUIZ_DB_URL value: {0:?}")]
    InvalidDbUrl(String),
    #[error("cannot prepare database file: {0}")]
    Io(#[from] std::io::Error),
}
