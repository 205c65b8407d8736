#![forbid(unsafe_code)]

pub mod app_services;
pub mod config;
pub mod error;
pub mod sessions;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use config::QuizConfig;
pub use error::{AppServicesError, SessionError};
pub use sessions::{
    QuizLoopService, QuizRun, QuizSession, SessionCommand, SessionEvent, SessionKey,
    SessionPhase, SessionProgress, SessionStep, SessionView, StudyList,
};
