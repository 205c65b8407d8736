use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

use quiz_core::model::{QuestionBank, QuizId};
use quiz_core::selector::{CategoryPicker, Selection};
use quiz_storage::repository::{InMemoryRepository, ResultRepository, StoredResult};

use super::input::{SessionCommand, SessionKey};
use super::phase::{SessionEvent, SessionPhase};
use super::service::QuizSession;
use super::view::SessionView;
use crate::Clock;
use crate::error::SessionError;

/// Outcome of one input applied through [`QuizLoopService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStep {
    pub view: SessionView,
    pub finished: bool,
    /// Whether the finished result has reached the persister.
    pub result_persisted: bool,
}

/// Everything one quiz screen holds: the bank, the category picker and the
/// running session, if any.
///
/// Without a session the run is in `SelectingCategory`.
#[derive(Debug, Clone)]
pub struct QuizRun {
    quiz_id: QuizId,
    bank: Arc<QuestionBank>,
    picker: CategoryPicker,
    session: Option<QuizSession>,
}

impl QuizRun {
    #[must_use]
    pub fn new(quiz_id: QuizId, bank: Arc<QuestionBank>) -> Self {
        Self {
            quiz_id,
            bank,
            picker: CategoryPicker::new(),
            session: None,
        }
    }

    #[must_use]
    pub fn quiz_id(&self) -> QuizId {
        self.quiz_id
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    #[must_use]
    pub fn picker(&self) -> &CategoryPicker {
        &self.picker
    }

    pub fn picker_mut(&mut self) -> &mut CategoryPicker {
        &mut self.picker
    }

    #[must_use]
    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.session
            .as_ref()
            .map_or(SessionPhase::SelectingCategory, QuizSession::phase)
    }

    #[must_use]
    pub fn view(&self) -> SessionView {
        self.session
            .as_ref()
            .map_or_else(SessionView::selecting_category, QuizSession::view)
    }

    /// Drop the running session without recording a result and go back to
    /// category selection.
    pub fn abandon(&mut self) {
        if let Some(session) = self.session.take() {
            session.abandon();
        }
    }
}

/// Orchestrates session start, input handling and result hand-off.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    results: Arc<dyn ResultRepository>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, results: Arc<dyn ResultRepository>) -> Self {
        Self { clock, results }
    }

    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::new(clock, Arc::new(InMemoryRepository::new()))
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Start a session over the categories in `selection`, replacing any
    /// session already running.
    ///
    /// The quiz's stored result belongs to the session being replaced and is
    /// cleared.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptySelection` if the selection yields no
    /// questions and `SessionError::Storage` if the stored result cannot be
    /// cleared; in both cases the run is left unchanged.
    pub async fn start_session(
        &self,
        run: &mut QuizRun,
        selection: &Selection,
    ) -> Result<SessionView, SessionError> {
        let session = QuizSession::from_selection(&run.bank, selection)?;
        if self.results.clear_result(run.quiz_id).await? {
            debug!(quiz_id = %run.quiz_id, "previous result cleared");
        }
        run.session = Some(session);
        Ok(run.view())
    }

    /// Start a session over the categories checked in the run's picker.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptySelection` if nothing is checked or the
    /// checked categories hold no questions, and `SessionError::Storage` as
    /// for [`QuizLoopService::start_session`].
    pub async fn start_from_picker(&self, run: &mut QuizRun) -> Result<SessionView, SessionError> {
        let selection = run.picker.confirm()?;
        self.start_session(run, &selection).await
    }

    /// Apply one input and hand the result to the persister on `Finished`.
    ///
    /// A persister failure is logged and reported through
    /// `SessionStep::result_persisted`; the transition itself stands.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoActiveSession` without a session, and the
    /// transition's own error if the input is not legal right now.
    pub async fn apply(
        &self,
        run: &mut QuizRun,
        command: SessionCommand,
    ) -> Result<SessionStep, SessionError> {
        let quiz_id = run.quiz_id;
        let session = run.session.as_mut().ok_or(SessionError::NoActiveSession)?;
        session.apply(&command)?;

        if session.is_complete() && session.persisted_at().is_none() {
            if let Err(err) = self.persist(quiz_id, session).await {
                warn!(%quiz_id, error = %err, "failed to store session result");
            }
        }
        Ok(Self::step(session))
    }

    /// Apply a key press; unbound keys and keys illegal in the current phase
    /// are ignored and yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoActiveSession` without a session.
    pub async fn handle_key(
        &self,
        run: &mut QuizRun,
        key: SessionKey,
    ) -> Result<Option<SessionStep>, SessionError> {
        let session = run.session.as_ref().ok_or(SessionError::NoActiveSession)?;
        let Some(command) = session.command_for_key(key) else {
            return Ok(None);
        };
        match self.apply(run, command).await {
            Ok(step) => Ok(Some(step)),
            Err(err) => {
                debug!(?key, error = %err, "key ignored");
                Ok(None)
            }
        }
    }

    /// # Errors
    ///
    /// See [`QuizLoopService::apply`].
    pub async fn reveal(&self, run: &mut QuizRun) -> Result<SessionStep, SessionError> {
        self.apply(run, SessionCommand::Reveal).await
    }

    /// # Errors
    ///
    /// See [`QuizLoopService::apply`].
    pub async fn assess(&self, run: &mut QuizRun, knew_it: bool) -> Result<SessionStep, SessionError> {
        self.apply(run, SessionCommand::Assess(knew_it)).await
    }

    /// # Errors
    ///
    /// See [`QuizLoopService::apply`].
    pub async fn select_option(
        &self,
        run: &mut QuizRun,
        option: &str,
    ) -> Result<SessionStep, SessionError> {
        self.apply(run, SessionCommand::SelectOption(option.to_owned()))
            .await
    }

    /// # Errors
    ///
    /// See [`QuizLoopService::apply`].
    pub async fn confirm(&self, run: &mut QuizRun) -> Result<SessionStep, SessionError> {
        self.apply(run, SessionCommand::Confirm).await
    }

    /// # Errors
    ///
    /// See [`QuizLoopService::apply`].
    pub async fn advance(&self, run: &mut QuizRun) -> Result<SessionStep, SessionError> {
        self.apply(run, SessionCommand::Advance).await
    }

    /// Retry result persistence after a finished session.
    ///
    /// This is useful when the hand-off at `Finished` failed (e.g. transient storage error).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoActiveSession` without a session,
    /// `SessionError::InvalidTransition` if it has not finished, and
    /// `SessionError::Storage` if persistence fails again.
    pub async fn finalize_result(&self, run: &mut QuizRun) -> Result<DateTime<Utc>, SessionError> {
        let quiz_id = run.quiz_id;
        let session = run.session.as_mut().ok_or(SessionError::NoActiveSession)?;
        if let Some(at) = session.persisted_at() {
            return Ok(at);
        }
        if !session.is_complete() {
            return Err(SessionError::InvalidTransition {
                event: SessionEvent::Finalize,
                phase: session.phase(),
            });
        }
        self.persist(quiz_id, session).await
    }

    /// Stored result for a results screen.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ResultNotFound` if nothing is stored for the quiz
    /// and `SessionError::Storage` on repository failures.
    pub async fn results_view(&self, quiz_id: QuizId) -> Result<StoredResult, SessionError> {
        self.results
            .get_result(quiz_id)
            .await?
            .ok_or(SessionError::ResultNotFound(quiz_id))
    }

    /// Start a retry over the wrong items of the last finished session, then
    /// clear the stored result.
    ///
    /// The stored result is the source when the run has no session or its
    /// finished session was stored. A finished session whose result never
    /// reached the persister is retried from its own answers.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` while the run's session is
    /// still in progress, `SessionError::ResultNotFound` if the stored result
    /// is needed and missing, `SessionError::NothingToRetry` if there are no
    /// wrong items (the stored result is kept), and `SessionError::Storage` on
    /// repository failures.
    pub async fn start_retry_from_stored(
        &self,
        run: &mut QuizRun,
    ) -> Result<SessionView, SessionError> {
        let quiz_id = run.quiz_id;
        let retry = match run.session.as_ref() {
            Some(session) if !session.is_complete() => {
                return Err(SessionError::InvalidTransition {
                    event: SessionEvent::Retry,
                    phase: session.phase(),
                });
            }
            Some(session) if session.persisted_at().is_none() => session.start_retry()?,
            session => {
                let stored = self.results_view(quiz_id).await?;
                let previous_attempt = session.map_or(1, QuizSession::attempt);
                QuizSession::retry_from(stored.result.wrong_items(), previous_attempt)?
            }
        };

        self.results.clear_result(quiz_id).await?;
        debug!(%quiz_id, attempt = retry.attempt(), "stored result consumed by retry");
        run.session = Some(retry);
        Ok(run.view())
    }

    async fn persist(
        &self,
        quiz_id: QuizId,
        session: &mut QuizSession,
    ) -> Result<DateTime<Utc>, SessionError> {
        let Some(result) = session.result() else {
            return Err(SessionError::NoActiveSession);
        };
        let stored = self
            .results
            .store_result(quiz_id, result, self.clock.now())
            .await?;
        info!(%quiz_id, score = result.score_percent(), "session result stored");
        session.set_persisted_at(stored.stored_at);
        Ok(stored.stored_at)
    }

    fn step(session: &QuizSession) -> SessionStep {
        SessionStep {
            view: session.view(),
            finished: session.is_complete(),
            result_persisted: session.persisted_at().is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuestionItem;
    use quiz_core::time::fixed_now;

    fn run() -> QuizRun {
        let bank = QuestionBank::new(vec![
            (
                "Geography",
                vec![
                    QuestionItem::open_recall("Capital of France?", "Paris").unwrap(),
                    QuestionItem::open_recall("Capital of Peru?", "Lima").unwrap(),
                ],
            ),
            (
                "Math",
                vec![QuestionItem::multiple_choice("2+2?", "4", ["3", "4", "5"]).unwrap()],
            ),
        ])
        .unwrap();
        QuizRun::new(QuizId::new(1), Arc::new(bank))
    }

    #[tokio::test]
    async fn finishing_stores_result_once() {
        let service = QuizLoopService::in_memory(Clock::fixed(fixed_now()));
        let mut run = run();
        service
            .start_session(&mut run, &Selection::from_names(["Math"]))
            .await
            .unwrap();

        service.select_option(&mut run, "4").await.unwrap();
        let step = service.confirm(&mut run).await.unwrap();
        assert!(!step.finished);
        let step = service.advance(&mut run).await.unwrap();
        assert!(step.finished);
        assert!(step.result_persisted);

        let stored = service.results_view(run.quiz_id()).await.unwrap();
        assert_eq!(stored.result.score_percent(), 100);
        assert_eq!(stored.stored_at, fixed_now());
        assert_eq!(service.finalize_result(&mut run).await.unwrap(), fixed_now());
    }

    #[tokio::test]
    async fn inputs_without_session_are_rejected() {
        let service = QuizLoopService::in_memory(Clock::default());
        let mut run = run();
        assert_eq!(run.phase(), SessionPhase::SelectingCategory);
        assert!(matches!(
            service.reveal(&mut run).await,
            Err(SessionError::NoActiveSession)
        ));
    }

    #[tokio::test]
    async fn picker_drives_session_start() {
        let service = QuizLoopService::in_memory(Clock::default());
        let mut run = run();
        assert!(matches!(
            service.start_from_picker(&mut run).await,
            Err(SessionError::EmptySelection)
        ));
        assert_eq!(run.phase(), SessionPhase::SelectingCategory);

        run.picker_mut().toggle("Math");
        run.picker_mut().toggle("Geography");
        let view = service.start_from_picker(&mut run).await.unwrap();
        assert_eq!(view.prompt.as_deref(), Some("2+2?"));
        assert_eq!(view.total, 3);
    }

    #[tokio::test]
    async fn keys_are_ignored_when_illegal() {
        let service = QuizLoopService::in_memory(Clock::default());
        let mut run = run();
        service
            .start_session(&mut run, &Selection::from_names(["Geography"]))
            .await
            .unwrap();

        assert!(service
            .handle_key(&mut run, SessionKey::ArrowRight)
            .await
            .unwrap()
            .is_none());
        let step = service
            .handle_key(&mut run, SessionKey::Space)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(step.view.phase, SessionPhase::AwaitingSelfAssessment);
    }

    #[tokio::test]
    async fn abandon_returns_to_selection_without_storing() {
        let service = QuizLoopService::in_memory(Clock::default());
        let mut run = run();
        service.start_session(&mut run, &Selection::All).await.unwrap();
        service.reveal(&mut run).await.unwrap();
        service.assess(&mut run, false).await.unwrap();

        run.abandon();
        assert_eq!(run.phase(), SessionPhase::SelectingCategory);
        assert!(matches!(
            service.results_view(run.quiz_id()).await,
            Err(SessionError::ResultNotFound(_))
        ));
    }
}
