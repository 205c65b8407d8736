use chrono::{DateTime, Utc};
use std::fmt;
use tracing::{debug, info};

use quiz_core::evaluator::{evaluate_option, self_assess};
use quiz_core::model::{AnswerLog, AnswerRecord, QuestionBank, QuestionItem, QuestionKind, SessionResult};
use quiz_core::retry::build_retry_subset;
use quiz_core::scorer::score;
use quiz_core::selector::{Selection, select};

use super::input::{SessionCommand, SessionKey};
use super::phase::{SessionEvent, SessionPhase};
use super::progress::SessionProgress;
use super::view::SessionView;
use crate::error::SessionError;

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One pass through an active subset of questions.
///
/// The session owns a snapshot of its questions; the answer log is keyed by
/// positions in that snapshot. A retry builds a new session over the wrong
/// items, renumbered from zero, with a fresh log.
///
/// Every transition either succeeds completely or returns an error and leaves
/// the session untouched.
#[derive(Clone)]
pub struct QuizSession {
    questions: Vec<QuestionItem>,
    cursor: usize,
    log: AnswerLog,
    phase: SessionPhase,
    revealed: bool,
    selected: Option<String>,
    attempt: u32,
    result: Option<SessionResult>,
    persisted_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Start a session over `questions`.
    ///
    /// An empty list yields a session that is already finished with an empty
    /// result; callers that start from a category selection should go through
    /// [`QuizSession::from_selection`] which rejects empty selections instead.
    #[must_use]
    pub fn new(questions: Vec<QuestionItem>) -> Self {
        Self::with_attempt(questions, 1)
    }

    fn with_attempt(questions: Vec<QuestionItem>, attempt: u32) -> Self {
        let mut session = Self {
            questions,
            cursor: 0,
            log: AnswerLog::new(),
            phase: SessionPhase::Answering,
            revealed: false,
            selected: None,
            attempt,
            result: None,
            persisted_at: None,
        };
        if session.questions.is_empty() {
            session.finish();
        }
        session
    }

    /// Start a session from the items a category selection covers.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptySelection` if the selection yields no
    /// questions (empty list, or only unknown / empty categories).
    pub fn from_selection(bank: &QuestionBank, selection: &Selection) -> Result<Self, SessionError> {
        let questions = select(bank, selection);
        if questions.is_empty() {
            return Err(SessionError::EmptySelection);
        }
        info!(%selection, questions = questions.len(), "session started");
        Ok(Self::new(questions))
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == SessionPhase::Finished
    }

    /// Whether the correct answer of the current question is shown.
    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    #[must_use]
    pub fn selected_option(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// 1 for a session started from categories, +1 for every retry.
    #[must_use]
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    #[must_use]
    pub fn questions(&self) -> &[QuestionItem] {
        &self.questions
    }

    #[must_use]
    pub fn answer_log(&self) -> &AnswerLog {
        &self.log
    }

    /// Index of the current question; `None` once finished.
    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        (!self.is_complete()).then_some(self.cursor)
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&QuestionItem> {
        if self.is_complete() {
            None
        } else {
            self.questions.get(self.cursor)
        }
    }

    /// Record for the current question, once it has been graded.
    #[must_use]
    pub fn current_record(&self) -> Option<&AnswerRecord> {
        self.cursor().and_then(|cursor| self.log.get(cursor))
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// 1-based position of the current question (`cursor + 1`).
    #[must_use]
    pub fn position(&self) -> usize {
        if self.is_complete() {
            self.total()
        } else {
            self.cursor + 1
        }
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let answered = self.log.len();
        SessionProgress {
            total: self.total(),
            answered,
            remaining: self.total().saturating_sub(answered),
            position: self.position(),
            is_complete: self.is_complete(),
        }
    }

    /// Result computed at the `Finished` transition.
    #[must_use]
    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn persisted_at(&self) -> Option<DateTime<Utc>> {
        self.persisted_at
    }

    pub(crate) fn set_persisted_at(&mut self, at: DateTime<Utc>) {
        self.persisted_at = Some(at);
    }

    /// Snapshot of everything a UI needs to render the session.
    #[must_use]
    pub fn view(&self) -> SessionView {
        SessionView::from_session(self)
    }

    //
    // ─── TRANSITIONS ───────────────────────────────────────────────────────────
    //

    /// Show the correct answer of an open-recall question.
    ///
    /// Calling it again while the answer is already shown does nothing.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` if the session is finished or
    /// the current question is multiple-choice and not yet confirmed.
    pub fn reveal(&mut self) -> Result<(), SessionError> {
        if self.revealed {
            return Ok(());
        }
        let kind = self.expect_answering(SessionEvent::Reveal)?;
        if kind != QuestionKind::OpenRecall {
            return Err(self.rejected(SessionEvent::Reveal));
        }
        self.revealed = true;
        self.phase = SessionPhase::AwaitingSelfAssessment;
        debug!(cursor = self.cursor, "answer revealed");
        Ok(())
    }

    /// Record whether the user knew the revealed open-recall answer, then
    /// move on to the next question or finish.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless the session is
    /// awaiting a self-assessment.
    pub fn assess(&mut self, knew_it: bool) -> Result<(), SessionError> {
        if self.phase != SessionPhase::AwaitingSelfAssessment {
            return Err(self.rejected(SessionEvent::Assess));
        }
        self.log.record(self.cursor, self_assess(knew_it));
        debug!(cursor = self.cursor, knew_it, "self-assessed");
        self.next_question();
        Ok(())
    }

    /// Pick an option of the current multiple-choice question.
    ///
    /// The pick can be changed any number of times until it is confirmed.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` outside `Answering` or for an
    /// open-recall question, and `SessionError::UnknownOption` if `option` is
    /// not exactly one of the question's options.
    pub fn select_option(&mut self, option: &str) -> Result<(), SessionError> {
        let kind = self.expect_answering(SessionEvent::SelectOption)?;
        if kind != QuestionKind::MultipleChoice {
            return Err(self.rejected(SessionEvent::SelectOption));
        }
        let has_option = self
            .current_question()
            .is_some_and(|question| question.has_option(option));
        if !has_option {
            return Err(SessionError::UnknownOption(option.to_owned()));
        }
        self.selected = Some(option.to_owned());
        Ok(())
    }

    /// Grade the selected option and show the correct answer.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoSelection` if nothing is selected, and
    /// `SessionError::InvalidTransition` outside `Answering` or for an
    /// open-recall question.
    pub fn confirm(&mut self) -> Result<(), SessionError> {
        let kind = self.expect_answering(SessionEvent::Confirm)?;
        if kind != QuestionKind::MultipleChoice {
            return Err(self.rejected(SessionEvent::Confirm));
        }
        let Some(selected) = self.selected.as_deref() else {
            return Err(SessionError::NoSelection);
        };
        let record = match self.current_question() {
            Some(question) => evaluate_option(question, selected),
            None => return Err(self.rejected(SessionEvent::Confirm)),
        };
        debug!(cursor = self.cursor, correct = record.is_correct(), "option graded");
        self.log.record(self.cursor, record);
        self.revealed = true;
        self.phase = SessionPhase::ShowingAnswer;
        Ok(())
    }

    /// Leave a graded multiple-choice question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless the session is showing
    /// a graded answer.
    pub fn advance(&mut self) -> Result<(), SessionError> {
        if self.phase != SessionPhase::ShowingAnswer {
            return Err(self.rejected(SessionEvent::Advance));
        }
        self.next_question();
        Ok(())
    }

    /// End the session early. Nothing is scored; the partial log is returned.
    pub fn abandon(self) -> AnswerLog {
        info!(
            attempt = self.attempt,
            answered = self.log.len(),
            total = self.total(),
            "session abandoned"
        );
        self.log
    }

    /// Items answered wrong in this session, in session order.
    #[must_use]
    pub fn retry_subset(&self) -> Vec<QuestionItem> {
        build_retry_subset(&self.questions, &self.log)
    }

    /// Start a new session over the items answered wrong in this one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` if this session is not
    /// finished and `SessionError::NothingToRetry` if every item was right.
    pub fn start_retry(&self) -> Result<QuizSession, SessionError> {
        if !self.is_complete() {
            return Err(self.rejected(SessionEvent::Retry));
        }
        Self::retry_from(self.retry_subset(), self.attempt)
    }

    /// Start a retry over `wrong_items` taken from an earlier attempt.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NothingToRetry` if `wrong_items` is empty.
    pub fn retry_from(
        wrong_items: Vec<QuestionItem>,
        previous_attempt: u32,
    ) -> Result<QuizSession, SessionError> {
        if wrong_items.is_empty() {
            return Err(SessionError::NothingToRetry);
        }
        let attempt = previous_attempt.saturating_add(1);
        info!(attempt, questions = wrong_items.len(), "retry started");
        Ok(Self::with_attempt(wrong_items, attempt))
    }

    /// Apply an input event, ignoring it if it is not legal right now.
    ///
    /// Returns whether the event was accepted. Accepted repeats, such as a
    /// second `Reveal`, leave the session as it was.
    pub fn dispatch(&mut self, command: SessionCommand) -> bool {
        match self.apply(&command) {
            Ok(()) => true,
            Err(err) => {
                debug!(?command, phase = %self.phase, error = %err, "event ignored");
                false
            }
        }
    }

    /// Apply an input event, reporting why it was rejected.
    ///
    /// # Errors
    ///
    /// Returns the error of the underlying transition.
    pub fn apply(&mut self, command: &SessionCommand) -> Result<(), SessionError> {
        match command {
            SessionCommand::Reveal => self.reveal(),
            SessionCommand::Assess(knew_it) => self.assess(*knew_it),
            SessionCommand::SelectOption(option) => self.select_option(option),
            SessionCommand::Confirm => self.confirm(),
            SessionCommand::Advance => self.advance(),
        }
    }

    /// Translate a key press into the command it means for the current question.
    #[must_use]
    pub fn command_for_key(&self, key: SessionKey) -> Option<SessionCommand> {
        let question = self.current_question()?;
        match key {
            SessionKey::Space | SessionKey::Enter => match (question.kind(), self.phase) {
                (QuestionKind::OpenRecall, _) => Some(SessionCommand::Reveal),
                (QuestionKind::MultipleChoice, SessionPhase::ShowingAnswer) => {
                    Some(SessionCommand::Advance)
                }
                (QuestionKind::MultipleChoice, _) => Some(SessionCommand::Confirm),
            },
            SessionKey::ArrowLeft => Some(SessionCommand::Assess(false)),
            SessionKey::ArrowRight => Some(SessionCommand::Assess(true)),
            SessionKey::Digit(n) => {
                let index = usize::from(n).checked_sub(1)?;
                question
                    .options()
                    .get(index)
                    .map(|option| SessionCommand::SelectOption(option.clone()))
            }
            SessionKey::Other => None,
        }
    }

    /// Handle a key press; unbound or illegal keys are ignored.
    pub fn handle_key(&mut self, key: SessionKey) -> bool {
        self.command_for_key(key)
            .is_some_and(|command| self.dispatch(command))
    }

    //
    // ─── INTERNALS ─────────────────────────────────────────────────────────────
    //

    fn expect_answering(&self, event: SessionEvent) -> Result<QuestionKind, SessionError> {
        if self.phase != SessionPhase::Answering {
            return Err(self.rejected(event));
        }
        self.current_question()
            .map(QuestionItem::kind)
            .ok_or_else(|| self.rejected(event))
    }

    fn rejected(&self, event: SessionEvent) -> SessionError {
        SessionError::InvalidTransition {
            event,
            phase: self.phase,
        }
    }

    fn next_question(&mut self) {
        self.revealed = false;
        self.selected = None;
        if self.cursor + 1 < self.questions.len() {
            self.cursor += 1;
            self.phase = SessionPhase::Answering;
        } else {
            self.finish();
        }
    }

    fn finish(&mut self) {
        let result = score(&self.questions, &self.log);
        info!(
            attempt = self.attempt,
            total = result.total(),
            correct = result.correct(),
            score = result.score_percent(),
            "session finished"
        );
        self.phase = SessionPhase::Finished;
        self.revealed = false;
        self.selected = None;
        self.result = Some(result);
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("questions_len", &self.questions.len())
            .field("cursor", &self.cursor)
            .field("phase", &self.phase)
            .field("revealed", &self.revealed)
            .field("selected", &self.selected)
            .field("log_len", &self.log.len())
            .field("attempt", &self.attempt)
            .field("persisted_at", &self.persisted_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
