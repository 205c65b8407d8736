use serde::Serialize;

use quiz_core::model::{AnswerRecord, QuestionKind, SessionResult};

use super::phase::SessionPhase;
use super::service::QuizSession;

/// Presentation-agnostic snapshot of a quiz screen.
///
/// The correct answer is only present once it has been revealed; a UI never
/// has to decide on its own whether to show it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub phase: SessionPhase,
    pub prompt: Option<String>,
    pub kind: Option<QuestionKind>,
    pub options: Vec<String>,
    pub answer: Option<String>,
    pub revealed: bool,
    pub selected_option: Option<String>,
    /// Grade of the current question, once recorded.
    pub last_record: Option<AnswerRecord>,
    /// 1-based; equals `total` once finished.
    pub position: usize,
    pub total: usize,
    pub attempt: u32,
    pub result: Option<SessionResult>,
}

impl SessionView {
    pub(crate) fn from_session(session: &QuizSession) -> Self {
        let question = session.current_question();
        let revealed = session.is_revealed();
        Self {
            phase: session.phase(),
            prompt: question.map(|q| q.prompt().to_owned()),
            kind: question.map(|q| q.kind()),
            options: question.map(|q| q.options().to_vec()).unwrap_or_default(),
            answer: question
                .filter(|_| revealed)
                .map(|q| q.correct_answer().to_owned()),
            revealed,
            selected_option: session.selected_option().map(str::to_owned),
            last_record: session.current_record().cloned(),
            position: session.position(),
            total: session.total(),
            attempt: session.attempt(),
            result: session.result().cloned(),
        }
    }

    /// View shown while categories are being picked and no session exists.
    #[must_use]
    pub fn selecting_category() -> Self {
        Self {
            phase: SessionPhase::SelectingCategory,
            prompt: None,
            kind: None,
            options: Vec::new(),
            answer: None,
            revealed: false,
            selected_option: None,
            last_record: None,
            position: 0,
            total: 0,
            attempt: 0,
            result: None,
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == SessionPhase::Finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuestionItem;

    #[test]
    fn answer_is_hidden_until_revealed() {
        let mut session = QuizSession::new(vec![
            QuestionItem::open_recall("Capital of France?", "Paris").unwrap(),
        ]);
        let view = session.view();
        assert_eq!(view.prompt.as_deref(), Some("Capital of France?"));
        assert_eq!(view.answer, None);
        assert_eq!((view.position, view.total), (1, 1));

        session.reveal().unwrap();
        assert_eq!(session.view().answer.as_deref(), Some("Paris"));
    }

    #[test]
    fn graded_pick_is_visible_until_advance() {
        let mut session = QuizSession::new(vec![
            QuestionItem::multiple_choice("2+2?", "4", ["3", "4"]).unwrap(),
        ]);
        session.select_option("3").unwrap();
        session.confirm().unwrap();

        let view = session.view();
        assert_eq!(view.kind, Some(QuestionKind::MultipleChoice));
        assert_eq!(view.answer.as_deref(), Some("4"));
        assert_eq!(view.selected_option.as_deref(), Some("3"));
        assert!(!view.last_record.unwrap().is_correct());

        session.advance().unwrap();
        let view = session.view();
        assert!(view.is_finished());
        assert_eq!(view.prompt, None);
        assert_eq!(view.result.unwrap().wrong(), 1);
    }

    #[test]
    fn selecting_view_is_empty() {
        let view = SessionView::selecting_category();
        assert_eq!(view.phase, SessionPhase::SelectingCategory);
        assert!(view.options.is_empty());
    }
}
