use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors raised while validating a single question item.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt is empty")]
    EmptyPrompt,

    #[error("correct answer is empty")]
    EmptyAnswer,

    #[error("correct answer {answer:?} is not one of the options")]
    AnswerNotInOptions { answer: String },
}

//
// ─── QUESTION KIND ────────────────────────────────────────────────────────────
//

/// Answer modality of a question, resolved from the presence of options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// The user recalls the answer and grades themselves.
    OpenRecall,
    /// The user picks one of the options and the engine grades the pick.
    MultipleChoice,
}

//
// ─── QUESTION ITEM ────────────────────────────────────────────────────────────
//

/// One immutable prompt/answer pair from a question bank.
///
/// Items with a non-empty option list are multiple-choice; everything else
/// is open-recall. For multiple-choice items the correct answer is always one
/// of the options (exact string match).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "QuestionRecord", into = "QuestionRecord")]
pub struct QuestionItem {
    prompt: String,
    correct_answer: String,
    options: Vec<String>,
}

impl QuestionItem {
    /// Build a validated question item.
    ///
    /// An empty `options` list makes the item open-recall.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyPrompt` / `EmptyAnswer` for blank text and
    /// `QuestionError::AnswerNotInOptions` if options are given but none of them
    /// equals the correct answer exactly.
    pub fn new(
        prompt: impl Into<String>,
        correct_answer: impl Into<String>,
        options: Vec<String>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        let correct_answer = correct_answer.into();

        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if correct_answer.trim().is_empty() {
            return Err(QuestionError::EmptyAnswer);
        }
        if !options.is_empty() && !options.iter().any(|opt| *opt == correct_answer) {
            return Err(QuestionError::AnswerNotInOptions {
                answer: correct_answer,
            });
        }

        Ok(Self {
            prompt,
            correct_answer,
            options,
        })
    }

    /// Convenience constructor for an open-recall item.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt or answer is blank.
    pub fn open_recall(
        prompt: impl Into<String>,
        correct_answer: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        Self::new(prompt, correct_answer, Vec::new())
    }

    /// Convenience constructor for a multiple-choice item.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if text is blank or the answer is not an option.
    pub fn multiple_choice<I, S>(
        prompt: impl Into<String>,
        correct_answer: impl Into<String>,
        options: I,
    ) -> Result<Self, QuestionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            prompt,
            correct_answer,
            options.into_iter().map(Into::into).collect(),
        )
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    /// Options for a multiple-choice item; empty for open-recall items.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        if self.options.is_empty() {
            QuestionKind::OpenRecall
        } else {
            QuestionKind::MultipleChoice
        }
    }

    #[must_use]
    pub fn is_multiple_choice(&self) -> bool {
        self.kind() == QuestionKind::MultipleChoice
    }

    /// Returns true if `candidate` is exactly one of this item's options.
    #[must_use]
    pub fn has_option(&self, candidate: &str) -> bool {
        self.options.iter().any(|opt| opt == candidate)
    }
}

//
// ─── WIRE SHAPE ───────────────────────────────────────────────────────────────
//

/// Serialized shape produced by the question generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct QuestionRecord {
    #[serde(alias = "prompt")]
    question: String,
    #[serde(alias = "correctAnswer", alias = "correct_answer")]
    answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    options: Option<Vec<String>>,
}

impl TryFrom<QuestionRecord> for QuestionItem {
    type Error = QuestionError;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        Self::new(
            record.question,
            record.answer,
            record.options.unwrap_or_default(),
        )
    }
}

impl From<QuestionItem> for QuestionRecord {
    fn from(item: QuestionItem) -> Self {
        Self {
            question: item.prompt,
            answer: item.correct_answer,
            options: (!item.options.is_empty()).then_some(item.options),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
