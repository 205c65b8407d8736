//! Grading of a single question.
//!
//! Correctness is a pure string-equality predicate for multiple-choice items
//! and the user's own word for open-recall items. Nothing is trimmed or
//! case-folded.

use crate::model::{AnswerRecord, QuestionItem};

/// Grade a picked option against the item's correct answer.
#[must_use]
pub fn evaluate_option(item: &QuestionItem, selected: &str) -> AnswerRecord {
    AnswerRecord::OptionChosen {
        selected_option: selected.to_owned(),
        is_correct: selected == item.correct_answer(),
    }
}

/// Record a self-assessment for an open-recall item.
#[must_use]
pub fn self_assess(knew_it: bool) -> AnswerRecord {
    AnswerRecord::SelfAssessed { knew_it }
}
