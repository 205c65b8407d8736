use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{AnswerLog, QuestionItem};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResultError {
    #[error("correct ({correct}) + wrong ({wrong}) does not match total ({total})")]
    CountMismatch {
        total: usize,
        correct: usize,
        wrong: usize,
    },

    #[error("result lists {items} items but reports a total of {total}")]
    ItemCountMismatch { total: usize, items: usize },
}

/// Aggregate outcome of one finished session.
///
/// Built once by the scorer when a session reaches `Finished`; immutable
/// afterwards. `answer_log` is keyed by positions in `items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResult {
    total: usize,
    correct: usize,
    wrong: usize,
    score_percent: u8,
    items: Vec<QuestionItem>,
    answer_log: AnswerLog,
}

impl SessionResult {
    /// Rehydrate a result from persisted parts, re-deriving the score.
    ///
    /// # Errors
    ///
    /// Returns `ResultError::CountMismatch` if `correct + wrong != total` and
    /// `ResultError::ItemCountMismatch` if `items` does not hold `total` entries.
    pub fn from_parts(
        total: usize,
        correct: usize,
        wrong: usize,
        items: Vec<QuestionItem>,
        answer_log: AnswerLog,
    ) -> Result<Self, ResultError> {
        if correct.checked_add(wrong) != Some(total) {
            return Err(ResultError::CountMismatch {
                total,
                correct,
                wrong,
            });
        }
        if items.len() != total {
            return Err(ResultError::ItemCountMismatch {
                total,
                items: items.len(),
            });
        }

        Ok(Self {
            total,
            correct,
            wrong,
            score_percent: score_percent(correct, total),
            items,
            answer_log,
        })
    }

    /// Build a result from a freshly scored session.
    pub(crate) fn from_scored(
        items: Vec<QuestionItem>,
        correct: usize,
        answer_log: AnswerLog,
    ) -> Self {
        let total = items.len();
        let correct = correct.min(total);
        Self {
            total,
            correct,
            wrong: total - correct,
            score_percent: score_percent(correct, total),
            items,
            answer_log,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn correct(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn wrong(&self) -> usize {
        self.wrong
    }

    /// `round(correct / total * 100)`, or 0 for an empty session.
    #[must_use]
    pub fn score_percent(&self) -> u8 {
        self.score_percent
    }

    #[must_use]
    pub fn items(&self) -> &[QuestionItem] {
        &self.items
    }

    #[must_use]
    pub fn answer_log(&self) -> &AnswerLog {
        &self.answer_log
    }

    /// Returns true if at least one item was answered wrong or left unanswered.
    #[must_use]
    pub fn has_wrong(&self) -> bool {
        self.wrong > 0
    }
}

/// Percentage rounded half away from zero, clamped to `0..=100`.
fn score_percent(correct: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let correct = correct.min(total);
    // Integer form of round(correct * 100 / total).
    let pct = (correct * 200 + total) / (total * 2);
    u8::try_from(pct).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AnswerRecord;

    fn item(n: usize) -> QuestionItem {
        QuestionItem::open_recall(format!("Q{n}"), format!("A{n}")).unwrap()
    }

    #[test]
    fn score_rounds_to_nearest() {
        assert_eq!(score_percent(0, 0), 0);
        assert_eq!(score_percent(1, 3), 33);
        assert_eq!(score_percent(2, 3), 67);
        assert_eq!(score_percent(1, 2), 50);
        assert_eq!(score_percent(1, 8), 13);
        assert_eq!(score_percent(3, 3), 100);
    }

    #[test]
    fn from_parts_checks_counts() {
        let err = SessionResult::from_parts(2, 1, 0, vec![item(0), item(1)], AnswerLog::new())
            .unwrap_err();
        assert!(matches!(err, ResultError::CountMismatch { .. }));

        let err =
            SessionResult::from_parts(2, 1, 1, vec![item(0)], AnswerLog::new()).unwrap_err();
        assert!(matches!(err, ResultError::ItemCountMismatch { .. }));
    }

    #[test]
    fn json_round_trip_keeps_log() {
        let log: AnswerLog = [(0, AnswerRecord::SelfAssessed { knew_it: false })]
            .into_iter()
            .collect();
        let result = SessionResult::from_parts(1, 0, 1, vec![item(0)], log).unwrap();
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains(r#""scorePercent":0"#));
        let back: SessionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
