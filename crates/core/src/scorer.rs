use crate::model::{AnswerLog, QuestionItem, SessionResult};

/// Derive the aggregate result of a session.
///
/// `log` is keyed by positions in `items`. A question without a log entry
/// counts as wrong rather than failing the computation; a completed session
/// always has one entry per question, so this only matters for logs that were
/// cut short. Entries for positions outside `items` are ignored.
///
/// Pure: identical inputs always give identical output.
#[must_use]
pub fn score(items: &[QuestionItem], log: &AnswerLog) -> SessionResult {
    let total = items.len();
    let correct = (0..total)
        .filter(|index| log.get(*index).is_some_and(|record| record.is_correct()))
        .count();
    let answer_log = log
        .iter()
        .filter(|(index, _)| *index < total)
        .map(|(index, record)| (index, record.clone()))
        .collect();

    SessionResult::from_scored(items.to_vec(), correct, answer_log)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::{evaluate_option, self_assess};

    fn items(n: usize) -> Vec<QuestionItem> {
        (0..n)
            .map(|i| QuestionItem::open_recall(format!("Q{i}"), format!("A{i}")).unwrap())
            .collect()
    }

    #[test]
    fn empty_session_scores_zero() {
        let result = score(&[], &AnswerLog::new());
        assert_eq!(result.total(), 0);
        assert_eq!(result.correct(), 0);
        assert_eq!(result.wrong(), 0);
        assert_eq!(result.score_percent(), 0);
    }

    #[test]
    fn counts_mixed_record_kinds() {
        let mc = QuestionItem::multiple_choice("Q3", "B", ["A", "B", "C"]).unwrap();
        let mut questions = items(2);
        questions.push(mc.clone());

        let mut log = AnswerLog::new();
        log.record(0, self_assess(true));
        log.record(1, self_assess(false));
        log.record(2, evaluate_option(&mc, "B"));

        let result = score(&questions, &log);
        assert_eq!(result.total(), 3);
        assert_eq!(result.correct(), 2);
        assert_eq!(result.wrong(), 1);
        assert_eq!(result.score_percent(), 67);
    }

    #[test]
    fn missing_entries_count_as_wrong() {
        let mut log = AnswerLog::new();
        log.record(0, self_assess(true));

        let result = score(&items(4), &log);
        assert_eq!(result.correct(), 1);
        assert_eq!(result.wrong(), 3);
        assert_eq!(result.score_percent(), 25);
    }

    #[test]
    fn out_of_range_entries_are_dropped() {
        let mut log = AnswerLog::new();
        log.record(0, self_assess(true));
        log.record(7, self_assess(true));

        let result = score(&items(1), &log);
        assert_eq!(result.correct(), 1);
        assert_eq!(result.answer_log().len(), 1);
    }

    #[test]
    fn scoring_is_deterministic() {
        let questions = items(3);
        let mut log = AnswerLog::new();
        log.record(0, self_assess(false));
        log.record(1, self_assess(true));
        log.record(2, self_assess(true));

        assert_eq!(score(&questions, &log), score(&questions, &log));
    }
}
