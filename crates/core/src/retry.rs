use crate::model::{AnswerLog, QuestionItem, SessionResult};

/// Items of `questions` whose log entry is explicitly wrong, in original order.
///
/// `log` must be keyed by positions in `questions`. Unanswered items are not
/// retried: only a recorded `knew_it == false` or `is_correct == false` marks
/// an item wrong. An empty result means there is nothing to retry.
#[must_use]
pub fn build_retry_subset(questions: &[QuestionItem], log: &AnswerLog) -> Vec<QuestionItem> {
    questions
        .iter()
        .enumerate()
        .filter(|(index, _)| log.get(*index).is_some_and(|record| !record.is_correct()))
        .map(|(_, item)| item.clone())
        .collect()
}

impl SessionResult {
    /// Items to offer for a retry of this result.
    #[must_use]
    pub fn wrong_items(&self) -> Vec<QuestionItem> {
        build_retry_subset(self.items(), self.answer_log())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::{evaluate_option, self_assess};
    use crate::scorer::score;

    fn items(n: usize) -> Vec<QuestionItem> {
        (0..n)
            .map(|i| QuestionItem::open_recall(format!("Q{i}"), format!("A{i}")).unwrap())
            .collect()
    }

    #[test]
    fn keeps_wrong_items_in_original_order() {
        let questions = items(3);
        let mut log = AnswerLog::new();
        log.record(2, self_assess(false));
        log.record(0, self_assess(false));
        log.record(1, self_assess(true));

        let retry = build_retry_subset(&questions, &log);
        assert_eq!(retry, vec![questions[0].clone(), questions[2].clone()]);
    }

    #[test]
    fn includes_wrong_multiple_choice_picks() {
        let mc = QuestionItem::multiple_choice("Q3", "B", ["A", "B"]).unwrap();
        let questions = vec![mc.clone()];
        let mut log = AnswerLog::new();
        log.record(0, evaluate_option(&mc, "A"));

        assert_eq!(build_retry_subset(&questions, &log), vec![mc]);
    }

    #[test]
    fn all_correct_yields_nothing() {
        let questions = items(2);
        let mut log = AnswerLog::new();
        log.record(0, self_assess(true));
        log.record(1, self_assess(true));
        assert!(build_retry_subset(&questions, &log).is_empty());
    }

    #[test]
    fn result_exposes_wrong_items() {
        let questions = items(2);
        let mut log = AnswerLog::new();
        log.record(0, self_assess(true));
        log.record(1, self_assess(false));

        let result = score(&questions, &log);
        assert_eq!(result.wrong_items(), vec![questions[1].clone()]);
    }
}
