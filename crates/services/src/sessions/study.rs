use quiz_core::model::{QuestionBank, QuestionItem};
use quiz_core::selector::{Selection, select};

use crate::error::SessionError;

/// Browse mode: every selected question listed, one answer expanded at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyList {
    items: Vec<QuestionItem>,
    expanded: Option<usize>,
}

impl StudyList {
    /// # Errors
    ///
    /// Returns `SessionError::EmptySelection` if the selection yields no questions.
    pub fn from_selection(bank: &QuestionBank, selection: &Selection) -> Result<Self, SessionError> {
        let items = select(bank, selection);
        if items.is_empty() {
            return Err(SessionError::EmptySelection);
        }
        Ok(Self {
            items,
            expanded: None,
        })
    }

    #[must_use]
    pub fn items(&self) -> &[QuestionItem] {
        &self.items
    }

    #[must_use]
    pub fn expanded(&self) -> Option<usize> {
        self.expanded
    }

    /// Expand the item at `index`, collapsing any other; collapse it if it
    /// was already expanded. Out-of-range indices are ignored.
    ///
    /// Returns the expanded index afterwards.
    pub fn toggle(&mut self, index: usize) -> Option<usize> {
        if index < self.items.len() {
            self.expanded = if self.expanded == Some(index) {
                None
            } else {
                Some(index)
            };
        }
        self.expanded
    }

    /// Correct answer of the expanded item.
    #[must_use]
    pub fn expanded_answer(&self) -> Option<&str> {
        self.expanded
            .and_then(|index| self.items.get(index))
            .map(QuestionItem::correct_answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank() -> QuestionBank {
        QuestionBank::new(vec![
            (
                "Rust",
                vec![
                    QuestionItem::open_recall("Borrow checker?", "Ownership rules").unwrap(),
                    QuestionItem::open_recall("Trait?", "Shared behaviour").unwrap(),
                ],
            ),
            ("Empty", Vec::new()),
        ])
        .unwrap()
    }

    #[test]
    fn one_answer_expanded_at_a_time() {
        let mut list = StudyList::from_selection(&bank(), &Selection::All).unwrap();
        assert_eq!(list.expanded(), None);
        assert_eq!(list.toggle(0), Some(0));
        assert_eq!(list.expanded_answer(), Some("Ownership rules"));
        assert_eq!(list.toggle(1), Some(1));
        assert_eq!(list.toggle(1), None);
        assert_eq!(list.toggle(5), None);
    }

    #[test]
    fn empty_selection_is_rejected() {
        let selection = Selection::from_names(["Empty"]);
        assert!(matches!(
            StudyList::from_selection(&bank(), &selection),
            Err(SessionError::EmptySelection)
        ));
    }
}
