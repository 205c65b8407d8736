use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

//
// ─── ANSWER RECORD ────────────────────────────────────────────────────────────
//

/// Outcome of one graded question.
///
/// The variant is chosen once, at grading time, from the item's kind:
/// open-recall items are self-assessed, multiple-choice items record the
/// chosen option and whether it matched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerRecord {
    /// User-declared recall for an open-recall item.
    SelfAssessed {
        #[serde(rename = "knewIt")]
        knew_it: bool,
    },
    /// Option picked for a multiple-choice item, graded by exact match.
    OptionChosen {
        #[serde(rename = "selectedOption")]
        selected_option: String,
        #[serde(rename = "isCorrect")]
        is_correct: bool,
    },
}

impl AnswerRecord {
    #[must_use]
    pub fn is_correct(&self) -> bool {
        match self {
            AnswerRecord::SelfAssessed { knew_it } => *knew_it,
            AnswerRecord::OptionChosen { is_correct, .. } => *is_correct,
        }
    }

    #[must_use]
    pub fn selected_option(&self) -> Option<&str> {
        match self {
            AnswerRecord::SelfAssessed { .. } => None,
            AnswerRecord::OptionChosen {
                selected_option, ..
            } => Some(selected_option),
        }
    }
}

//
// ─── ANSWER LOG ───────────────────────────────────────────────────────────────
//

/// Answer records keyed by question index.
///
/// The index space is the question list the log was created for: the list a
/// session started from. A retry session starts a fresh log over its own
/// renumbered subset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerLog {
    entries: BTreeMap<usize, AnswerRecord>,
}

impl AnswerLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the record for `index`, replacing any earlier one.
    pub fn record(&mut self, index: usize, record: AnswerRecord) -> Option<AnswerRecord> {
        self.entries.insert(index, record)
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&AnswerRecord> {
        self.entries.get(&index)
    }

    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.entries.contains_key(&index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Indices whose record is explicitly incorrect, ascending.
    pub fn wrong_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries
            .iter()
            .filter(|(_, record)| !record.is_correct())
            .map(|(index, _)| *index)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &AnswerRecord)> {
        self.entries.iter().map(|(index, record)| (*index, record))
    }
}

impl FromIterator<(usize, AnswerRecord)> for AnswerLog {
    fn from_iter<T: IntoIterator<Item = (usize, AnswerRecord)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
