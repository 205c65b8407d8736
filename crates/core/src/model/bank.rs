use std::collections::HashSet;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::model::question::{QuestionError, QuestionItem, QuestionRecord};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankError {
    #[error("category name is empty")]
    EmptyCategoryName,

    #[error("duplicate category: {0}")]
    DuplicateCategory(String),

    #[error("invalid question #{index} in category {category:?}: {source}")]
    InvalidQuestion {
        category: String,
        index: usize,
        #[source]
        source: QuestionError,
    },

    #[error("malformed question bank: {0}")]
    Json(#[from] serde_json::Error),
}

/// Categorized, ordered collection of question items supplied for one quiz.
///
/// Category order and the order of items within a category are both
/// meaningful: they define default display and iteration order. The bank is
/// read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionBank {
    categories: Vec<(String, Vec<QuestionItem>)>,
}

impl QuestionBank {
    /// Build a bank from `(category, items)` pairs, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns `BankError::EmptyCategoryName` for blank names and
    /// `BankError::DuplicateCategory` if a name appears twice.
    pub fn new<I, S>(entries: I) -> Result<Self, BankError>
    where
        I: IntoIterator<Item = (S, Vec<QuestionItem>)>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut categories = Vec::new();
        for (name, items) in entries {
            let name = name.into();
            if name.trim().is_empty() {
                return Err(BankError::EmptyCategoryName);
            }
            if !seen.insert(name.clone()) {
                return Err(BankError::DuplicateCategory(name));
            }
            categories.push((name, items));
        }
        Ok(Self { categories })
    }

    /// Parse a bank from the generator's JSON object (`{ category: [item, ..] }`).
    ///
    /// # Errors
    ///
    /// Returns `BankError::Json` for malformed JSON, and the validation errors of
    /// [`QuestionBank::new`] / [`QuestionItem::new`] for invalid content.
    pub fn from_json(raw: &str) -> Result<Self, BankError> {
        let RawBank(entries) = serde_json::from_str(raw)?;
        let mut validated = Vec::with_capacity(entries.len());
        for (category, records) in entries {
            let mut items = Vec::with_capacity(records.len());
            for (index, record) in records.into_iter().enumerate() {
                let item = QuestionItem::try_from(record).map_err(|source| {
                    BankError::InvalidQuestion {
                        category: category.clone(),
                        index,
                        source,
                    }
                })?;
                items.push(item);
            }
            validated.push((category, items));
        }
        Self::new(validated)
    }

    /// Category names in bank order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|(name, _)| name.as_str())
    }

    /// Items of one category, or `None` if the bank has no such category.
    #[must_use]
    pub fn category(&self, name: &str) -> Option<&[QuestionItem]> {
        self.categories
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, items)| items.as_slice())
    }

    /// Every item, category order first, then item order.
    pub fn all_items(&self) -> impl Iterator<Item = &QuestionItem> {
        self.categories.iter().flat_map(|(_, items)| items.iter())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &[QuestionItem])> {
        self.categories
            .iter()
            .map(|(name, items)| (name.as_str(), items.as_slice()))
    }

    /// Total number of items across all categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.iter().map(|(_, items)| items.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }
}

impl Serialize for QuestionBank {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for (name, items) in &self.categories {
            map.serialize_entry(name, items)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for QuestionBank {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let RawBank(entries) = RawBank::deserialize(deserializer)?;
        let mut validated = Vec::with_capacity(entries.len());
        for (category, records) in entries {
            let items = records
                .into_iter()
                .map(QuestionItem::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map_err(serde::de::Error::custom)?;
            validated.push((category, items));
        }
        Self::new(validated).map_err(serde::de::Error::custom)
    }
}

/// JSON object read entry by entry so key order survives.
struct RawBank(Vec<(String, Vec<QuestionRecord>)>);

impl<'de> Deserialize<'de> for RawBank {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = RawBank;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping category names to question lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RawBank, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, items)) = access.next_entry::<String, Vec<QuestionRecord>>()? {
                    entries.push((name, items));
                }
                Ok(RawBank(entries))
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}
