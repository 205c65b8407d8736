//! Narrowing a question bank to the working subset of a session.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{QuestionBank, QuestionItem};

/// Reserved name that selects every category.
pub const ALL_KEYWORD: &str = "all";

/// Which categories a session draws its questions from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    /// Every category, in bank order.
    All,
    /// Exactly these categories, in the given order.
    Categories(Vec<String>),
}

impl Selection {
    /// Build a selection from category names.
    ///
    /// The reserved keyword [`ALL_KEYWORD`] anywhere in the list selects every
    /// category. An empty list stays empty; starting a session from it fails.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.iter().any(|name| name == ALL_KEYWORD) {
            Self::All
        } else {
            Self::Categories(names)
        }
    }

    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    /// Returns true for an explicit empty category list.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Selection::Categories(names) if names.is_empty())
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str(ALL_KEYWORD),
            Selection::Categories(names) => f.write_str(&names.join("/")),
        }
    }
}

/// Parses a `/`- or `,`-separated list of category names, as found in routes.
impl FromStr for Selection {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_names(
            s.split(['/', ','])
                .map(str::trim)
                .filter(|segment| !segment.is_empty()),
        ))
    }
}

/// Materialize the items a selection covers.
///
/// `All` concatenates every category in bank order. A category list
/// concatenates the named categories in the order given; names the bank does
/// not know contribute nothing.
#[must_use]
pub fn select(bank: &QuestionBank, selection: &Selection) -> Vec<QuestionItem> {
    match selection {
        Selection::All => bank.all_items().cloned().collect(),
        Selection::Categories(names) => names
            .iter()
            .filter_map(|name| bank.category(name))
            .flat_map(|items| items.iter().cloned())
            .collect(),
    }
}

/// A category pick was confirmed with nothing checked.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("select at least one category")]
pub struct EmptySelectionError;

/// Checkbox model for choosing categories before a session starts.
///
/// Checked categories keep the order in which they were checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPicker {
    checked: Vec<String>,
}

impl CategoryPicker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip a category; returns whether it is checked afterwards.
    pub fn toggle(&mut self, name: &str) -> bool {
        let checked = !self.is_checked(name);
        self.set(name, checked);
        checked
    }

    pub fn set(&mut self, name: &str, checked: bool) {
        if checked {
            if !self.is_checked(name) {
                self.checked.push(name.to_owned());
            }
        } else {
            self.checked.retain(|candidate| candidate != name);
        }
    }

    #[must_use]
    pub fn is_checked(&self, name: &str) -> bool {
        self.checked.iter().any(|candidate| candidate == name)
    }

    pub fn clear(&mut self) {
        self.checked.clear();
    }

    #[must_use]
    pub fn checked(&self) -> &[String] {
        &self.checked
    }

    /// Current pick as a selection (possibly empty).
    #[must_use]
    pub fn selection(&self) -> Selection {
        Selection::from_names(self.checked.iter().cloned())
    }

    /// Current pick, if at least one category is checked.
    ///
    /// # Errors
    ///
    /// Returns `EmptySelectionError` when nothing is checked.
    pub fn confirm(&self) -> Result<Selection, EmptySelectionError> {
        if self.checked.is_empty() {
            return Err(EmptySelectionError);
        }
        Ok(self.selection())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank() -> QuestionBank {
        QuestionBank::new(vec![
            ("Cats", vec![QuestionItem::open_recall("Q1", "A1").unwrap()]),
            ("Dogs", vec![QuestionItem::open_recall("Q2", "A2").unwrap()]),
            (
                "Birds",
                vec![
                    QuestionItem::open_recall("Q3", "A3").unwrap(),
                    QuestionItem::open_recall("Q4", "A4").unwrap(),
                ],
            ),
        ])
        .unwrap()
    }

    fn prompts(items: &[QuestionItem]) -> Vec<&str> {
        items.iter().map(QuestionItem::prompt).collect()
    }

    #[test]
    fn all_keeps_bank_order() {
        let items = select(&bank(), &Selection::All);
        assert_eq!(prompts(&items), vec!["Q1", "Q2", "Q3", "Q4"]);
    }

    #[test]
    fn category_list_uses_given_order() {
        let selection = Selection::from_names(["Birds", "Cats"]);
        let items = select(&bank(), &selection);
        assert_eq!(prompts(&items), vec!["Q3", "Q4", "Q1"]);
    }

    #[test]
    fn unknown_categories_are_ignored() {
        let selection = Selection::from_names(["Fish", "Dogs"]);
        assert_eq!(prompts(&select(&bank(), &selection)), vec!["Q2"]);

        let only_unknown = Selection::from_names(["Fish"]);
        assert!(select(&bank(), &only_unknown).is_empty());
    }

    #[test]
    fn empty_list_selects_nothing() {
        let selection = Selection::from_names(Vec::<String>::new());
        assert!(selection.is_empty());
        assert!(select(&bank(), &selection).is_empty());
    }

    #[test]
    fn all_keyword_inside_list_selects_everything() {
        let selection = Selection::from_names(["Dogs", "all"]);
        assert!(selection.is_all());
    }

    #[test]
    fn parses_route_segments() {
        let selection: Selection = "Dogs/Cats".parse().unwrap();
        assert_eq!(
            selection,
            Selection::Categories(vec!["Dogs".into(), "Cats".into()])
        );
        assert_eq!(selection.to_string(), "Dogs/Cats");
        assert!("all".parse::<Selection>().unwrap().is_all());
        assert!("".parse::<Selection>().unwrap().is_empty());
    }

    #[test]
    fn picker_tracks_check_order() {
        let mut picker = CategoryPicker::new();
        assert!(picker.toggle("Dogs"));
        assert!(picker.toggle("Cats"));
        assert!(!picker.toggle("Dogs"));
        picker.set("Birds", true);
        picker.set("Birds", true);

        assert_eq!(picker.checked(), ["Cats".to_string(), "Birds".to_string()]);
        let items = select(&bank(), &picker.confirm().unwrap());
        assert_eq!(prompts(&items), vec!["Q1", "Q3", "Q4"]);

        picker.clear();
        assert!(picker.selection().is_empty());
        assert_eq!(picker.confirm(), Err(EmptySelectionError));
    }
}
