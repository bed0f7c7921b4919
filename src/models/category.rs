//! This file defines the `Category` type and the validated `CategoryTitle`.
//! A category groups transactions, and a transaction belongs to exactly one category.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, models::CategoryId};

/// The title of a category, e.g. 'Groceries', 'Housing', 'Work'.
///
/// Titles are unique within the category store, so the title doubles as the
/// natural key used when reconciling imported categories.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
pub struct CategoryTitle(String);

impl CategoryTitle {
    /// Create a category title from `title` with surrounding whitespace removed.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryTitle] if `title` is
    /// empty or just whitespace.
    pub fn new(title: &str) -> Result<Self, Error> {
        let title = title.trim();

        if title.is_empty() {
            Err(Error::EmptyCategoryTitle)
        } else {
            Ok(Self(title.to_string()))
        }
    }

    /// Create a category title without validation.
    ///
    /// The caller should ensure that the string is not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the non-empty invariant is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(title: &str) -> Self {
        Self(title.to_string())
    }
}

impl AsRef<str> for CategoryTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryTitle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryTitle::new(s)
    }
}

impl Display for CategoryTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A category for outcome and income transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The unique title of the category.
    pub title: CategoryTitle,
}

#[cfg(test)]
mod category_title_tests {
    use crate::{Error, models::CategoryTitle};

    #[test]
    fn new_fails_on_empty_string() {
        let title = CategoryTitle::new("");

        assert_eq!(title, Err(Error::EmptyCategoryTitle));
    }

    #[test]
    fn new_fails_on_just_whitespace() {
        let title = CategoryTitle::new("\n\t \r");

        assert_eq!(title, Err(Error::EmptyCategoryTitle));
    }

    #[test]
    fn new_trims_whitespace() {
        let title = CategoryTitle::new("  Housing ").unwrap();

        assert_eq!(title.as_ref(), "Housing");
    }

    #[test]
    fn new_succeeds_on_non_empty_string() {
        let title = CategoryTitle::new("🔥");

        assert!(title.is_ok())
    }
}
