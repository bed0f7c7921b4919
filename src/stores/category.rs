//! Defines the category store trait.

use crate::{
    Error,
    models::{Category, CategoryTitle},
};

/// Creates and retrieves transaction categories.
///
/// Category titles are unique within a store.
pub trait CategoryStore {
    /// Create a new category and add it the store.
    fn create(&self, title: CategoryTitle) -> Result<Category, Error>;

    /// Create a category for each of `titles` in a single operation.
    ///
    /// Either all categories are created or none are. The returned categories
    /// are in the same order as `titles`.
    fn create_many(&self, titles: Vec<CategoryTitle>) -> Result<Vec<Category>, Error>;

    /// Get the category with exactly `title`, if it exists.
    fn get_by_title(&self, title: &CategoryTitle) -> Result<Option<Category>, Error>;

    /// Get every category whose title is one of `titles`.
    ///
    /// Titles without a matching category are ignored.
    fn get_by_titles(&self, titles: &[CategoryTitle]) -> Result<Vec<Category>, Error>;

    /// Get all categories.
    fn get_all(&self) -> Result<Vec<Category>, Error>;
}
