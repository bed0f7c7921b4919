//! Implements a SQLite backed category store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, OptionalExtension, Row, params_from_iter};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{Category, CategoryTitle},
    stores::{CategoryStore, sqlite::lock_connection},
};

/// Creates and retrieves transaction categories to/from a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteCategoryStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteCategoryStore {
    /// Create a new category store with a SQLite database.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

/// The most titles bound in a single `IN (...)` query.
///
/// SQLite allows at most 32766 parameters per statement.
const MAX_TITLES_PER_QUERY: usize = 1000;

const INSERT_CATEGORY: &str = "INSERT INTO category (title) VALUES (?1) RETURNING id, title;";

fn map_insert_error(error: rusqlite::Error, title: &CategoryTitle) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
            },
            _,
        ) => Error::DuplicateCategoryTitle(title.to_string()),
        error => error.into(),
    }
}

impl CategoryStore for SQLiteCategoryStore {
    /// Create a category in the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DuplicateCategoryTitle] if a category with `title` already exists,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn create(&self, title: CategoryTitle) -> Result<Category, Error> {
        let connection = lock_connection(&self.connection)?;

        connection
            .prepare(INSERT_CATEGORY)?
            .query_row((title.as_ref(),), SQLiteCategoryStore::map_row)
            .map_err(|error| map_insert_error(error, &title))
    }

    /// Create categories for all of `titles` within one SQL transaction.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DuplicateCategoryTitle] if any of the titles already exist,
    ///   in which case no categories are created,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn create_many(&self, titles: Vec<CategoryTitle>) -> Result<Vec<Category>, Error> {
        if titles.is_empty() {
            return Ok(Vec::new());
        }

        let connection = lock_connection(&self.connection)?;
        let tx = connection.unchecked_transaction()?;

        let categories = {
            let mut stmt = tx.prepare(INSERT_CATEGORY)?;

            titles
                .iter()
                .map(|title| {
                    stmt.query_row((title.as_ref(),), SQLiteCategoryStore::map_row)
                        .map_err(|error| map_insert_error(error, title))
                })
                .collect::<Result<Vec<_>, _>>()?
        };

        tx.commit()?;

        Ok(categories)
    }

    /// Retrieve the category with exactly `title`.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL error.
    fn get_by_title(&self, title: &CategoryTitle) -> Result<Option<Category>, Error> {
        let connection = lock_connection(&self.connection)?;

        connection
            .prepare("SELECT id, title FROM category WHERE title = :title;")?
            .query_row(&[(":title", title.as_ref())], SQLiteCategoryStore::map_row)
            .optional()
            .map_err(|error| error.into())
    }

    /// Retrieve the categories whose title is in `titles`, ordered by ID.
    ///
    /// Titles are looked up in batches of [MAX_TITLES_PER_QUERY] to stay under
    /// SQLite's limit on the number of bound parameters.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL error.
    fn get_by_titles(&self, titles: &[CategoryTitle]) -> Result<Vec<Category>, Error> {
        if titles.is_empty() {
            return Ok(Vec::new());
        }

        let connection = lock_connection(&self.connection)?;
        let mut categories = Vec::new();

        for chunk in titles.chunks(MAX_TITLES_PER_QUERY) {
            let placeholders = (1..=chunk.len())
                .map(|i| format!("?{i}"))
                .collect::<Vec<_>>()
                .join(", ");
            let mut stmt = connection.prepare_cached(&format!(
                "SELECT id, title FROM category WHERE title IN ({placeholders});"
            ))?;
            let params = params_from_iter(chunk.iter().map(|title| title.as_ref()));

            for category in stmt.query_map(params, SQLiteCategoryStore::map_row)? {
                categories.push(category?);
            }
        }

        categories.sort_by_key(|category| category.id);
        // A title repeated across batches matches the same category twice.
        categories.dedup_by_key(|category| category.id);

        Ok(categories)
    }

    /// Retrieve all categories ordered alphabetically by title.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL error.
    fn get_all(&self) -> Result<Vec<Category>, Error> {
        let connection = lock_connection(&self.connection)?;
        let mut stmt = connection.prepare("SELECT id, title FROM category ORDER BY title ASC;")?;

        stmt.query_map([], SQLiteCategoryStore::map_row)?
            .map(|maybe_category| maybe_category.map_err(|error| error.into()))
            .collect()
    }
}

impl CreateTable for SQLiteCategoryStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS category (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL UNIQUE
            );",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteCategoryStore {
    type ReturnType = Category;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;

        let raw_title: String = row.get(offset + 1)?;
        let title = CategoryTitle::new_unchecked(&raw_title);

        Ok(Self::ReturnType { id, title })
    }
}

#[cfg(test)]
mod category_tests {
    use std::collections::HashSet;

    use crate::{
        Error,
        models::CategoryTitle,
        stores::sqlite::get_test_connection,
    };

    use super::{CategoryStore, SQLiteCategoryStore};

    fn get_test_store() -> SQLiteCategoryStore {
        SQLiteCategoryStore::new(get_test_connection())
    }

    #[test]
    fn create_category_succeeds() {
        let store = get_test_store();
        let title = CategoryTitle::new("Categorically a category").unwrap();

        let category = store.create(title.clone()).unwrap();

        assert!(category.id > 0);
        assert_eq!(category.title, title);
    }

    #[test]
    fn create_category_fails_on_duplicate_title() {
        let store = get_test_store();
        store.create(CategoryTitle::new_unchecked("Foo")).unwrap();

        let duplicate = store.create(CategoryTitle::new_unchecked("Foo"));

        assert_eq!(duplicate, Err(Error::DuplicateCategoryTitle("Foo".to_owned())));
    }

    #[test]
    fn create_many_preserves_order() {
        let store = get_test_store();
        let titles = vec![
            CategoryTitle::new_unchecked("Work"),
            CategoryTitle::new_unchecked("Housing"),
            CategoryTitle::new_unchecked("Food"),
        ];

        let categories = store.create_many(titles.clone()).unwrap();

        let got_titles = categories
            .into_iter()
            .map(|category| category.title)
            .collect::<Vec<_>>();
        assert_eq!(got_titles, titles);
    }

    #[test]
    fn create_many_is_all_or_nothing() {
        let store = get_test_store();
        store.create(CategoryTitle::new_unchecked("Housing")).unwrap();

        let result = store.create_many(vec![
            CategoryTitle::new_unchecked("Work"),
            CategoryTitle::new_unchecked("Housing"),
        ]);

        assert_eq!(
            result,
            Err(Error::DuplicateCategoryTitle("Housing".to_owned()))
        );
        assert_eq!(
            store.get_by_title(&CategoryTitle::new_unchecked("Work")),
            Ok(None)
        );
    }

    #[test]
    fn create_many_with_no_titles_does_nothing() {
        let store = get_test_store();

        let categories = store.create_many(Vec::new()).unwrap();

        assert!(categories.is_empty());
        assert!(store.get_all().unwrap().is_empty());
    }

    #[test]
    fn get_by_title_finds_exact_match() {
        let store = get_test_store();
        let inserted_category = store.create(CategoryTitle::new_unchecked("Foo")).unwrap();
        store.create(CategoryTitle::new_unchecked("Foobar")).unwrap();

        let selected_category = store.get_by_title(&CategoryTitle::new_unchecked("Foo"));

        assert_eq!(selected_category, Ok(Some(inserted_category)));
    }

    #[test]
    fn get_by_title_returns_none_when_missing() {
        let store = get_test_store();

        let selected_category = store.get_by_title(&CategoryTitle::new_unchecked("Foo"));

        assert_eq!(selected_category, Ok(None));
    }

    #[test]
    fn get_by_titles_ignores_unknown_titles() {
        let store = get_test_store();
        let housing = store.create(CategoryTitle::new_unchecked("Housing")).unwrap();
        let work = store.create(CategoryTitle::new_unchecked("Work")).unwrap();
        store.create(CategoryTitle::new_unchecked("Food")).unwrap();

        let selected_categories = store
            .get_by_titles(&[
                CategoryTitle::new_unchecked("Work"),
                CategoryTitle::new_unchecked("Travel"),
                CategoryTitle::new_unchecked("Housing"),
            ])
            .unwrap();

        assert_eq!(selected_categories, vec![housing, work]);
    }

    #[test]
    fn get_by_titles_handles_more_titles_than_sqlite_parameters() {
        let store = get_test_store();
        let titles = (0..33_000)
            .map(|i| CategoryTitle::new_unchecked(&format!("category #{i}")))
            .collect::<Vec<_>>();
        let created = store.create_many(titles.clone()).unwrap();
        let mut lookup = titles.clone();
        lookup.push(CategoryTitle::new_unchecked("category #0"));

        let selected_categories = store.get_by_titles(&lookup).unwrap();

        assert_eq!(selected_categories.len(), created.len());
        assert_eq!(selected_categories, created);
    }

    #[test]
    fn get_all_categories() {
        let store = get_test_store();

        let inserted_categories = HashSet::from([
            store.create(CategoryTitle::new_unchecked("Foo")).unwrap(),
            store.create(CategoryTitle::new_unchecked("Bar")).unwrap(),
        ]);

        let selected_categories = store.get_all().unwrap();
        let selected_categories = HashSet::from_iter(selected_categories);

        assert_eq!(inserted_categories, selected_categories);
    }
}
