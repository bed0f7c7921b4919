//! Imports the rows of a CSV file as transactions, creating missing categories in bulk.

use std::{
    collections::{HashMap, HashSet},
    fs::{self, File},
    io::{BufReader, Read},
    path::Path,
};

use crate::{
    Error,
    csv_import::rows::{ParsedRows, parse_rows},
    models::{CategoryId, CategoryTitle, Transaction},
    stores::{CategoryStore, TransactionStore},
};

/// Creates transactions from CSV rows.
///
/// Imported outcomes are not checked against the balance.
#[derive(Debug, Clone)]
pub struct TransactionImporter<C, T> {
    categories: C,
    transactions: T,
}

impl<C, T> TransactionImporter<C, T>
where
    C: CategoryStore,
    T: TransactionStore,
{
    /// Create an importer that writes to `categories` and `transactions`.
    pub fn new(categories: C, transactions: T) -> Self {
        Self {
            categories,
            transactions,
        }
    }

    /// Import every valid row from `reader`.
    ///
    /// The whole file is read before anything is written. Categories that do not
    /// exist yet are created together, then all transactions are created
    /// together. Returns the new transactions in the order of the rows in the file.
    ///
    /// # Errors
    ///
    /// This function will return a:
    /// - [Error::InvalidCSV] if the data could not be read as CSV,
    /// - or any error from the stores.
    pub fn import<R: Read>(&self, reader: R) -> Result<Vec<Transaction>, Error> {
        let ParsedRows {
            rows,
            category_titles,
            skipped,
        } = parse_rows(reader)?;

        if skipped > 0 {
            tracing::info!("skipped {skipped} malformed rows");
        }

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut seen = HashSet::new();
        let distinct_titles = category_titles
            .into_iter()
            .filter(|title| seen.insert(title.clone()))
            .collect::<Vec<_>>();

        let existing_categories = self.categories.get_by_titles(&distinct_titles)?;
        let new_titles = {
            let existing_titles = existing_categories
                .iter()
                .map(|category| &category.title)
                .collect::<HashSet<_>>();

            distinct_titles
                .iter()
                .filter(|title| !existing_titles.contains(title))
                .cloned()
                .collect::<Vec<_>>()
        };
        let created_categories = self.categories.create_many(new_titles)?;
        let created_category_count = created_categories.len();

        let category_ids: HashMap<CategoryTitle, CategoryId> = existing_categories
            .into_iter()
            .chain(created_categories)
            .map(|category| (category.title, category.id))
            .collect();

        let builders = rows
            .into_iter()
            .map(|row| {
                let category_id = category_ids
                    .get(&row.category_title)
                    .copied()
                    .ok_or(Error::InvalidCategory)?;

                Ok(Transaction::build(
                    &row.title,
                    row.kind,
                    row.value,
                    category_id,
                ))
            })
            .collect::<Result<Vec<_>, Error>>()?;

        let transactions = self.transactions.create_many(builders)?;

        tracing::info!(
            "imported {} transactions and created {} categories",
            transactions.len(),
            created_category_count
        );

        Ok(transactions)
    }

    /// Import the CSV file at `path`, then delete the file.
    ///
    /// The file is deleted whether or not the import succeeds. A file that
    /// cannot be deleted is logged and does not change the result.
    ///
    /// # Errors
    ///
    /// Returns an [Error::UploadError] if the file could not be opened, otherwise
    /// the same errors as [TransactionImporter::import].
    pub fn import_file(&self, path: &Path) -> Result<Vec<Transaction>, Error> {
        let result = File::open(path)
            .map_err(|error| {
                tracing::error!("could not open import file {}: {error}", path.display());
                Error::UploadError(error.to_string())
            })
            .and_then(|file| self.import(BufReader::new(file)));

        if let Err(error) = fs::remove_file(path) {
            tracing::warn!("could not remove import file {}: {error}", path.display());
        }

        result
    }
}
