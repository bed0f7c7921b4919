//! Parses the rows of an import file, dropping rows that cannot become a transaction.

use std::io::Read;

use crate::{
    Error,
    models::{CategoryTitle, TransactionKind, validate_value},
};

/// A row from an import file that is ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRow {
    pub title: String,
    pub kind: TransactionKind,
    pub value: f64,
    pub category_title: CategoryTitle,
}

/// The valid rows of an import file in the order they appear in the file.
#[derive(Debug, Default, PartialEq)]
pub struct ParsedRows {
    pub rows: Vec<ImportRow>,
    /// The category title of every row in `rows`, including duplicates.
    pub category_titles: Vec<CategoryTitle>,
    /// The number of rows that were dropped.
    pub skipped: usize,
}

#[derive(Debug, thiserror::Error)]
enum SkipReason {
    #[error("the title, type or value is missing")]
    MissingField,
    #[error("\"{0}\" is not \"income\" or \"outcome\"")]
    InvalidKind(String),
    #[error("\"{0}\" is not a positive number")]
    InvalidValue(String),
    #[error("the category is missing")]
    MissingCategory,
}

/// Read every record from `reader`, skipping the header row.
///
/// Rows with an empty title, type or value are dropped, as are rows with an
/// unknown type, a value that is not a finite positive number or an empty
/// category. Dropped rows are counted and logged at the debug level.
///
/// # Errors
///
/// Returns an [Error::InvalidCSV] if the data is not valid CSV, e.g. it is not UTF-8.
pub fn parse_rows<R: Read>(reader: R) -> Result<ParsedRows, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut parsed = ParsedRows::default();

    for record in reader.records() {
        let record = record?;

        match parse_record(&record) {
            Ok(row) => {
                parsed.category_titles.push(row.category_title.clone());
                parsed.rows.push(row);
            }
            Err(reason) => {
                let line = record.position().map_or(0, |position| position.line());
                tracing::debug!("skipping import row on line {line}: {reason}");
                parsed.skipped += 1;
            }
        }
    }

    Ok(parsed)
}

fn parse_record(record: &csv::StringRecord) -> Result<ImportRow, SkipReason> {
    let field = |index: usize| record.get(index).unwrap_or_default();
    let (title, kind, value, category) = (field(0), field(1), field(2), field(3));

    if title.is_empty() || kind.is_empty() || value.is_empty() {
        return Err(SkipReason::MissingField);
    }

    let kind = kind
        .to_lowercase()
        .parse::<TransactionKind>()
        .map_err(|_| SkipReason::InvalidKind(kind.to_owned()))?;

    let value = value
        .parse::<f64>()
        .ok()
        .and_then(|number| validate_value(number).ok())
        .ok_or_else(|| SkipReason::InvalidValue(value.to_owned()))?;

    let category_title = CategoryTitle::new(category).map_err(|_| SkipReason::MissingCategory)?;

    Ok(ImportRow {
        title: title.to_owned(),
        kind,
        value,
        category_title,
    })
}
