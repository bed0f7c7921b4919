//! Implements a SQLite backed transaction store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{Transaction, TransactionBuilder, TransactionId},
    stores::{
        TransactionStore,
        sqlite::{SQLiteCategoryStore, lock_connection},
    },
};

/// Stores transactions in a SQLite database.
///
/// Note that because a transaction depends on the [Category](crate::models::Category)
/// model, the category table must be set up in the database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

const SELECT_TRANSACTION: &str = "SELECT t.id, t.title, t.kind, t.value, t.created_at, t.updated_at, c.id, c.title
     FROM \"transaction\" t
     INNER JOIN category c ON c.id = t.category_id";

/// Insert `builder` and read the stored transaction back with its category.
fn insert_transaction(
    builder: TransactionBuilder,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let id: TransactionId = connection
        .prepare_cached(
            "INSERT INTO \"transaction\" (title, kind, value, category_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id",
        )?
        .query_row(
            (
                &builder.title,
                builder.kind,
                builder.value,
                builder.category_id,
                now,
                now,
            ),
            |row| row.get(0),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidCategory,
            // NaN is stored as NULL, negative values fail the CHECK constraint.
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code:
                        rusqlite::ffi::SQLITE_CONSTRAINT_CHECK | rusqlite::ffi::SQLITE_CONSTRAINT_NOTNULL,
                },
                _,
            ) => Error::InvalidTransactionValue(builder.value),
            error => error.into(),
        })?;

    select_transaction(id, connection)
}

fn select_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    connection
        .prepare_cached(&format!("{SELECT_TRANSACTION} WHERE t.id = :id"))?
        .query_row(&[(":id", &id)], SQLiteTransactionStore::map_row)
        .map_err(|error| error.into())
}

impl TransactionStore for SQLiteTransactionStore {
    /// Create a new transaction in the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidCategory] if `category_id` does not refer to a valid category,
    /// - [Error::InvalidTransactionValue] if the value is negative or not a number,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn create(&self, builder: TransactionBuilder) -> Result<Transaction, Error> {
        let connection = lock_connection(&self.connection)?;

        insert_transaction(builder, OffsetDateTime::now_utc(), &connection)
    }

    /// Create many transactions within one SQL transaction.
    ///
    /// All transactions get the same creation timestamp.
    ///
    /// # Errors
    /// Returns the same errors as [SQLiteTransactionStore::create]. If any
    /// transaction fails, none are created.
    fn create_many(&self, builders: Vec<TransactionBuilder>) -> Result<Vec<Transaction>, Error> {
        if builders.is_empty() {
            return Ok(Vec::new());
        }

        let connection = lock_connection(&self.connection)?;
        let tx = connection.unchecked_transaction()?;
        let now = OffsetDateTime::now_utc();

        let transactions = builders
            .into_iter()
            .map(|builder| insert_transaction(builder, now, &tx))
            .collect::<Result<Vec<_>, _>>()?;

        tx.commit()?;

        Ok(transactions)
    }

    /// Retrieve a transaction in the database by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid transaction,
    /// - or [Error::SqlError] there is some other SQL error.
    fn get(&self, id: TransactionId) -> Result<Transaction, Error> {
        let connection = lock_connection(&self.connection)?;

        select_transaction(id, &connection)
    }

    /// Retrieve all transactions ordered by ID.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] there is a SQL error.
    fn get_all(&self) -> Result<Vec<Transaction>, Error> {
        let connection = lock_connection(&self.connection)?;
        let mut stmt = connection.prepare(&format!("{SELECT_TRANSACTION} ORDER BY t.id ASC"))?;

        stmt.query_map([], Self::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
            .collect()
    }

    /// Delete the transaction with `id`, returning the number of rows deleted.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] there is a SQL error.
    fn delete(&self, id: TransactionId) -> Result<usize, Error> {
        let connection = lock_connection(&self.connection)?;

        connection
            .execute(
                "DELETE FROM \"transaction\" WHERE id = :id",
                &[(":id", &id)],
            )
            .map_err(|error| error.into())
    }
}

impl CreateTable for SQLiteTransactionStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                kind TEXT NOT NULL CHECK (kind IN ('income', 'outcome')),
                value REAL NOT NULL CHECK (value >= 0),
                category_id INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE RESTRICT
            )",
            (),
        )?;

        connection.execute(
            "CREATE INDEX IF NOT EXISTS idx_transaction_category ON \"transaction\"(category_id);",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteTransactionStore {
    type ReturnType = Transaction;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;
        let title = row.get(offset + 1)?;
        let kind = row.get(offset + 2)?;
        let value = row.get(offset + 3)?;
        let created_at = row.get(offset + 4)?;
        let updated_at = row.get(offset + 5)?;
        let category = SQLiteCategoryStore::map_row_with_offset(row, offset + 6)?;

        Ok(Transaction {
            id,
            title,
            kind,
            value,
            category,
            created_at,
            updated_at,
        })
    }
}
