//! Contains the SQLite backed implementations of the [stores](crate::stores).
//!
//! All stores share a single connection. Each store operation holds the
//! connection lock for the duration of the operation.

mod category;
mod transaction;

pub use category::SQLiteCategoryStore;
pub use transaction::SQLiteTransactionStore;

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::Error;

fn lock_connection(connection: &Arc<Mutex<Connection>>) -> Result<MutexGuard<'_, Connection>, Error> {
    connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })
}

/// Open an in-memory database with the tables for the domain models.
#[cfg(test)]
pub(crate) fn get_test_connection() -> Arc<Mutex<Connection>> {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");
    crate::db::initialize(&connection).expect("Could not initialize database.");

    Arc::new(Mutex::new(connection))
}
