//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, csv_import::ImportConfig, db::initialize, transaction::LedgerLock};

/// The state of the REST server.
///
/// Route handlers do not use this directly, each one takes a slice of it through
/// [FromRef](axum::extract::FromRef).
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection shared by every store.
    pub db_connection: Arc<Mutex<Connection>>,

    /// Held while checking the balance for and creating a single transaction.
    pub ledger_lock: LedgerLock,

    /// Where uploaded import files go and how long to wait for them.
    pub import_config: ImportConfig,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, import_config: ImportConfig) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
            ledger_lock: Arc::new(Mutex::new(())),
            import_config,
        })
    }
}
