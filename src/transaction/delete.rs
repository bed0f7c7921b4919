//! Deleting transactions by ID.

use crate::{Error, models::TransactionId, stores::TransactionStore};

/// Removes transactions from the ledger.
#[derive(Debug, Clone)]
pub struct DeletionService<T> {
    transactions: T,
}

impl<T> DeletionService<T>
where
    T: TransactionStore,
{
    /// Create a service that deletes from `transactions`.
    pub fn new(transactions: T) -> Self {
        Self { transactions }
    }

    /// Permanently delete the transaction with `id`.
    ///
    /// # Errors
    ///
    /// Returns an [Error::TransactionNotFound] if there is no transaction with `id`,
    /// or any error from the store.
    pub fn delete(&self, id: TransactionId) -> Result<(), Error> {
        match self.transactions.get(id) {
            Ok(_) => {}
            Err(Error::NotFound) => return Err(Error::TransactionNotFound(id)),
            Err(error) => return Err(error),
        }

        // Another request may have deleted it since the lookup.
        match self.transactions.delete(id)? {
            0 => Err(Error::TransactionNotFound(id)),
            _ => Ok(()),
        }
    }
}
