//! Defines the transaction store trait.

use crate::{
    Error,
    models::{Balance, Transaction, TransactionBuilder, TransactionId},
};

/// Handles the creation, retrieval and deletion of transactions.
pub trait TransactionStore {
    /// Create a new transaction in the store.
    fn create(&self, builder: TransactionBuilder) -> Result<Transaction, Error>;

    /// Create many transactions in a single operation.
    ///
    /// Either all transactions are created or none are. The returned
    /// transactions are in the same order as `builders`.
    fn create_many(&self, builders: Vec<TransactionBuilder>) -> Result<Vec<Transaction>, Error>;

    /// Retrieve a transaction from the store.
    fn get(&self, id: TransactionId) -> Result<Transaction, Error>;

    /// Retrieve all transactions in the order they were created.
    fn get_all(&self) -> Result<Vec<Transaction>, Error>;

    /// Remove a transaction from the store, returning the number of transactions removed.
    fn delete(&self, id: TransactionId) -> Result<usize, Error>;

    /// Calculate the balance over every transaction in the store.
    fn balance(&self) -> Result<Balance, Error> {
        let transactions = self.get_all()?;

        Ok(Balance::from_transactions(&transactions))
    }
}
