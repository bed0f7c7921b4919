//! Creates single transactions while keeping the ledger solvent.

use std::sync::{Arc, Mutex};

use crate::{
    Error,
    models::{CategoryTitle, Transaction, TransactionKind, validate_value},
    stores::{CategoryStore, TransactionStore},
};

/// Serializes the balance check and insert of new transactions.
///
/// Every [TransactionService] that writes to the same ledger must share the same lock.
pub type LedgerLock = Arc<Mutex<()>>;

/// The unvalidated fields for a new transaction, e.g. from a request body.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// A short text describing what the transaction was for.
    pub title: String,
    /// The amount of money.
    pub value: f64,
    /// Either "income" or "outcome".
    pub kind: String,
    /// The title of the category, created if it does not exist yet.
    pub category_title: String,
}

/// Creates transactions and the categories they reference.
#[derive(Debug, Clone)]
pub struct TransactionService<C, T> {
    categories: C,
    transactions: T,
    ledger_lock: LedgerLock,
}

impl<C, T> TransactionService<C, T>
where
    C: CategoryStore,
    T: TransactionStore,
{
    /// Create a service that writes to `categories` and `transactions`.
    pub fn new(categories: C, transactions: T, ledger_lock: LedgerLock) -> Self {
        Self {
            categories,
            transactions,
            ledger_lock,
        }
    }

    /// Validate and store `new_transaction`, creating its category if needed.
    ///
    /// Nothing is written unless every check passes.
    ///
    /// # Errors
    ///
    /// This function will return a:
    /// - [Error::InvalidTransactionKind] if the kind is not exactly "income" or "outcome",
    /// - [Error::InvalidTransactionValue] if the value is negative, NaN or infinite,
    /// - [Error::EmptyCategoryTitle] if the category title is empty,
    /// - [Error::InsufficientFunds] if an outcome is larger than the current total,
    /// - or any error from the stores.
    pub fn create(&self, new_transaction: NewTransaction) -> Result<Transaction, Error> {
        let kind: TransactionKind = new_transaction.kind.parse()?;
        let value = validate_value(new_transaction.value)?;
        let category_title = CategoryTitle::new(&new_transaction.category_title)?;

        let _ledger_guard = self.ledger_lock.lock().map_err(|error| {
            tracing::error!("could not acquire ledger lock: {error}");
            Error::DatabaseLockError
        })?;

        if kind == TransactionKind::Outcome {
            let balance = self.transactions.balance()?;

            if value > balance.total {
                return Err(Error::InsufficientFunds {
                    total: balance.total,
                });
            }
        }

        let category = match self.categories.get_by_title(&category_title)? {
            Some(category) => category,
            None => {
                tracing::debug!("creating category \"{category_title}\"");
                self.categories.create(category_title)?
            }
        };

        self.transactions.create(Transaction::build(
            &new_transaction.title,
            kind,
            value,
            category.id,
        ))
    }
}
