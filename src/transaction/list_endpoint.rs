//! Defines the endpoint for listing every transaction with the ledger balance.

use axum::{
    Json,
    extract::{FromRef, State},
};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    models::{Balance, Transaction},
    stores::{TransactionStore, sqlite::SQLiteTransactionStore},
};

/// The state needed to list transactions.
#[derive(Debug, Clone)]
pub struct ListTransactionsState {
    /// The store for reading transactions.
    pub transactions: SQLiteTransactionStore,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transactions: SQLiteTransactionStore::new(state.db_connection.clone()),
        }
    }
}

/// The response body for the transaction list.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct TransactionList {
    /// Every transaction in the order they were created.
    pub transactions: Vec<Transaction>,
    /// The balance over `transactions`.
    pub balance: Balance,
}

/// A route handler that returns all transactions and their balance.
pub async fn list_transactions_endpoint(
    State(state): State<ListTransactionsState>,
) -> Result<Json<TransactionList>, Error> {
    let transactions = state.transactions.get_all()?;
    let balance = Balance::from_transactions(&transactions);

    Ok(Json(TransactionList {
        transactions,
        balance,
    }))
}

#[cfg(test)]
mod tests {
    use axum::extract::State;

    use crate::{
        models::{Balance, CategoryTitle, Transaction, TransactionKind},
        stores::{
            CategoryStore, TransactionStore,
            sqlite::{SQLiteCategoryStore, SQLiteTransactionStore, get_test_connection},
        },
    };

    use super::{ListTransactionsState, list_transactions_endpoint};

    #[tokio::test]
    async fn empty_ledger_has_zero_balance() {
        let state = ListTransactionsState {
            transactions: SQLiteTransactionStore::new(get_test_connection()),
        };

        let list = list_transactions_endpoint(State(state)).await.unwrap().0;

        assert!(list.transactions.is_empty());
        assert_eq!(list.balance, Balance::default());
    }

    #[tokio::test]
    async fn lists_transactions_with_balance() {
        let connection = get_test_connection();
        let category = SQLiteCategoryStore::new(connection.clone())
            .create(CategoryTitle::new_unchecked("Work"))
            .unwrap();
        let transactions = SQLiteTransactionStore::new(connection);
        let want = transactions
            .create_many(vec![
                Transaction::build("salary", TransactionKind::Income, 2000.0, category.id),
                Transaction::build("lunch", TransactionKind::Outcome, 12.5, category.id),
            ])
            .unwrap();
        let state = ListTransactionsState { transactions };

        let list = list_transactions_endpoint(State(state)).await.unwrap().0;

        assert_eq!(list.transactions, want);
        assert_eq!(
            list.balance,
            Balance {
                income: 2000.0,
                outcome: 12.5,
                total: 1987.5,
            }
        );
    }
}
