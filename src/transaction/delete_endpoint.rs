//! Defines the endpoint for deleting a transaction.

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
};

use crate::{
    AppState, Error, extract::PathParam, models::TransactionId,
    stores::sqlite::SQLiteTransactionStore, transaction::DeletionService,
};

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The service for removing transactions.
    pub service: DeletionService<SQLiteTransactionStore>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            service: DeletionService::new(SQLiteTransactionStore::new(
                state.db_connection.clone(),
            )),
        }
    }
}

/// A route handler for deleting a transaction, responds with no content.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    PathParam(transaction_id): PathParam<TransactionId>,
) -> Result<StatusCode, Error> {
    state.service.delete(transaction_id)?;

    tracing::debug!("deleted transaction {transaction_id}");

    Ok(StatusCode::NO_CONTENT)
}
