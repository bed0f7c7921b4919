//! Defines the endpoint for creating a new transaction.

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use serde::{Deserialize, Deserializer};

use crate::{
    AppState, Error,
    extract::JsonBody,
    models::Transaction,
    stores::sqlite::{SQLiteCategoryStore, SQLiteTransactionStore},
    transaction::{NewTransaction, TransactionService},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The service that checks and stores new transactions.
    pub service: TransactionService<SQLiteCategoryStore, SQLiteTransactionStore>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            service: TransactionService::new(
                SQLiteCategoryStore::new(state.db_connection.clone()),
                SQLiteTransactionStore::new(state.db_connection.clone()),
                state.ledger_lock.clone(),
            ),
        }
    }
}

/// The request body for creating a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionRequest {
    /// A short text describing what the transaction was for.
    pub title: String,
    /// The amount of money, either a JSON number or a string such as "12.50".
    #[serde(deserialize_with = "number_or_string")]
    pub value: f64,
    /// Either "income" or "outcome", in any case.
    #[serde(rename = "type")]
    pub kind: String,
    /// The title of the category for the transaction.
    pub category: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    String(String),
}

fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(number) => Ok(number),
        NumberOrString::String(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("\"{text}\" is not a number"))),
    }
}

impl From<TransactionRequest> for NewTransaction {
    fn from(request: TransactionRequest) -> Self {
        Self {
            title: request.title,
            value: request.value,
            kind: request.kind.to_lowercase(),
            category_title: request.category,
        }
    }
}

/// A route handler for creating a new transaction, responds with the created transaction.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    JsonBody(request): JsonBody<TransactionRequest>,
) -> Result<(StatusCode, Json<Transaction>), Error> {
    let transaction = state.service.create(request.into())?;

    tracing::debug!("created transaction {}", transaction.id);

    Ok((StatusCode::CREATED, Json(transaction)))
}
