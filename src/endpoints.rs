//! The API endpoints URIs.
//!
//! Endpoints that take a parameter use axum's path syntax, e.g. '/transactions/{transaction_id}'.

/// The route for listing and creating transactions.
pub const TRANSACTIONS: &str = "/transactions";
/// The route for deleting a single transaction.
pub const DELETE_TRANSACTION: &str = "/transactions/{transaction_id}";
/// The route for importing transactions from a CSV file.
pub const IMPORT: &str = "/transactions/import";
/// The route to request a cup of coffee (experimental).
pub const COFFEE: &str = "/api/coffee";
