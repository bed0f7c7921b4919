//! Creating, listing and deleting single transactions.
//!
//! This module contains:
//! - [TransactionService], which enforces that outcomes never exceed the balance,
//! - [DeletionService], which removes transactions by ID,
//! - the JSON endpoints for the `/transactions` routes.

mod create_endpoint;
mod delete;
mod delete_endpoint;
mod list_endpoint;
mod service;

pub use create_endpoint::create_transaction_endpoint;
pub use delete::DeletionService;
pub use delete_endpoint::delete_transaction_endpoint;
pub use list_endpoint::list_transactions_endpoint;
pub use service::{LedgerLock, NewTransaction, TransactionService};
