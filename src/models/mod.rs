//! This module defines the domain data types.

pub use balance::Balance;
pub use category::{Category, CategoryTitle};
pub use transaction::{Transaction, TransactionBuilder, TransactionKind, validate_value};

mod balance;
mod category;
mod transaction;

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;

/// Database identifier for a category.
pub type CategoryId = DatabaseId;

/// Database identifier for a transaction.
pub type TransactionId = DatabaseId;
