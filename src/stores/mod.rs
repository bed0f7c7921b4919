//! Contains traits and implementations for objects that store the domain [models](crate::models).
//!
//! The services in this crate only see the traits, so the persistence backend
//! is chosen by whoever constructs the services.

mod category;
mod transaction;

pub mod sqlite;

pub use category::CategoryStore;
pub use transaction::TransactionStore;
