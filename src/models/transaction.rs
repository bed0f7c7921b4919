//! This file defines the type `Transaction`, the core type of the ledger.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    models::{Category, CategoryId, TransactionId},
};

/// Whether money came into the ledger or went out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money earned, e.g. a salary payment.
    Income,
    /// Money spent, e.g. rent.
    Outcome,
}

impl TransactionKind {
    /// The lowercase name used in JSON, CSV files and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Outcome => "outcome",
        }
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    /// Parse exactly "income" or "outcome".
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidTransactionKind] for any other string,
    /// including differently cased variants such as "Income".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionKind::Income),
            "outcome" => Ok(TransactionKind::Outcome),
            other => Err(Error::InvalidTransactionKind(other.to_owned())),
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|_| FromSqlError::InvalidType)
    }
}

/// Check that `value` can be stored as a transaction value.
///
/// # Errors
///
/// Returns an [Error::InvalidTransactionValue] if `value` is negative, NaN or infinite.
pub fn validate_value(value: f64) -> Result<f64, Error> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(Error::InvalidTransactionValue(value))
    }
}

/// An income or outcome, i.e. an event where money was either earned or spent.
///
/// To create a new `Transaction`, use [Transaction::build] and pass the builder
/// to a [TransactionStore](crate::stores::TransactionStore).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// A short text describing what the transaction was for.
    pub title: String,
    /// Whether the transaction is an income or an outcome.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The amount of money, always zero or positive.
    pub value: f64,
    /// The category the transaction belongs to.
    pub category: Category,
    /// When the transaction was stored.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the transaction was last written to the store.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        title: &str,
        kind: TransactionKind,
        value: f64,
        category_id: CategoryId,
    ) -> TransactionBuilder {
        TransactionBuilder {
            title: title.to_owned(),
            kind,
            value,
            category_id,
        }
    }
}

/// The fields of a transaction that has not been stored yet.
///
/// The store assigns the ID and timestamps.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// A short text describing what the transaction was for, e.g. "rent".
    pub title: String,
    /// Whether the transaction is an income or an outcome.
    pub kind: TransactionKind,
    /// The amount of money, must be zero or positive.
    pub value: f64,
    /// The ID of an existing category.
    pub category_id: CategoryId,
}

#[cfg(test)]
mod tests {
    use crate::{
        Error,
        models::{TransactionKind, validate_value},
    };

    #[test]
    fn parses_kinds() {
        assert_eq!("income".parse::<TransactionKind>(), Ok(TransactionKind::Income));
        assert_eq!("outcome".parse::<TransactionKind>(), Ok(TransactionKind::Outcome));
    }

    #[test]
    fn rejects_unknown_kind() {
        let kind = "transfer".parse::<TransactionKind>();

        assert_eq!(
            kind,
            Err(Error::InvalidTransactionKind("transfer".to_owned()))
        );
    }

    #[test]
    fn kind_parsing_is_exact() {
        let kind = "Income".parse::<TransactionKind>();

        assert_eq!(kind, Err(Error::InvalidTransactionKind("Income".to_owned())));
    }

    #[test]
    fn kind_serializes_lowercase() {
        let json = serde_json::to_string(&TransactionKind::Outcome).unwrap();

        assert_eq!(json, "\"outcome\"");
    }

    #[test]
    fn validate_value_accepts_zero_and_positive() {
        assert_eq!(validate_value(0.0), Ok(0.0));
        assert_eq!(validate_value(12.5), Ok(12.5));
    }

    #[test]
    fn validate_value_rejects_negative() {
        assert_eq!(validate_value(-1.0), Err(Error::InvalidTransactionValue(-1.0)));
    }

    #[test]
    fn validate_value_rejects_non_finite() {
        assert!(validate_value(f64::NAN).is_err());
        assert!(validate_value(f64::INFINITY).is_err());
    }
}
