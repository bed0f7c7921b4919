//! Defines the ledger balance and how it is calculated from transactions.

use serde::{Deserialize, Serialize};

use crate::models::{Transaction, TransactionKind};

/// The income, outcome and resulting total of a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    /// The sum of the values of all income transactions.
    pub income: f64,
    /// The sum of the values of all outcome transactions.
    pub outcome: f64,
    /// `income - outcome`.
    pub total: f64,
}

impl Balance {
    /// Sum up `transactions` by kind.
    ///
    /// The result does not depend on the order of `transactions`, apart from
    /// floating point rounding in the least significant digits.
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let (income, outcome) =
            transactions
                .iter()
                .fold((0.0, 0.0), |(income, outcome), transaction| {
                    match transaction.kind {
                        TransactionKind::Income => (income + transaction.value, outcome),
                        TransactionKind::Outcome => (income, outcome + transaction.value),
                    }
                });

        Self {
            income,
            outcome,
            total: income - outcome,
        }
    }
}
