//! Drops categorized transactions that cannot be used downstream.

use crate::transaction::{CategorizedTransaction, ValidatedTransaction};

impl CategorizedTransaction {
    /// Keep the transaction iff it has a non-empty date, a non-empty
    /// description and an amount that reads as a finite number.
    pub fn validate(self) -> Option<ValidatedTransaction> {
        let date = self.date.filter(|d| !d.is_empty())?;
        let description = self.description.filter(|d| !d.is_empty())?;
        let amount = self.amount.as_ref().and_then(|a| a.to_number())?;

        Some(ValidatedTransaction {
            date,
            description,
            amount,
            kind: self.kind,
            category: self.category,
        })
    }
}

/// Order-preserving filter. Never adds entries.
pub fn validate_transactions(
    txns: impl IntoIterator<Item = CategorizedTransaction>,
) -> Vec<ValidatedTransaction> {
    txns.into_iter().filter_map(CategorizedTransaction::validate).collect()
}
