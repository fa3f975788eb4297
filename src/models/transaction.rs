//! Transaction model
//!
//! A single row of an exported transaction file, normalized so that the
//! aggregator never needs to know which export layout it came from.

use chrono::NaiveDate;
use std::str::FromStr;

use super::money::Money;

/// Direction of money movement for a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    /// Money left the account (spending)
    Debit,
    /// Money entered the account (income, refunds)
    Credit,
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debit" => Ok(TransactionType::Debit),
            "credit" => Ok(TransactionType::Credit),
            other => Err(format!("Unknown transaction type: '{}'", other)),
        }
    }
}

/// A normalized transaction record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Transaction date
    pub date: NaiveDate,

    /// Merchant or description text
    pub description: String,

    /// Category label assigned by the exporting tool
    pub category: String,

    /// Account name
    pub account: String,

    /// Free-text label/tag field, possibly several comma-separated labels
    pub labels: String,

    /// Unsigned amount
    pub amount: Money,

    /// Whether the amount is a debit or a credit
    pub transaction_type: TransactionType,
}

impl Transaction {
    /// Create a transaction from a signed amount (negative means debit)
    pub fn from_signed(
        date: NaiveDate,
        category: impl Into<String>,
        account: impl Into<String>,
        signed_amount: Money,
    ) -> Self {
        let transaction_type = if signed_amount.is_negative() {
            TransactionType::Debit
        } else {
            TransactionType::Credit
        };

        Self {
            date,
            description: String::new(),
            category: category.into(),
            account: account.into(),
            labels: String::new(),
            amount: signed_amount.abs(),
            transaction_type,
        }
    }

    /// Set the label field
    pub fn with_labels(mut self, labels: impl Into<String>) -> Self {
        self.labels = labels.into();
        self
    }

    /// Contribution to the category's net spend: debits add, credits subtract
    pub fn net_spend(&self) -> Money {
        match self.transaction_type {
            TransactionType::Debit => self.amount,
            TransactionType::Credit => -self.amount,
        }
    }

    /// Individual labels, split on commas and trimmed
    pub fn label_list(&self) -> impl Iterator<Item = &str> {
        self.labels
            .split(',')
            .map(str::trim)
            .filter(|l| !l.is_empty())
    }
}
