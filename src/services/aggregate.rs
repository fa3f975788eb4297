//! Net-amount aggregation
//!
//! Reduces a list of transactions to one signed whole-unit amount per
//! category: debits minus credits, after exclusions and before manual
//! offsets are applied.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use tracing::debug;

use crate::config::Settings;
use crate::models::{CategoryAmounts, Money, Transaction};

/// Which transactions take part in aggregation
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub exclude_categories: HashSet<String>,
    pub exclude_accounts: HashSet<String>,
    pub exclude_labels: HashSet<String>,
    /// Inclusive lower date bound
    pub start: Option<NaiveDate>,
    /// Inclusive upper date bound
    pub end: Option<NaiveDate>,
}

impl TransactionFilter {
    /// Build a filter from the exclusion lists in the settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            exclude_categories: settings.exclude_categories.iter().cloned().collect(),
            exclude_accounts: settings.exclude_accounts.iter().cloned().collect(),
            exclude_labels: settings.exclude_labels.iter().cloned().collect(),
            start: None,
            end: None,
        }
    }

    /// Restrict to an inclusive date window
    pub fn with_date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Check whether a transaction should be counted
    pub fn includes(&self, txn: &Transaction) -> bool {
        if self.exclude_categories.contains(&txn.category)
            || self.exclude_accounts.contains(&txn.account)
        {
            return false;
        }

        // The whole label field counts as one label too, so a listed label
        // that itself contains a comma still matches.
        if self.exclude_labels.contains(&txn.labels)
            || txn.label_list().any(|l| self.exclude_labels.contains(l))
        {
            return false;
        }

        if self.start.is_some_and(|start| txn.date < start)
            || self.end.is_some_and(|end| txn.date > end)
        {
            return false;
        }

        true
    }
}

/// Net spend per category, in whole units, ordered by category name
///
/// Each category's debits minus credits are summed in cents and truncated
/// toward zero. Offsets are added afterwards; an offset for a category with
/// no transactions starts from zero.
pub fn net_amounts(
    transactions: &[Transaction],
    filter: &TransactionFilter,
    offsets: &BTreeMap<String, i64>,
) -> CategoryAmounts {
    let mut sums: BTreeMap<String, Money> = BTreeMap::new();
    let mut excluded = 0usize;

    for txn in transactions {
        if !filter.includes(txn) {
            excluded += 1;
            continue;
        }
        *sums.entry(txn.category.clone()).or_default() += txn.net_spend();
    }

    debug!(
        included = transactions.len() - excluded,
        excluded,
        categories = sums.len(),
        "Aggregated transactions"
    );

    let mut amounts: CategoryAmounts = sums
        .into_iter()
        .map(|(category, total)| (category, total.whole_units()))
        .collect();

    for (category, offset) in offsets {
        *amounts.entry(category.clone()).or_insert(0) += offset;
    }

    amounts
}
