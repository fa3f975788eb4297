//! Core data models
//!
//! Transactions as read from an export, the category hierarchy from the
//! config file, and the flow lines the diagram is made of.

pub mod category_tree;
pub mod flow;
pub mod money;
pub mod transaction;

pub use category_tree::CategoryTree;
pub use flow::{DiagramLine, FlowEdge, RollupResult};
pub use money::Money;
pub use transaction::{Transaction, TransactionType};

use std::collections::BTreeMap;

/// Net amount per category (positive = net outflow), ordered by name
pub type CategoryAmounts = BTreeMap<String, i64>;
