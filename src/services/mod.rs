//! Services layer
//!
//! Reading transaction exports and reducing them to net amounts per category.

pub mod aggregate;
pub mod import;

pub use aggregate::{net_amounts, TransactionFilter};
pub use import::{parse_transactions, read_transactions, ColumnMapping, ExportLayout};
