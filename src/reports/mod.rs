//! Reports module
//!
//! The category rollup at the heart of the diagram, the Sankey report built
//! on top of it, and the flat per-category listing.

pub mod flat;
pub mod rollup;
pub mod sankey;

pub use flat::format_flat;
pub use rollup::{rollup, rollup_spending, SPENDING_NODE};
pub use sankey::{Balance, CategoryBucket, IncomeFlows, SankeyReport};
