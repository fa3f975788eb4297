//! Flat category listing
//!
//! One `{category}: {amount}` line per aggregated category. Handy when
//! writing the category hierarchy for a new config file.

use crate::models::CategoryAmounts;

/// Format the net amounts, one category per line
pub fn format_flat(amounts: &CategoryAmounts) -> String {
    let mut output = String::new();
    for (category, amount) in amounts {
        output.push_str(&format!("{}: {}\n", category, amount));
    }
    output
}
