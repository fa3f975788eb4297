//! Hierarchical category rollup
//!
//! Walks the configured category hierarchy and turns the flat net-amount map
//! into flow lines. Categories whose magnitude is below the threshold are not
//! drawn on their own; their amounts are folded into a `Misc. {parent}
//! spending` node under the parent so that every node's total is still the
//! exact sum of its children.

use tracing::trace;

use crate::error::{SankeyError, SankeyResult};
use crate::models::{CategoryAmounts, CategoryTree, DiagramLine, RollupResult};

/// Name of the node every spending category ultimately flows from
pub const SPENDING_NODE: &str = "Spending";

/// Name of the synthetic node collecting a category's small subcategories
pub fn misc_node_name(category: &str) -> String {
    format!("Misc. {} spending", category)
}

/// Roll up the whole hierarchy under the `Spending` root
///
/// The returned total is the grand total of all spending, whether drawn
/// explicitly or folded into misc nodes.
pub fn rollup_spending(
    amounts: &CategoryAmounts,
    hierarchy: &CategoryTree,
    threshold: i64,
) -> SankeyResult<RollupResult> {
    rollup(amounts, "", SPENDING_NODE, hierarchy, threshold)
}

/// Roll up one node of the hierarchy
///
/// An empty `parent` marks the root, which emits no summary line of its own.
/// A result with no lines means the node was below the threshold and its
/// total should be folded into the caller's misc node.
///
/// # Errors
///
/// Returns [`SankeyError::MissingLeafCategory`] when a leaf has no entry in
/// `amounts`.
pub fn rollup(
    amounts: &CategoryAmounts,
    parent: &str,
    name: &str,
    subtree: &CategoryTree,
    threshold: i64,
) -> SankeyResult<RollupResult> {
    let children = match subtree {
        CategoryTree::Leaf => return rollup_leaf(amounts, parent, name, threshold),
        CategoryTree::Interior(children) => children,
    };

    let mut lines = Vec::new();
    let mut category_total = 0;
    let mut misc_total = 0;

    for (child_name, child_tree) in children {
        let child = rollup(amounts, name, child_name, child_tree, threshold)?;
        if child.is_folded() {
            misc_total += child.total;
        } else {
            lines.extend(child.lines);
        }
        category_total += child.total;
    }

    // Negative misc totals are never drawn; see DESIGN.md.
    if misc_total > 0 {
        lines.push(DiagramLine::flow(name, misc_total, misc_node_name(name)));
    }

    if !parent.is_empty() {
        lines.push(DiagramLine::flow(parent, category_total, name));
        lines.push(DiagramLine::Separator);
    }

    Ok(RollupResult {
        lines,
        total: category_total,
    })
}

fn rollup_leaf(
    amounts: &CategoryAmounts,
    parent: &str,
    name: &str,
    threshold: i64,
) -> SankeyResult<RollupResult> {
    let amount = *amounts
        .get(name)
        .ok_or_else(|| SankeyError::missing_leaf(name))?;

    if amount.abs() < threshold {
        trace!(category = name, amount, threshold, "Folding category into misc");
        return Ok(RollupResult {
            lines: Vec::new(),
            total: amount,
        });
    }

    Ok(RollupResult {
        lines: vec![DiagramLine::flow(parent, amount, name)],
        total: amount,
    })
}
