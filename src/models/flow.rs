//! Flow diagram lines
//!
//! Output is line-oriented: each flow renders as `source [amount] destination`
//! and interior categories are followed by a blank separator line.

use std::fmt;

/// One flow between two diagram nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowEdge {
    pub source: String,
    pub destination: String,
    pub amount: i64,
}

impl FlowEdge {
    pub fn new(source: impl Into<String>, amount: i64, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            amount,
        }
    }
}

impl fmt::Display for FlowEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.source, self.amount, self.destination)
    }
}

/// A rendered line of diagram output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagramLine {
    Flow(FlowEdge),
    Separator,
}

impl DiagramLine {
    pub fn flow(source: impl Into<String>, amount: i64, destination: impl Into<String>) -> Self {
        Self::Flow(FlowEdge::new(source, amount, destination))
    }

    pub fn as_flow(&self) -> Option<&FlowEdge> {
        match self {
            Self::Flow(edge) => Some(edge),
            Self::Separator => None,
        }
    }
}

impl fmt::Display for DiagramLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flow(edge) => write!(f, "{}", edge),
            Self::Separator => Ok(()),
        }
    }
}

/// Lines produced for one subtree plus the subtree's signed total
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RollupResult {
    pub lines: Vec<DiagramLine>,
    pub total: i64,
}

impl RollupResult {
    /// True when the subtree was too small to render on its own
    pub fn is_folded(&self) -> bool {
        self.lines.is_empty()
    }

    /// Flow edges only, skipping separators
    pub fn edges(&self) -> impl Iterator<Item = &FlowEdge> {
        self.lines.iter().filter_map(DiagramLine::as_flow)
    }
}

/// Render lines as newline-terminated text
pub fn render_lines(lines: &[DiagramLine]) -> String {
    let mut output = String::new();
    for line in lines {
        output.push_str(&line.to_string());
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_display() {
        let edge = FlowEdge::new("Spending", 300, "Food");
        assert_eq!(edge.to_string(), "Spending [300] Food");
    }

    #[test]
    fn test_negative_amount_display() {
        let edge = FlowEdge::new("Shopping", -75, "Returns");
        assert_eq!(edge.to_string(), "Shopping [-75] Returns");
    }

    #[test]
    fn test_render_lines_with_separator() {
        let lines = vec![
            DiagramLine::flow("Food", 120, "Groceries"),
            DiagramLine::flow("Spending", 120, "Food"),
            DiagramLine::Separator,
        ];
        assert_eq!(
            render_lines(&lines),
            "Food [120] Groceries\nSpending [120] Food\n\n"
        );
    }

    #[test]
    fn test_edges_skip_separators() {
        let result = RollupResult {
            lines: vec![DiagramLine::flow("A", 1, "B"), DiagramLine::Separator],
            total: 1,
        };
        assert_eq!(result.edges().count(), 1);
        assert!(!result.is_folded());
        assert!(RollupResult::default().is_folded());
    }
}
