//! Custom error types for the Sankey generator
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for Sankey generation
#[derive(Error, Debug)]
pub enum SankeyError {
    /// Malformed or incomplete configuration document
    #[error("Configuration error: {0}")]
    Config(String),

    /// A leaf of the category hierarchy has no aggregated amount
    #[error("No spend amount found for leaf category {0}")]
    MissingLeafCategory(String),

    /// Transaction file could not be read or parsed
    #[error("Import error: {0}")]
    Import(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Invalid user input
    #[error("Validation error: {0}")]
    Validation(String),
}

impl SankeyError {
    /// Create a "missing leaf" error for a category name
    pub fn missing_leaf(category: impl Into<String>) -> Self {
        Self::MissingLeafCategory(category.into())
    }

    /// Check if this is a configuration error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check if this is a missing leaf category error
    pub fn is_missing_leaf(&self) -> bool {
        matches!(self, Self::MissingLeafCategory(_))
    }
}

impl From<std::io::Error> for SankeyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_yaml::Error> for SankeyError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type alias for Sankey operations
pub type SankeyResult<T> = Result<T, SankeyError>;
