//! Sankey - spending flow diagrams from exported transaction data
//!
//! This library turns a transaction export into the text format used by
//! Sankey diagram renderers, showing how income flows into spending
//! categories, savings, and taxes.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: YAML config loading and validation
//! - `error`: Custom error types
//! - `models`: Core data models (transactions, category hierarchy, flow lines)
//! - `services`: CSV import and net-amount aggregation
//! - `reports`: Category rollup, Sankey and flat reports
//! - `cli`: Command handlers used by the binary
//!
//! # Example
//!
//! ```rust,ignore
//! use sankey::config::Settings;
//! use sankey::reports::SankeyReport;
//! use sankey::services::{net_amounts, read_transactions, TransactionFilter};
//!
//! let settings = Settings::load(Path::new("config.yaml"))?;
//! let transactions = read_transactions(&settings.transactions_file)?;
//! let filter = TransactionFilter::from_settings(&settings);
//! let amounts = net_amounts(&transactions, &filter, &settings.category_offsets);
//! let report = SankeyReport::generate(&amounts, &settings, false)?;
//! print!("{}", report.format());
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod reports;
pub mod services;

pub use error::SankeyError;
