//! CLI command handler for diagram generation
//!
//! Loads the config, reads and aggregates the transaction export, and writes
//! either the Sankey diagram or the flat category listing.

use std::io::Write;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, ValueEnum};

use crate::config::Settings;
use crate::error::{SankeyError, SankeyResult};
use crate::reports::{format_flat, SankeyReport};
use crate::services::{net_amounts, read_transactions, TransactionFilter};

/// Output mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportMode {
    /// Sankey diagram text, ready to paste into a flow-diagram renderer
    Sankey,
    /// Net amount per category, useful for writing a category hierarchy
    Flat,
}

/// Options for a diagram run
#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Path to the config file
    #[arg(long, env = "SANKEY_CONFIG", default_value = "config.yaml")]
    pub config: PathBuf,

    /// Output mode
    #[arg(long, value_enum, default_value_t = ReportMode::Sankey)]
    pub mode: ReportMode,

    /// Only categorize spending (leave income, savings, and taxes out)
    #[arg(long = "only-spend", alias = "onlySpend")]
    pub only_spend: bool,

    /// Ignore transactions before this date (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,

    /// Ignore transactions after this date (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,
}

impl ReportArgs {
    /// Default options for a config file path
    pub fn new(config: impl Into<PathBuf>) -> Self {
        Self {
            config: config.into(),
            mode: ReportMode::Sankey,
            only_spend: false,
            start: None,
            end: None,
        }
    }

    fn date_range(&self) -> SankeyResult<(Option<NaiveDate>, Option<NaiveDate>)> {
        let start = self.start.as_deref().map(parse_date_arg).transpose()?;
        let end = self.end.as_deref().map(parse_date_arg).transpose()?;

        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(SankeyError::Validation(format!(
                    "Start date {} is after end date {}",
                    s, e
                )));
            }
        }

        Ok((start, end))
    }
}

fn parse_date_arg(s: &str) -> SankeyResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
        SankeyError::Validation(format!("Invalid date '{}'. Use YYYY-MM-DD format.", s))
    })
}

/// Handle a diagram run
///
/// Diagram text goes to `out`; the income-gap note goes to `notes`.
pub fn handle_report_command<W: Write, N: Write>(
    args: &ReportArgs,
    out: &mut W,
    notes: &mut N,
) -> SankeyResult<()> {
    let (start, end) = args.date_range()?;

    let settings = Settings::load(&args.config)?;
    let transactions = read_transactions(&settings.transactions_path(&args.config))?;

    let filter = TransactionFilter::from_settings(&settings).with_date_range(start, end);
    let amounts = net_amounts(&transactions, &filter, &settings.category_offsets);

    match args.mode {
        ReportMode::Flat => {
            write!(out, "{}", format_flat(&amounts))?;
        }
        ReportMode::Sankey => {
            let report = SankeyReport::generate(&amounts, &settings, args.only_spend)?;
            if let Some(note) = report.gap_note() {
                writeln!(notes, "{}", note)?;
                writeln!(notes)?;
            }
            write!(out, "{}", report.format())?;
        }
    }

    Ok(())
}
