//! CSV Import service
//!
//! Reads exported transaction files. Two export layouts are recognized from
//! the header row: one with a signed `Amount` column, and one with an
//! unsigned `Amount` plus a `Transaction Type` column saying debit or credit.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::error::{SankeyError, SankeyResult};
use crate::models::{Money, Transaction, TransactionType};

/// Date formats tried, in order, for the date column
const DATE_FORMATS: [&str; 8] = [
    "%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%d/%m/%Y", "%d/%m/%y", "%Y/%m/%d", "%m-%d-%Y",
    "%d-%m-%Y",
];

/// Export layout detected from the header row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportLayout {
    /// `Date, Merchant, Category, Account, Original Statement, Notes, Amount, Tags`
    Signed,
    /// `Date, Description, Original Description, Amount, Transaction Type,
    /// Category, Account Name, Labels, Notes`
    Polarity,
}

impl ExportLayout {
    fn required_headers(&self) -> &'static [&'static str] {
        match self {
            ExportLayout::Signed => &["Date", "Category", "Account", "Amount"],
            ExportLayout::Polarity => &[
                "Date",
                "Amount",
                "Transaction Type",
                "Category",
                "Account Name",
            ],
        }
    }
}

/// Column positions for one export file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub layout: ExportLayout,
    pub date_column: usize,
    pub amount_column: usize,
    pub category_column: usize,
    pub account_column: usize,
    /// Only present in the polarity layout
    pub type_column: Option<usize>,
    pub description_column: Option<usize>,
    pub labels_column: Option<usize>,
}

impl ColumnMapping {
    /// Detect the layout and column positions from a header record
    pub fn detect(headers: &StringRecord) -> SankeyResult<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };

        let layout = if find("Transaction Type").is_some() {
            ExportLayout::Polarity
        } else {
            ExportLayout::Signed
        };

        let missing: Vec<&str> = layout
            .required_headers()
            .iter()
            .copied()
            .filter(|h| find(*h).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(SankeyError::Import(format!(
                "Unrecognized CSV header: missing column(s) {:?}; expected {:?} or {:?}",
                missing,
                ExportLayout::Signed.required_headers(),
                ExportLayout::Polarity.required_headers(),
            )));
        }

        let required = |name: &str| {
            find(name)
                .ok_or_else(|| SankeyError::Import(format!("Missing column '{}'", name)))
        };

        let mapping = match layout {
            ExportLayout::Signed => Self {
                layout,
                date_column: required("Date")?,
                amount_column: required("Amount")?,
                category_column: required("Category")?,
                account_column: required("Account")?,
                type_column: None,
                description_column: find("Merchant"),
                labels_column: find("Tags"),
            },
            ExportLayout::Polarity => Self {
                layout,
                date_column: required("Date")?,
                amount_column: required("Amount")?,
                category_column: required("Category")?,
                account_column: required("Account Name")?,
                type_column: find("Transaction Type"),
                description_column: find("Description"),
                labels_column: find("Labels"),
            },
        };

        Ok(mapping)
    }

    /// Parse a single CSV record
    fn parse_record(&self, record: &StringRecord) -> Result<Transaction, String> {
        let field = |col: usize, name: &str| {
            record
                .get(col)
                .ok_or_else(|| format!("Missing {} column", name))
        };
        let optional = |col: Option<usize>| {
            col.and_then(|c| record.get(c))
                .map(str::to_string)
                .unwrap_or_default()
        };

        let date = parse_date(field(self.date_column, "date")?)?;

        let amount_str = field(self.amount_column, "amount")?;
        let amount = Money::parse(amount_str)
            .map_err(|e| format!("Could not parse amount '{}': {}", amount_str, e))?;

        let category = field(self.category_column, "category")?.to_string();
        let account = field(self.account_column, "account")?.to_string();

        let mut transaction = match self.type_column {
            Some(col) => {
                let transaction_type: TransactionType =
                    field(col, "transaction type")?.parse()?;
                Transaction {
                    date,
                    description: String::new(),
                    category,
                    account,
                    labels: String::new(),
                    amount: amount.abs(),
                    transaction_type,
                }
            }
            None => Transaction::from_signed(date, category, account, amount),
        };

        transaction.description = optional(self.description_column);
        transaction.labels = optional(self.labels_column);
        Ok(transaction)
    }
}

/// Parse a date string using multiple format attempts
fn parse_date(s: &str) -> Result<NaiveDate, String> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
        .ok_or_else(|| format!("Could not parse date: '{}'", s))
}

/// Read every transaction from an export file
pub fn read_transactions(path: &Path) -> SankeyResult<Vec<Transaction>> {
    let file = File::open(path).map_err(|e| {
        SankeyError::Import(format!(
            "Failed to open transactions file {}: {}",
            path.display(),
            e
        ))
    })?;
    parse_transactions(file)
}

/// Parse transactions from any CSV source with a header row
pub fn parse_transactions<R: Read>(source: R) -> SankeyResult<Vec<Transaction>> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| SankeyError::Import(format!("Error reading CSV header: {}", e)))?
        .clone();
    let mapping = ColumnMapping::detect(&headers)?;
    debug!(layout = ?mapping.layout, "Detected CSV layout");

    let mut transactions = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result
            .map_err(|e| SankeyError::Import(format!("Row {}: {}", idx + 1, e)))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let transaction = mapping
            .parse_record(&record)
            .map_err(|e| SankeyError::Import(format!("Row {}: {}", idx + 1, e)))?;
        transactions.push(transaction);
    }

    debug!(count = transactions.len(), "Parsed transactions");
    Ok(transactions)
}
