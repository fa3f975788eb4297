//! Sankey diagram report
//!
//! Combines the spending rollup with the income side of the diagram: income
//! categories flowing into `Net Income`, `Net Income` flowing into
//! `Spending`, `Savings` and `Taxes`, and a balancing `Yearly Surplus` or
//! `Yearly Deficit` node so that inflow and outflow always match.

use tracing::info;

use super::rollup::{rollup_spending, SPENDING_NODE};
use crate::config::Settings;
use crate::error::SankeyResult;
use crate::models::flow::render_lines;
use crate::models::{CategoryAmounts, DiagramLine, RollupResult};

pub const NET_INCOME_NODE: &str = "Net Income";
pub const SAVINGS_NODE: &str = "Savings";
pub const TAXES_NODE: &str = "Taxes";
pub const SURPLUS_NODE: &str = "Yearly Surplus";
pub const DEFICIT_NODE: &str = "Yearly Deficit";

/// A named node collecting a fixed list of categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryBucket {
    /// Bucket node name
    pub name: String,
    /// Matching categories and their amounts, in aggregation order
    pub categories: Vec<(String, i64)>,
    /// Sum of the matching categories
    pub total: i64,
}

impl CategoryBucket {
    /// Collect every aggregated category that appears in `filter`
    pub fn collect(amounts: &CategoryAmounts, name: &str, filter: &[String]) -> Self {
        let categories: Vec<(String, i64)> = amounts
            .iter()
            .filter(|(category, _)| filter.contains(category))
            .map(|(category, amount)| (category.clone(), *amount))
            .collect();
        let total = categories.iter().map(|(_, amount)| amount).sum();

        Self {
            name: name.to_string(),
            categories,
            total,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Lines for `parent -> bucket -> category`, then a separator
    ///
    /// A bucket with no matching categories draws nothing.
    pub fn lines(&self, parent: &str) -> Vec<DiagramLine> {
        if self.is_empty() {
            return Vec::new();
        }

        let mut lines = Vec::with_capacity(self.categories.len() + 2);
        lines.push(DiagramLine::flow(parent, self.total, &self.name));
        for (category, amount) in &self.categories {
            lines.push(DiagramLine::flow(&self.name, *amount, category));
        }
        lines.push(DiagramLine::Separator);
        lines
    }
}

/// Difference between income and everything it flows into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Balance {
    Even,
    /// Income exceeded outflows by this amount
    Surplus(i64),
    /// Outflows exceeded income by this amount
    Deficit(i64),
}

impl Balance {
    pub fn from_residual(residual: i64) -> Self {
        match residual {
            0 => Balance::Even,
            r if r > 0 => Balance::Surplus(r),
            r => Balance::Deficit(-r),
        }
    }

    /// Signed residual (income minus outflows)
    pub fn residual(&self) -> i64 {
        match self {
            Balance::Even => 0,
            Balance::Surplus(amount) => *amount,
            Balance::Deficit(amount) => -amount,
        }
    }

    /// The synthetic line that makes the diagram balance
    pub fn line(&self) -> Option<DiagramLine> {
        match self {
            Balance::Even => None,
            Balance::Surplus(amount) => {
                Some(DiagramLine::flow(NET_INCOME_NODE, *amount, SURPLUS_NODE))
            }
            Balance::Deficit(amount) => {
                Some(DiagramLine::flow(DEFICIT_NODE, *amount, NET_INCOME_NODE))
            }
        }
    }
}

/// The income half of the diagram
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomeFlows {
    /// Income categories with their (negative) net amounts
    pub sources: Vec<(String, i64)>,
    /// Total income, as a positive amount
    pub net_income: i64,
    pub savings: CategoryBucket,
    pub taxes: CategoryBucket,
    pub balance: Balance,
}

impl IncomeFlows {
    /// Work out the income side for a given spending total
    pub fn generate(amounts: &CategoryAmounts, settings: &Settings, total_spending: i64) -> Self {
        let sources: Vec<(String, i64)> = amounts
            .iter()
            .filter(|(category, _)| settings.net_income_categories.contains(category))
            .map(|(category, amount)| (category.clone(), *amount))
            .collect();
        let net_income = -sources.iter().map(|(_, amount)| amount).sum::<i64>();

        let savings = CategoryBucket::collect(amounts, SAVINGS_NODE, &settings.saving_categories);
        let taxes = CategoryBucket::collect(amounts, TAXES_NODE, &settings.tax_categories);

        let balance =
            Balance::from_residual(net_income - total_spending - savings.total - taxes.total);

        Self {
            sources,
            net_income,
            savings,
            taxes,
            balance,
        }
    }

    fn lines(&self, total_spending: i64) -> Vec<DiagramLine> {
        let mut lines: Vec<DiagramLine> = self
            .sources
            .iter()
            .map(|(category, amount)| DiagramLine::flow(category, -amount, NET_INCOME_NODE))
            .collect();
        lines.push(DiagramLine::flow(NET_INCOME_NODE, total_spending, SPENDING_NODE));
        lines.extend(self.savings.lines(NET_INCOME_NODE));
        lines.extend(self.taxes.lines(NET_INCOME_NODE));
        lines.extend(self.balance.line());
        lines
    }
}

/// Sankey diagram report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SankeyReport {
    /// Spending hierarchy rollup
    pub spending: RollupResult,
    /// Income side, absent when only spending is drawn
    pub income: Option<IncomeFlows>,
}

impl SankeyReport {
    /// Generate the diagram for a set of aggregated amounts
    ///
    /// # Errors
    ///
    /// Fails when a leaf of the configured hierarchy has no aggregated amount.
    pub fn generate(
        amounts: &CategoryAmounts,
        settings: &Settings,
        only_spend: bool,
    ) -> SankeyResult<Self> {
        let spending = rollup_spending(amounts, &settings.categories, settings.threshold())?;

        let income = if only_spend {
            None
        } else {
            Some(IncomeFlows::generate(amounts, settings, spending.total))
        };

        if let Some(gap) = income.as_ref().map(|i| i.balance.residual()).filter(|g| *g != 0) {
            info!(gap, total_spending = spending.total, "Income and spending do not reconcile");
        }

        Ok(Self { spending, income })
    }

    /// Grand total of all spending
    pub fn total_spending(&self) -> i64 {
        self.spending.total
    }

    /// All diagram lines in output order
    pub fn lines(&self) -> Vec<DiagramLine> {
        let mut lines = self.spending.lines.clone();
        if let Some(income) = &self.income {
            lines.extend(income.lines(self.spending.total));
        }
        lines
    }

    /// Format the diagram as flow-diagram text
    pub fn format(&self) -> String {
        render_lines(&self.lines())
    }

    /// Explanation of the balancing node, when one is drawn
    pub fn gap_note(&self) -> Option<String> {
        let gap = self.income.as_ref()?.balance.residual();
        if gap == 0 {
            return None;
        }

        Some(format!(
            "NOTE: There is a ${} gap between net income and spending \
             (a negative value means you spent more than your income). \
             It is drawn as a \"{}\" or \"{}\" node so that the diagram's \
             flows line up.",
            gap, DEFICIT_NODE, SURPLUS_NODE
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryTree;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn settings(categories: CategoryTree, threshold: u32) -> Settings {
        Settings {
            transactions_file: PathBuf::from("transactions.csv"),
            categories,
            min_category_amount: threshold,
            net_income_categories: vec!["Paycheck".into(), "Interest".into()],
            exclude_categories: Vec::new(),
            exclude_accounts: Vec::new(),
            exclude_labels: Vec::new(),
            category_offsets: BTreeMap::new(),
            saving_categories: vec!["Brokerage".into()],
            tax_categories: vec!["Federal Tax".into(), "State Tax".into()],
        }
    }

    fn amounts(pairs: &[(&str, i64)]) -> CategoryAmounts {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_surplus_balancing() {
        let data = amounts(&[
            ("Paycheck", -1000),
            ("Rent", 800),
            ("Brokerage", 100),
            ("Federal Tax", 50),
        ]);
        let settings = settings(CategoryTree::leaves(["Rent"]), 10);

        let report = SankeyReport::generate(&data, &settings, false).unwrap();
        let income = report.income.as_ref().unwrap();

        assert_eq!(income.net_income, 1000);
        assert_eq!(income.balance, Balance::Surplus(50));
        assert_eq!(
            report.format(),
            "Spending [800] Rent\n\
             Paycheck [1000] Net Income\n\
             Net Income [800] Spending\n\
             Net Income [100] Savings\n\
             Savings [100] Brokerage\n\
             \n\
             Net Income [50] Taxes\n\
             Taxes [50] Federal Tax\n\
             \n\
             Net Income [50] Yearly Surplus\n"
        );
        assert!(report.gap_note().unwrap().contains("$50 gap"));
    }

    #[test]
    fn test_deficit_balancing() {
        let data = amounts(&[("Paycheck", -500), ("Rent", 800)]);
        let settings = settings(CategoryTree::leaves(["Rent"]), 10);

        let report = SankeyReport::generate(&data, &settings, false).unwrap();
        let lines: Vec<String> = report.lines().iter().map(|l| l.to_string()).collect();

        assert_eq!(
            lines.last().map(String::as_str),
            Some("Yearly Deficit [300] Net Income")
        );
        assert!(report.gap_note().unwrap().contains("$-300 gap"));
    }

    #[test]
    fn test_balanced_diagram_has_no_extra_node() {
        let data = amounts(&[("Paycheck", -900), ("Interest", -100), ("Rent", 1000)]);
        let settings = settings(CategoryTree::leaves(["Rent"]), 10);

        let report = SankeyReport::generate(&data, &settings, false).unwrap();
        let text = report.format();

        assert!(!text.contains(SURPLUS_NODE));
        assert!(!text.contains(DEFICIT_NODE));
        assert!(text.contains("Interest [100] Net Income\n"));
        assert!(text.contains("Paycheck [900] Net Income\n"));
        assert!(report.gap_note().is_none());
    }

    #[test]
    fn test_empty_buckets_are_omitted() {
        let data = amounts(&[("Paycheck", -800), ("Rent", 800)]);
        let settings = settings(CategoryTree::leaves(["Rent"]), 10);

        let report = SankeyReport::generate(&data, &settings, false).unwrap();
        let text = report.format();

        assert!(!text.contains(SAVINGS_NODE));
        assert!(!text.contains(TAXES_NODE));
    }

    #[test]
    fn test_only_spend_skips_income_side() {
        let data = amounts(&[("Paycheck", -1000), ("Food", 300), ("Fun", 50)]);
        let settings = settings(CategoryTree::leaves(["Food", "Fun"]), 100);

        let report = SankeyReport::generate(&data, &settings, true).unwrap();

        assert!(report.income.is_none());
        assert_eq!(report.total_spending(), 350);
        assert_eq!(
            report.format(),
            "Spending [300] Food\nSpending [50] Misc. Spending spending\n"
        );
        assert!(report.gap_note().is_none());
    }

    #[test]
    fn test_missing_leaf_propagates() {
        let data = amounts(&[("Paycheck", -1000)]);
        let settings = settings(CategoryTree::leaves(["Rent"]), 10);

        let err = SankeyReport::generate(&data, &settings, false).unwrap_err();
        assert!(err.is_missing_leaf());
    }

    #[test]
    fn test_balance_from_residual() {
        assert_eq!(Balance::from_residual(0), Balance::Even);
        assert_eq!(Balance::from_residual(25), Balance::Surplus(25));
        assert_eq!(Balance::from_residual(-25), Balance::Deficit(25));
        assert_eq!(Balance::Deficit(25).residual(), -25);
    }

    #[test]
    fn test_bucket_sums_matching_categories() {
        let data = amounts(&[("Federal Tax", 4000), ("State Tax", 1200), ("Rent", 9000)]);
        let filter = vec!["Federal Tax".to_string(), "State Tax".to_string(), "Local Tax".into()];

        let bucket = CategoryBucket::collect(&data, TAXES_NODE, &filter);

        assert_eq!(bucket.total, 5200);
        assert_eq!(bucket.categories.len(), 2);
        let lines: Vec<String> = bucket.lines("Net Income").iter().map(|l| l.to_string()).collect();
        assert_eq!(
            lines,
            vec![
                "Net Income [5200] Taxes",
                "Taxes [4000] Federal Tax",
                "Taxes [1200] State Tax",
                "",
            ]
        );
    }
}
