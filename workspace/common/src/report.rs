//! The full analysis report and its building blocks.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::statistics::{CategoryGrowth, TrendResult};

/// Per-month budget figures computed relative to an explicit reference date.
///
/// All divisions behind these fields resolve a zero denominator to zero, so
/// the struct never carries infinities or NaN-like values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStats {
    /// Days of the month already elapsed (the reference date's day-of-month).
    pub days_passed: u32,
    /// Days left in the month, never negative.
    pub days_remaining: u32,
    /// Expense magnitude accumulated this month.
    pub monthly_spent: Decimal,
    /// `monthly_spent / days_passed`, zero when no day has elapsed.
    pub avg_daily_spending: Decimal,
    /// Monthly income minus monthly spending. Negative means over budget.
    pub remaining_budget: Decimal,
    /// Budget left per remaining day. Negative signals the overspend rate.
    pub max_daily_spending: Decimal,
    /// Average daily spending extrapolated over the whole month.
    pub projected_monthly_spending: Decimal,
    /// Monthly income minus the projected monthly spending.
    pub projected_end_balance: Decimal,
}

/// The category the most money went to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCategory {
    pub name: String,
    pub amount: Decimal,
    pub percentage: Decimal,
}

/// A structured, rule-derived recommendation or warning.
///
/// Variants carry the figures needed to render any message format; the
/// [`Suggestion::message`] renderer is one possible presentation, not the
/// primary output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Suggestion {
    /// One category exceeds 30% of total spending.
    ReduceSpending {
        category: String,
        percentage: Decimal,
        amount: Decimal,
    },
    /// The monthly budget has been exceeded.
    OverBudget { exceeded_by: Decimal },
    /// Less than 10% of the monthly income remains.
    LowBudget {
        remaining: Decimal,
        percent_of_income: Decimal,
    },
    /// The current spending rate projects a negative end-of-month balance.
    ProjectedNegative { deficit: Decimal },
}

impl Suggestion {
    /// Renders a human-readable message for this suggestion.
    pub fn message(&self) -> String {
        match self {
            Suggestion::ReduceSpending {
                category,
                percentage,
                ..
            } => format!(
                "Consider reducing spending on {category} (currently {percentage}% of total expenses)"
            ),
            Suggestion::OverBudget { exceeded_by } => {
                format!("You've exceeded your monthly budget by {exceeded_by}")
            }
            Suggestion::LowBudget {
                remaining,
                percent_of_income,
            } => format!(
                "You have only {remaining} left this month ({percent_of_income}% of income)"
            ),
            Suggestion::ProjectedNegative { deficit } => {
                format!("At the current spending rate, you'll have a deficit of {deficit} by month end")
            }
        }
    }
}

/// The extended analytics block: grouped statistics, trend, rolling averages
/// and category growth. Absent from the report when no dated expense rows
/// survive normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analytics {
    /// Expense magnitude per category (dated rows only).
    pub category_totals: BTreeMap<String, Decimal>,
    /// Mean expense magnitude per category.
    pub category_avg: BTreeMap<String, Decimal>,
    /// Expense transaction count per category.
    pub category_counts: BTreeMap<String, u64>,
    /// Expense magnitude per calendar month, keyed `YYYY-MM`.
    pub monthly_totals: BTreeMap<String, Decimal>,
    /// Mean expense magnitude per calendar month, keyed `YYYY-MM`.
    pub monthly_avg: BTreeMap<String, Decimal>,
    /// Mean expense magnitude per weekday name.
    pub weekday_avg: BTreeMap<String, Decimal>,
    /// Expense magnitude per (category, month) pair, keyed `{category}_{YYYY-MM}`.
    pub category_monthly: BTreeMap<String, Decimal>,
    /// Monthly spending trend, absent below two observed months.
    pub trend: Option<TrendResult>,
    /// Trailing mean over the last up-to-7 expense observations.
    pub current_7day_avg: Decimal,
    /// Trailing mean over the last up-to-30 expense observations.
    pub current_30day_avg: Decimal,
    /// Recent-vs-prior 30-day window comparison per category.
    pub growth: Option<CategoryGrowth>,
}

/// The full analysis report.
///
/// Monetary figures are rounded to 2 decimal places and percentages to 1,
/// applied at this boundary only; intermediate computation keeps full
/// precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub total_spent: Decimal,
    pub total_income: Decimal,
    pub balance: Decimal,
    /// Lifetime expense magnitude per category, dated or not.
    pub categories: BTreeMap<String, Decimal>,
    /// Share of total spending per category, empty when nothing was spent.
    pub percentages: BTreeMap<String, Decimal>,
    pub most_spent_category: Option<TopCategory>,
    pub suggestions: Vec<Suggestion>,
    pub monthly_stats: MonthlyStats,
    pub analytics: Option<Analytics>,
}

impl Report {
    /// The well-defined zeroed report returned for an empty transaction list.
    pub fn empty() -> Self {
        Self {
            total_spent: Decimal::ZERO,
            total_income: Decimal::ZERO,
            balance: Decimal::ZERO,
            categories: BTreeMap::new(),
            percentages: BTreeMap::new(),
            most_spent_category: None,
            suggestions: Vec::new(),
            monthly_stats: MonthlyStats::default(),
            analytics: None,
        }
    }
}
