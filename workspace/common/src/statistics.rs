//! Result types for the parameterized analytic queries.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Calendar period filter for spending queries, resolved against an explicit
/// reference date supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimePeriod {
    ThisMonth,
    LastMonth,
}

/// Direction of the fitted monthly spending trend.
///
/// A slope of exactly zero is labeled `Decreasing`: only a strictly positive
/// slope counts as increasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Increasing => write!(f, "increasing"),
            TrendDirection::Decreasing => write!(f, "decreasing"),
        }
    }
}

/// Linear trend over monthly expense totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    pub direction: TrendDirection,
    /// Fitted slope per month.
    pub slope: Decimal,
    /// Prediction for the month after the last observed one, floored at zero.
    pub predicted_next_period: Decimal,
    /// Expense total of the last observed month.
    pub current_period_value: Decimal,
}

/// Average spending figures for an optionally filtered expense set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AverageSpending {
    /// Mean expense magnitude per transaction.
    pub avg_per_transaction: Decimal,
    /// Per-day expense sums averaged over the days with any spending.
    pub avg_daily: Decimal,
    /// Number of expense transactions that matched the filters.
    pub total_transactions: usize,
}

/// Mean and total expense magnitude for one weekday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekdayStat {
    pub day: String,
    pub average: Decimal,
    pub total: Decimal,
}

/// Spending pattern across the days of the week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekdayPattern {
    /// Per-weekday statistics ordered Monday through Sunday, only for
    /// weekdays that appear in the data.
    pub weekdays: Vec<WeekdayStat>,
    /// Weekday with the highest mean spending.
    pub highest_day: String,
    /// Weekday with the lowest mean spending.
    pub lowest_day: String,
}

/// A category together with its signed growth percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthEntry {
    pub category: String,
    pub growth_percent: Decimal,
}

/// Per-category change between the recent and prior 30-day windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryGrowth {
    /// Signed percentage change per category. Only categories with a
    /// positive prior-window mean are present.
    pub growth: BTreeMap<String, Decimal>,
    pub fastest_growing: GrowthEntry,
    pub fastest_declining: GrowthEntry,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_direction_display() {
        assert_eq!(TrendDirection::Increasing.to_string(), "increasing");
        assert_eq!(TrendDirection::Decreasing.to_string(), "decreasing");
    }

    #[test]
    fn test_trend_result_round_trip() {
        let result = TrendResult {
            direction: TrendDirection::Increasing,
            slope: Decimal::new(50000, 2),
            predicted_next_period: Decimal::new(200000, 2),
            current_period_value: Decimal::new(150000, 2),
        };

        let json = serde_json::to_string(&result).unwrap();
        let back: TrendResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
        assert!(json.contains("\"increasing\""));
    }

    #[test]
    fn test_time_period_serialization() {
        assert_eq!(
            serde_json::to_value(TimePeriod::ThisMonth).unwrap(),
            "this_month"
        );
        assert_eq!(
            serde_json::to_value(TimePeriod::LastMonth).unwrap(),
            "last_month"
        );
    }
}
