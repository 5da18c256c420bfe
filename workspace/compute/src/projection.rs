//! Month-end budget projection from the current month's activity.

use chrono::{Datelike, NaiveDate};
use common::MonthlyStats;
use model::Transaction;
use rust_decimal::Decimal;
use tracing::{error, instrument};

use crate::aggregate::safe_div;
use crate::calendar;
use crate::error::{ComputeError, Result};

/// Monthly budget figures together with the income they were measured
/// against.
///
/// The income is carried separately because the insight rules compare the
/// remaining budget against it; it is not part of the reported stats.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub stats: MonthlyStats,
    pub monthly_income: Decimal,
}

/// Projects month-end spending and remaining budget relative to the given
/// reference date.
///
/// Income is the current month's income, falling back to all-time income when
/// the month has none yet. Every division resolves a zero denominator to
/// zero; a projection overflow is logged and degrades to a zero projection.
#[instrument(skip(transactions), fields(num_transactions = transactions.len(), %today))]
pub fn project_month(transactions: &[Transaction], today: NaiveDate) -> Projection {
    let (month_start, next_month_start) = calendar::month_bounds(today);
    let (days_passed, days_remaining) = calendar::elapsed_and_remaining_days(today);
    let days_in_month = Decimal::from(calendar::days_in_month(today.year(), today.month()));

    let in_month = |transaction: &&Transaction| {
        transaction
            .date()
            .is_some_and(|d| d >= month_start && d < next_month_start)
    };

    let monthly_spent: Decimal = transactions
        .iter()
        .filter(in_month)
        .filter(|t| t.is_expense())
        .map(|t| t.magnitude())
        .sum();

    let mut monthly_income: Decimal = transactions
        .iter()
        .filter(in_month)
        .filter(|t| t.is_income())
        .map(|t| t.amount())
        .sum();
    if monthly_income.is_zero() {
        // No income recorded this month yet; assume the lifetime income
        monthly_income = transactions
            .iter()
            .filter(|t| t.is_income())
            .map(|t| t.amount())
            .sum();
    }

    let avg_daily_spending = safe_div(monthly_spent, Decimal::from(days_passed));
    let remaining_budget = monthly_income - monthly_spent;
    let max_daily_spending = safe_div(remaining_budget, Decimal::from(days_remaining));

    let (projected_monthly_spending, projected_end_balance) =
        match project_totals(avg_daily_spending, days_in_month, monthly_income) {
            Ok(projected) => projected,
            Err(err) => {
                error!(%err, "month-end projection failed");
                (Decimal::ZERO, monthly_income)
            }
        };

    Projection {
        stats: MonthlyStats {
            days_passed,
            days_remaining,
            monthly_spent,
            avg_daily_spending,
            remaining_budget,
            max_daily_spending,
            projected_monthly_spending,
            projected_end_balance,
        },
        monthly_income,
    }
}

fn project_totals(
    avg_daily_spending: Decimal,
    days_in_month: Decimal,
    monthly_income: Decimal,
) -> Result<(Decimal, Decimal)> {
    let projected_monthly_spending = avg_daily_spending
        .checked_mul(days_in_month)
        .ok_or_else(|| ComputeError::Overflow("projected monthly spending".to_string()))?;
    let projected_end_balance = monthly_income
        .checked_sub(projected_monthly_spending)
        .ok_or_else(|| ComputeError::Overflow("projected end balance".to_string()))?;
    Ok((projected_monthly_spending, projected_end_balance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn transaction(amount: i64, day: NaiveDate) -> Transaction {
        Transaction::new(Decimal::from(amount), "other", Some(day))
    }

    #[test]
    fn test_projection_mid_month() {
        let today = date(2024, 1, 10);
        let transactions = vec![
            transaction(1000, date(2024, 1, 1)),
            transaction(-200, date(2024, 1, 5)),
            transaction(-100, date(2024, 1, 9)),
        ];

        let projection = project_month(&transactions, today);
        let stats = &projection.stats;

        assert_eq!(stats.days_passed, 10);
        assert_eq!(stats.days_remaining, 21);
        assert_eq!(stats.monthly_spent, Decimal::from(300));
        assert_eq!(stats.avg_daily_spending, Decimal::from(30));
        assert_eq!(stats.projected_monthly_spending, Decimal::from(930));
        assert_eq!(stats.remaining_budget, Decimal::from(700));
        assert_eq!(stats.projected_end_balance, Decimal::from(70));
        assert_eq!(projection.monthly_income, Decimal::from(1000));
    }

    #[test]
    fn test_income_falls_back_to_lifetime_total() {
        let today = date(2024, 3, 15);
        let transactions = vec![
            // Income from a previous month only
            transaction(2000, date(2024, 1, 1)),
            transaction(-150, date(2024, 3, 10)),
        ];

        let projection = project_month(&transactions, today);
        assert_eq!(projection.monthly_income, Decimal::from(2000));
        assert_eq!(projection.stats.remaining_budget, Decimal::from(1850));
    }

    #[test]
    fn test_transactions_outside_month_are_ignored() {
        let today = date(2024, 2, 10);
        let transactions = vec![
            transaction(-500, date(2024, 1, 31)),
            transaction(-70, date(2024, 2, 5)),
            // A date past the month's end stays out of the monthly figures
            transaction(-900, date(2024, 3, 1)),
            Transaction::new(Decimal::from(-30), "other", None),
        ];

        let projection = project_month(&transactions, today);
        assert_eq!(projection.stats.monthly_spent, Decimal::from(70));
    }

    #[test]
    fn test_zero_days_remaining_guards_division() {
        let today = date(2024, 1, 31);
        let transactions = vec![transaction(-310, date(2024, 1, 15))];

        let projection = project_month(&transactions, today);
        assert_eq!(projection.stats.days_remaining, 0);
        assert_eq!(projection.stats.max_daily_spending, Decimal::ZERO);
        assert_eq!(projection.stats.avg_daily_spending, Decimal::from(10));
    }

    #[test]
    fn test_negative_max_daily_spending_signals_overspend() {
        let today = date(2024, 1, 11);
        let transactions = vec![
            transaction(100, date(2024, 1, 1)),
            transaction(-300, date(2024, 1, 10)),
        ];

        let projection = project_month(&transactions, today);
        assert_eq!(projection.stats.remaining_budget, Decimal::from(-200));
        assert_eq!(projection.stats.max_daily_spending, Decimal::from(-10));
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        let projection = project_month(&[], date(2024, 1, 10));
        assert_eq!(projection.stats.monthly_spent, Decimal::ZERO);
        assert_eq!(projection.stats.avg_daily_spending, Decimal::ZERO);
        assert_eq!(projection.stats.remaining_budget, Decimal::ZERO);
        assert_eq!(projection.monthly_income, Decimal::ZERO);
        assert_eq!(projection.stats.days_passed, 10);
    }
}
