//! Linear trend estimation over monthly expense totals.

use common::{TrendDirection, TrendResult};
use model::Transaction;
use rust_decimal::Decimal;
use tracing::{debug, error, instrument};

use crate::aggregate::{self, safe_div};
use crate::error::{ComputeError, Result};

/// Fits a linear trend to the monthly expense totals and predicts the next
/// month.
///
/// The fit is a closed-form ordinary-least-squares regression of the monthly
/// total on the month index `0..n-1`; the prediction is the fitted value at
/// index `n`, floored at zero since a spending forecast is never negative.
///
/// Returns `None` when fewer than two distinct months are present, and on
/// the (logged) event of decimal overflow during the fit.
#[instrument(skip(transactions), fields(num_transactions = transactions.len()))]
pub fn spending_trend(transactions: &[Transaction]) -> Option<TrendResult> {
    let monthly = aggregate::monthly_totals(transactions);
    if monthly.len() < 2 {
        debug!(months = monthly.len(), "not enough months for a trend");
        return None;
    }

    // BTreeMap iteration is chronological, so index i is month number i.
    let totals: Vec<Decimal> = monthly.values().copied().collect();

    let (slope, intercept) = match fit_line(&totals) {
        Ok(fit) => fit,
        Err(err) => {
            error!(%err, "trend fit failed");
            return None;
        }
    };

    let next_index = Decimal::from(totals.len());
    let predicted = match slope
        .checked_mul(next_index)
        .and_then(|scaled| scaled.checked_add(intercept))
    {
        Some(predicted) => predicted.max(Decimal::ZERO),
        None => {
            error!("trend prediction overflowed");
            return None;
        }
    };

    // Slope exactly zero counts as decreasing: only a strictly positive
    // slope is an increasing trend.
    let direction = if slope > Decimal::ZERO {
        TrendDirection::Increasing
    } else {
        TrendDirection::Decreasing
    };

    Some(TrendResult {
        direction,
        slope: slope.round_dp(2),
        predicted_next_period: predicted.round_dp(2),
        current_period_value: totals.last().copied().unwrap_or_default().round_dp(2),
    })
}

/// Closed-form OLS fit of `values[i]` on `i`, returning `(slope, intercept)`.
fn fit_line(values: &[Decimal]) -> Result<(Decimal, Decimal)> {
    let n = Decimal::from(values.len());
    let mut sum_x = Decimal::ZERO;
    let mut sum_y = Decimal::ZERO;
    let mut sum_xx = Decimal::ZERO;
    let mut sum_xy = Decimal::ZERO;

    for (index, value) in values.iter().enumerate() {
        let x = Decimal::from(index);
        sum_x += x;
        sum_xx += x * x;
        sum_y = sum_y
            .checked_add(*value)
            .ok_or_else(|| ComputeError::Overflow("sum of monthly totals".to_string()))?;
        sum_xy = x
            .checked_mul(*value)
            .and_then(|product| sum_xy.checked_add(product))
            .ok_or_else(|| ComputeError::Overflow("cross sum of monthly totals".to_string()))?;
    }

    let denominator = n * sum_xx - sum_x * sum_x;
    let numerator = n
        .checked_mul(sum_xy)
        .and_then(|lhs| sum_x.checked_mul(sum_y).and_then(|rhs| lhs.checked_sub(rhs)))
        .ok_or_else(|| ComputeError::Overflow("slope numerator".to_string()))?;

    let slope = safe_div(numerator, denominator);
    let intercept = safe_div(sum_y - slope * sum_x, n);
    Ok((slope, intercept))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn expense(amount: i64, date: &str) -> Transaction {
        Transaction::new(
            Decimal::from(-amount),
            "food",
            NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
        )
    }

    #[test]
    fn test_two_increasing_months() {
        let transactions = vec![expense(1000, "2024-01-10"), expense(1500, "2024-02-10")];

        let trend = spending_trend(&transactions).unwrap();
        assert_eq!(trend.direction, TrendDirection::Increasing);
        assert_eq!(trend.slope, Decimal::from(500));
        assert_eq!(trend.predicted_next_period, Decimal::from(2000));
        assert_eq!(trend.current_period_value, Decimal::from(1500));
    }

    #[test]
    fn test_decreasing_trend_floors_prediction_at_zero() {
        let transactions = vec![
            expense(900, "2024-01-10"),
            expense(400, "2024-02-10"),
            expense(50, "2024-03-10"),
        ];

        let trend = spending_trend(&transactions).unwrap();
        assert_eq!(trend.direction, TrendDirection::Decreasing);
        assert!(trend.slope < Decimal::ZERO);
        assert!(trend.predicted_next_period >= Decimal::ZERO);
    }

    #[test]
    fn test_flat_trend_is_labeled_decreasing() {
        let transactions = vec![expense(500, "2024-01-10"), expense(500, "2024-02-10")];

        let trend = spending_trend(&transactions).unwrap();
        assert_eq!(trend.direction, TrendDirection::Decreasing);
        assert_eq!(trend.slope, Decimal::ZERO);
        assert_eq!(trend.predicted_next_period, Decimal::from(500));
    }

    #[test]
    fn test_insufficient_months_yields_absence() {
        assert!(spending_trend(&[]).is_none());
        assert!(spending_trend(&[expense(100, "2024-01-10")]).is_none());

        // Two transactions in the same month are still one period
        let same_month = vec![expense(100, "2024-01-10"), expense(200, "2024-01-20")];
        assert!(spending_trend(&same_month).is_none());

        // Income alone produces no expense months at all
        let income_only = vec![Transaction::new(
            Decimal::from(100),
            "salary",
            NaiveDate::from_ymd_opt(2024, 1, 1),
        )];
        assert!(spending_trend(&income_only).is_none());
    }

    #[test]
    fn test_fit_line_exact_fit() {
        let values: Vec<Decimal> = [10, 20, 30].iter().map(|v| Decimal::from(*v)).collect();
        let (slope, intercept) = fit_line(&values).unwrap();
        assert_eq!(slope, Decimal::from(10));
        assert_eq!(intercept, Decimal::from(10));
    }
}
