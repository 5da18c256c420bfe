//! Full-report assembly: totals, category breakdown, monthly projection,
//! suggestions and the extended analytics block.

use chrono::NaiveDate;
use common::{Analytics, MonthlyStats, Report, TopCategory};
use model::Transaction;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

use crate::{aggregate, insight, projection, query, trend};

/// Runs the full analysis over the canonical transaction table relative to
/// the given reference date.
///
/// This never fails: an empty input yields the zeroed report, and the
/// extended analytics block degrades to absence when no dated expense rows
/// exist. Monetary figures are rounded to 2 decimal places and percentages
/// to 1 at this boundary; intermediate values keep full precision.
#[instrument(skip(transactions), fields(num_transactions = transactions.len(), %today))]
pub fn analyze(transactions: &[Transaction], today: NaiveDate) -> Report {
    if transactions.is_empty() {
        debug!("no transactions, returning the empty report");
        return Report::empty();
    }

    let (total_income, total_spent) = aggregate::income_expense_totals(transactions);
    let categories = aggregate::sum_by_category(transactions);
    let percentages = aggregate::percentage_of_total(&categories);

    let most_spent_category = aggregate::top_category(&categories).map(|(name, amount)| {
        let percentage = percentages.get(name).copied().unwrap_or(Decimal::ZERO);
        TopCategory {
            name: name.clone(),
            amount: amount.round_dp(2),
            percentage: percentage.round_dp(1),
        }
    });

    let projection = projection::project_month(transactions, today);
    let suggestions = insight::suggestions(&categories, &percentages, &projection);
    let analytics = extended_analytics(transactions);

    Report {
        total_spent: total_spent.round_dp(2),
        total_income: total_income.round_dp(2),
        balance: (total_income - total_spent).round_dp(2),
        categories: round_map(&categories, 2),
        percentages: round_map(&percentages, 1),
        most_spent_category,
        suggestions,
        monthly_stats: round_stats(projection.stats),
        analytics,
    }
}

/// Builds the extended analytics block over the dated expense rows, or
/// reports its absence when there are none.
fn extended_analytics(transactions: &[Transaction]) -> Option<Analytics> {
    let mut dated: Vec<Transaction> = transactions
        .iter()
        .filter(|t| t.is_expense() && t.date().is_some())
        .cloned()
        .collect();
    if dated.is_empty() {
        debug!("no dated expense rows, skipping extended analytics");
        return None;
    }

    let monthly_totals = aggregate::monthly_totals(&dated);
    let monthly_avg = aggregate::monthly_means(&dated);
    let category_monthly = aggregate::category_month_totals(&dated);
    let weekday_avg: BTreeMap<String, Decimal> = aggregate::weekday_stats(&dated)
        .into_iter()
        .map(|stat| {
            (
                aggregate::weekday_name(stat.weekday).to_string(),
                stat.mean.round_dp(2),
            )
        })
        .collect();

    // Date-ordered magnitudes for the rolling averages; the optional
    // datetime breaks same-day ties.
    dated.sort_by_key(|t| (t.date(), t.datetime()));
    let magnitudes: Vec<Decimal> = dated.iter().map(|t| t.magnitude()).collect();
    let current_7day_avg = last_rolling_mean(&magnitudes, 7);
    let current_30day_avg = last_rolling_mean(&magnitudes, 30);

    Some(Analytics {
        category_totals: round_map(&aggregate::sum_by_category(&dated), 2),
        category_avg: round_map(&aggregate::mean_by_category(&dated), 2),
        category_counts: aggregate::count_by_category(&dated),
        monthly_totals: stringify_keys(&monthly_totals),
        monthly_avg: stringify_keys(&monthly_avg),
        weekday_avg,
        category_monthly: category_monthly
            .iter()
            .map(|((category, month), amount)| {
                (format!("{category}_{month}"), amount.round_dp(2))
            })
            .collect(),
        trend: trend::spending_trend(&dated),
        current_7day_avg,
        current_30day_avg,
        growth: query::category_growth(&dated),
    })
}

fn last_rolling_mean(values: &[Decimal], window: usize) -> Decimal {
    aggregate::rolling_mean(values, window)
        .last()
        .copied()
        .unwrap_or(Decimal::ZERO)
        .round_dp(2)
}

fn round_map(map: &BTreeMap<String, Decimal>, dp: u32) -> BTreeMap<String, Decimal> {
    map.iter()
        .map(|(key, value)| (key.clone(), value.round_dp(dp)))
        .collect()
}

fn stringify_keys(
    map: &BTreeMap<crate::calendar::Month, Decimal>,
) -> BTreeMap<String, Decimal> {
    map.iter()
        .map(|(month, value)| (month.to_string(), value.round_dp(2)))
        .collect()
}

fn round_stats(stats: MonthlyStats) -> MonthlyStats {
    MonthlyStats {
        days_passed: stats.days_passed,
        days_remaining: stats.days_remaining,
        monthly_spent: stats.monthly_spent.round_dp(2),
        avg_daily_spending: stats.avg_daily_spending.round_dp(2),
        remaining_budget: stats.remaining_budget.round_dp(2),
        max_daily_spending: stats.max_daily_spending.round_dp(2),
        projected_monthly_spending: stats.projected_monthly_spending.round_dp(2),
        projected_end_balance: stats.projected_end_balance.round_dp(2),
    }
}
