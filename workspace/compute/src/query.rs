//! Independently callable analytic queries: averages, weekday pattern and
//! category growth.
//!
//! Every operation is tolerant of absent or insufficient data and answers
//! with `None` rather than failing, so callers can render a "not enough
//! data" state instead of misleading zeros.

use chrono::NaiveDate;
use common::{AverageSpending, CategoryGrowth, GrowthEntry, TimePeriod, WeekdayPattern, WeekdayStat};
use model::Transaction;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

use crate::aggregate::{self, safe_div, weekday_name};
use crate::calendar::{ComparisonWindows, Month};

pub use crate::trend::spending_trend;

/// Computes average spending over the expenses matching the optional
/// category and period filters.
///
/// Only dated expense rows participate. The per-day average first sums the
/// magnitudes per calendar day, then averages those sums over the days that
/// saw any spending.
///
/// # Arguments
///
/// * `transactions` - The canonical transaction table
/// * `category` - Restrict to one category when given
/// * `period` - Restrict to a calendar month relative to `today` when given
/// * `today` - Reference date the period filter is resolved against
#[instrument(skip(transactions), fields(num_transactions = transactions.len(), %today))]
pub fn average_spending(
    transactions: &[Transaction],
    category: Option<&str>,
    period: Option<TimePeriod>,
    today: NaiveDate,
) -> Option<AverageSpending> {
    let target_month = period.map(|p| match p {
        TimePeriod::ThisMonth => Month::from_date(today),
        TimePeriod::LastMonth => Month::from_date(today).prev(),
    });

    let matching: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| t.is_expense())
        .filter(|t| category.is_none_or(|c| t.category() == c))
        .filter(|t| match (t.date(), target_month) {
            (Some(date), Some(month)) => Month::from_date(date) == month,
            (Some(_), None) => true,
            (None, _) => false,
        })
        .collect();

    if matching.is_empty() {
        debug!("no expenses match the filters");
        return None;
    }

    let total: Decimal = matching.iter().map(|t| t.magnitude()).sum();
    let avg_per_transaction = safe_div(total, Decimal::from(matching.len()));

    let mut daily: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for transaction in &matching {
        if let Some(date) = transaction.date() {
            *daily.entry(date).or_default() += transaction.magnitude();
        }
    }
    let daily_sum: Decimal = daily.values().copied().sum();
    let avg_daily = safe_div(daily_sum, Decimal::from(daily.len()));

    Some(AverageSpending {
        avg_per_transaction: avg_per_transaction.round_dp(2),
        avg_daily: avg_daily.round_dp(2),
        total_transactions: matching.len(),
    })
}

/// Computes the spending pattern per weekday, ordered Monday through Sunday.
///
/// Returns `None` when no dated expense rows exist. Ties on the highest or
/// lowest mean resolve to the weekday earliest in the week.
#[instrument(skip(transactions), fields(num_transactions = transactions.len()))]
pub fn weekday_pattern(transactions: &[Transaction]) -> Option<WeekdayPattern> {
    let stats = aggregate::weekday_stats(transactions);
    if stats.is_empty() {
        return None;
    }

    let mut highest = &stats[0];
    let mut lowest = &stats[0];
    for stat in &stats {
        if stat.mean > highest.mean {
            highest = stat;
        }
        if stat.mean < lowest.mean {
            lowest = stat;
        }
    }
    let highest_day = weekday_name(highest.weekday).to_string();
    let lowest_day = weekday_name(lowest.weekday).to_string();

    Some(WeekdayPattern {
        weekdays: stats
            .into_iter()
            .map(|stat| WeekdayStat {
                day: weekday_name(stat.weekday).to_string(),
                average: stat.mean.round_dp(2),
                total: stat.total.round_dp(2),
            })
            .collect(),
        highest_day,
        lowest_day,
    })
}

/// Compares per-category mean spending between the recent and prior 30-day
/// windows anchored at the latest date in the data.
///
/// A category contributes only when its prior-window mean is positive.
/// Returns `None` when the prior window holds no transactions or no category
/// qualifies. Ties on fastest growth or decline resolve to the
/// lexicographically smallest category.
#[instrument(skip(transactions), fields(num_transactions = transactions.len()))]
pub fn category_growth(transactions: &[Transaction]) -> Option<CategoryGrowth> {
    let latest = transactions
        .iter()
        .filter(|t| t.is_expense())
        .filter_map(|t| t.date())
        .max()?;
    let windows = ComparisonWindows::around(latest);

    let recent: Vec<Transaction> = window_rows(transactions, |d| windows.contains_recent(d));
    let prior: Vec<Transaction> = window_rows(transactions, |d| windows.contains_prior(d));
    if prior.is_empty() {
        debug!("prior window is empty, growth is undefined");
        return None;
    }

    let recent_means = aggregate::mean_by_category(&recent);
    let prior_means = aggregate::mean_by_category(&prior);

    let mut growth: BTreeMap<String, Decimal> = BTreeMap::new();
    for (category, recent_mean) in &recent_means {
        let Some(prior_mean) = prior_means.get(category) else {
            continue;
        };
        if *prior_mean <= Decimal::ZERO {
            continue;
        }
        let change = (*recent_mean - *prior_mean) / *prior_mean * Decimal::ONE_HUNDRED;
        growth.insert(category.clone(), change.round_dp(2));
    }

    if growth.is_empty() {
        return None;
    }

    let mut fastest_growing = growth.iter().next()?;
    let mut fastest_declining = fastest_growing;
    for entry in &growth {
        if entry.1 > fastest_growing.1 {
            fastest_growing = entry;
        }
        if entry.1 < fastest_declining.1 {
            fastest_declining = entry;
        }
    }

    Some(CategoryGrowth {
        fastest_growing: GrowthEntry {
            category: fastest_growing.0.clone(),
            growth_percent: *fastest_growing.1,
        },
        fastest_declining: GrowthEntry {
            category: fastest_declining.0.clone(),
            growth_percent: *fastest_declining.1,
        },
        growth,
    })
}

fn window_rows(
    transactions: &[Transaction],
    in_window: impl Fn(NaiveDate) -> bool,
) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| t.is_expense())
        .filter(|t| t.date().is_some_and(&in_window))
        .cloned()
        .collect()
}
