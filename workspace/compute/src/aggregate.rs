//! Grouped sums, means and counts over the canonical transaction table.
//!
//! Every function here is read-only over a transaction slice and considers
//! expense rows only (amount < 0), aggregating unsigned magnitudes. Grouping
//! that needs a calendar date silently skips undated rows; lifetime totals do
//! not. Outputs are `BTreeMap`s so iteration order is deterministic.

use chrono::{Datelike, NaiveDate, Weekday};
use model::Transaction;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::calendar::Month;

/// Divides, resolving a zero denominator to zero instead of failing.
pub fn safe_div(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}

fn expenses(transactions: &[Transaction]) -> impl Iterator<Item = &Transaction> {
    transactions.iter().filter(|t| t.is_expense())
}

fn dated_expenses(transactions: &[Transaction]) -> impl Iterator<Item = (NaiveDate, &Transaction)> {
    expenses(transactions).filter_map(|t| t.date().map(|d| (d, t)))
}

/// Lifetime income and expense-magnitude totals over all rows, dated or not.
pub fn income_expense_totals(transactions: &[Transaction]) -> (Decimal, Decimal) {
    let mut income = Decimal::ZERO;
    let mut expense = Decimal::ZERO;
    for transaction in transactions {
        if transaction.is_expense() {
            expense += transaction.magnitude();
        } else {
            income += transaction.amount();
        }
    }
    (income, expense)
}

/// Expense magnitude summed per category.
pub fn sum_by_category(transactions: &[Transaction]) -> BTreeMap<String, Decimal> {
    let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
    for transaction in expenses(transactions) {
        *totals
            .entry(transaction.category().to_string())
            .or_default() += transaction.magnitude();
    }
    totals
}

/// Mean expense magnitude per category.
pub fn mean_by_category(transactions: &[Transaction]) -> BTreeMap<String, Decimal> {
    let mut sums: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
    for transaction in expenses(transactions) {
        let entry = sums
            .entry(transaction.category().to_string())
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        entry.0 += transaction.magnitude();
        entry.1 += Decimal::ONE;
    }
    sums.into_iter()
        .map(|(category, (sum, count))| (category, safe_div(sum, count)))
        .collect()
}

/// Number of expense transactions per category.
pub fn count_by_category(transactions: &[Transaction]) -> BTreeMap<String, u64> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for transaction in expenses(transactions) {
        *counts
            .entry(transaction.category().to_string())
            .or_default() += 1;
    }
    counts
}

/// Expense magnitude summed per calendar month, chronologically ordered.
pub fn monthly_totals(transactions: &[Transaction]) -> BTreeMap<Month, Decimal> {
    let mut totals: BTreeMap<Month, Decimal> = BTreeMap::new();
    for (date, transaction) in dated_expenses(transactions) {
        *totals.entry(Month::from_date(date)).or_default() += transaction.magnitude();
    }
    totals
}

/// Mean expense magnitude per calendar month.
pub fn monthly_means(transactions: &[Transaction]) -> BTreeMap<Month, Decimal> {
    let mut sums: BTreeMap<Month, (Decimal, Decimal)> = BTreeMap::new();
    for (date, transaction) in dated_expenses(transactions) {
        let entry = sums
            .entry(Month::from_date(date))
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        entry.0 += transaction.magnitude();
        entry.1 += Decimal::ONE;
    }
    sums.into_iter()
        .map(|(month, (sum, count))| (month, safe_div(sum, count)))
        .collect()
}

/// Expense magnitude summed per (category, month) pair.
pub fn category_month_totals(transactions: &[Transaction]) -> BTreeMap<(String, Month), Decimal> {
    let mut totals: BTreeMap<(String, Month), Decimal> = BTreeMap::new();
    for (date, transaction) in dated_expenses(transactions) {
        *totals
            .entry((transaction.category().to_string(), Month::from_date(date)))
            .or_default() += transaction.magnitude();
    }
    totals
}

/// Expense magnitude summed per calendar day.
pub fn daily_totals(transactions: &[Transaction]) -> BTreeMap<NaiveDate, Decimal> {
    let mut totals: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for (date, transaction) in dated_expenses(transactions) {
        *totals.entry(date).or_default() += transaction.magnitude();
    }
    totals
}

/// Aggregated expense figures for a single weekday.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekdayAgg {
    pub weekday: Weekday,
    pub total: Decimal,
    pub mean: Decimal,
    pub count: u64,
}

/// English weekday name, Monday through Sunday.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Per-weekday expense statistics ordered Monday through Sunday, containing
/// only the weekdays present in the data.
pub fn weekday_stats(transactions: &[Transaction]) -> Vec<WeekdayAgg> {
    let mut sums = [Decimal::ZERO; 7];
    let mut counts = [0u64; 7];

    for (date, transaction) in dated_expenses(transactions) {
        let index = date.weekday().num_days_from_monday() as usize;
        sums[index] += transaction.magnitude();
        counts[index] += 1;
    }

    let mut weekday = Weekday::Mon;
    let mut stats = Vec::new();
    for index in 0..7 {
        if counts[index] > 0 {
            stats.push(WeekdayAgg {
                weekday,
                total: sums[index],
                mean: safe_div(sums[index], Decimal::from(counts[index])),
                count: counts[index],
            });
        }
        weekday = weekday.succ();
    }
    stats
}

/// Share of the total expense per category, as percentages.
///
/// Returns an empty mapping when nothing was spent: there is no meaningful
/// share of a zero total.
pub fn percentage_of_total(totals: &BTreeMap<String, Decimal>) -> BTreeMap<String, Decimal> {
    let total: Decimal = totals.values().copied().sum();
    if total.is_zero() {
        return BTreeMap::new();
    }
    totals
        .iter()
        .map(|(category, amount)| {
            (
                category.clone(),
                *amount / total * Decimal::ONE_HUNDRED,
            )
        })
        .collect()
}

/// The category with the highest aggregated amount.
///
/// Ties resolve to the lexicographically smallest category name, which is the
/// first one reached by the strict `>` comparison over the ordered map.
pub fn top_category(totals: &BTreeMap<String, Decimal>) -> Option<(&String, Decimal)> {
    let mut best: Option<(&String, Decimal)> = None;
    for (category, amount) in totals {
        match best {
            Some((_, best_amount)) if *amount <= best_amount => {}
            _ => best = Some((category, *amount)),
        }
    }
    best
}

/// Trailing rolling mean with a minimum of one observation.
///
/// For each position the mean covers the up-to-`window` values ending there,
/// so the output has the same length as the input and the first element is
/// the first value itself.
pub fn rolling_mean(values: &[Decimal], window: usize) -> Vec<Decimal> {
    let window = window.max(1);
    let mut means = Vec::with_capacity(values.len());
    for end in 0..values.len() {
        let start = (end + 1).saturating_sub(window);
        let span = &values[start..=end];
        let sum: Decimal = span.iter().copied().sum();
        means.push(safe_div(sum, Decimal::from(span.len())));
    }
    means
}
