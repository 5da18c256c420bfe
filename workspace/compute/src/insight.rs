//! Threshold rules deriving suggestions and warnings from the computed
//! figures.
//!
//! The rules are evaluated independently; every rule that matches emits its
//! suggestion. Only the budget rule's two branches are mutually exclusive:
//! being over budget takes precedence over running low.

use common::Suggestion;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::debug;

use crate::aggregate::safe_div;
use crate::projection::Projection;

/// A category exceeding this share of total spending triggers a
/// reduce-spending suggestion. The comparison is strict: exactly 30% does
/// not fire.
const HIGH_SPENDING_PERCENT: Decimal = Decimal::from_parts(30, 0, 0, false, 0);

/// Fraction of monthly income under which the remaining budget counts as low.
const LOW_BUDGET_FRACTION: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

/// Derives suggestions from the category breakdown and the monthly
/// projection.
///
/// # Arguments
///
/// * `category_totals` - Lifetime expense magnitude per category
/// * `percentages` - Share of total spending per category, unrounded
/// * `projection` - The monthly budget projection and its income base
pub fn suggestions(
    category_totals: &BTreeMap<String, Decimal>,
    percentages: &BTreeMap<String, Decimal>,
    projection: &Projection,
) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    // Rule 1: one category dominates the spending
    if let Some((category, percentage)) = highest_above_threshold(percentages) {
        let amount = category_totals
            .get(category)
            .copied()
            .unwrap_or(Decimal::ZERO);
        suggestions.push(Suggestion::ReduceSpending {
            category: category.clone(),
            percentage: percentage.round_dp(1),
            amount: amount.round_dp(2),
        });
    }

    // Rule 2: budget exhaustion, over-budget wins over low-budget
    let remaining = projection.stats.remaining_budget;
    let income = projection.monthly_income;
    if remaining < Decimal::ZERO {
        suggestions.push(Suggestion::OverBudget {
            exceeded_by: remaining.abs().round_dp(2),
        });
    } else if remaining < income * LOW_BUDGET_FRACTION {
        suggestions.push(Suggestion::LowBudget {
            remaining: remaining.round_dp(2),
            percent_of_income: safe_div(remaining * Decimal::ONE_HUNDRED, income).round_dp(1),
        });
    }

    // Rule 3: the spending rate projects a deficit
    if projection.stats.projected_end_balance < Decimal::ZERO {
        suggestions.push(Suggestion::ProjectedNegative {
            deficit: projection.stats.projected_end_balance.abs().round_dp(2),
        });
    }

    debug!(count = suggestions.len(), "derived suggestions");
    suggestions
}

/// The category with the highest percentage strictly above the threshold;
/// ties resolve to the lexicographically smallest name.
fn highest_above_threshold(
    percentages: &BTreeMap<String, Decimal>,
) -> Option<(&String, Decimal)> {
    let mut best: Option<(&String, Decimal)> = None;
    for (category, percentage) in percentages {
        if *percentage <= HIGH_SPENDING_PERCENT {
            continue;
        }
        match best {
            Some((_, best_percentage)) if *percentage <= best_percentage => {}
            _ => best = Some((category, *percentage)),
        }
    }
    best
}
