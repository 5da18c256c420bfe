//! Finsight: a stateless analytics core for dated, signed financial
//! transactions.
//!
//! The core is a pure computation API: callers supply a snapshot of
//! transactions (and optionally a reference date) and receive structured
//! results such as category breakdowns, monthly budget projections, trend
//! estimation, weekday seasonality and category growth. Persistence,
//! authentication and the request surface are external collaborators.
//!
//! Every function here threads an explicit reference date; passing `None`
//! defaults it to today's date, which is the only place the process clock is
//! read.

use chrono::{NaiveDate, Utc};

pub use common::{
    Analytics, AverageSpending, CategoryGrowth, GrowthEntry, MonthlyStats, Report, Suggestion,
    TimePeriod, TopCategory, TrendDirection, TrendResult, WeekdayPattern, WeekdayStat,
};
pub use model::{Normalized, RawRecord, RecordError, Transaction, normalize};

// Initialize tracing if not already initialized
#[cfg(not(test))]
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt::format::FmtSpan;

    // Initialize the tracing subscriber with a default configuration
    // This will log to stdout with a default format
    // The log level can be controlled via the RUST_LOG environment variable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_span_events(FmtSpan::CLOSE)
        .init();
}

/// Resolves the reference date, falling back to the current date.
fn reference_date(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| Utc::now().date_naive())
}

/// Runs the full analysis: totals, category breakdown, monthly projection,
/// suggestions and the extended analytics block.
///
/// This function uses the provided date as "today" or the current date if
/// none is provided. It never fails; an empty input yields a zeroed report.
pub fn analyze(transactions: &[Transaction], today: Option<NaiveDate>) -> Report {
    compute::analyze(transactions, reference_date(today))
}

/// Average spending over the expenses matching the optional category and
/// period filters, or `None` when nothing matches.
pub fn average_spending(
    transactions: &[Transaction],
    category: Option<&str>,
    period: Option<TimePeriod>,
    today: Option<NaiveDate>,
) -> Option<AverageSpending> {
    compute::average_spending(transactions, category, period, reference_date(today))
}

/// Linear trend over monthly expense totals, or `None` below two months of
/// data.
pub fn spending_trend(transactions: &[Transaction]) -> Option<TrendResult> {
    compute::spending_trend(transactions)
}

/// Spending pattern per weekday, or `None` without dated expenses.
pub fn weekday_pattern(transactions: &[Transaction]) -> Option<WeekdayPattern> {
    compute::weekday_pattern(transactions)
}

/// Per-category growth between the recent and prior 30-day windows, or
/// `None` when the prior window is empty.
pub fn category_growth(transactions: &[Transaction]) -> Option<CategoryGrowth> {
    compute::category_growth(transactions)
}
