//! Common transport-layer types for the analytics core.
//! These structs carry the computed results across the API boundary so a
//! service layer can serialize responses without duplicating shapes.

mod report;
mod statistics;

pub use report::{Analytics, MonthlyStats, Report, Suggestion, TopCategory};
pub use statistics::{
    AverageSpending, CategoryGrowth, GrowthEntry, TimePeriod, TrendDirection, TrendResult,
    WeekdayPattern, WeekdayStat,
};
