pub mod aggregate;
pub mod calendar;
pub mod error;
pub mod insight;
pub mod projection;
pub mod query;
pub mod report;
pub mod trend;

pub use error::{ComputeError, Result};
pub use query::{average_spending, category_growth, spending_trend, weekday_pattern};
pub use report::analyze;
