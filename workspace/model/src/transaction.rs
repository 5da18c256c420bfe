use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

/// The category label applied when a record carries none.
pub const DEFAULT_CATEGORY: &str = "other";

/// A raw transaction-like record as supplied by the storage collaborator.
///
/// Every field is optional and loosely typed: the amount may arrive as a JSON
/// number or a string, dates arrive as `YYYY-MM-DD` strings, and the optional
/// combined `datetime` carries time-of-day for ordering only. Records of this
/// shape are turned into canonical [`Transaction`] values by
/// [`crate::normalize::normalize`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    pub amount: Option<Value>,
    pub category: Option<String>,
    pub date: Option<String>,
    pub datetime: Option<String>,
    pub description: Option<String>,
}

impl RawRecord {
    /// Creates a raw record with the given amount, category and date strings.
    /// Mostly useful in tests and callers that assemble records by hand.
    pub fn new(amount: Value, category: &str, date: &str) -> Self {
        Self {
            amount: Some(amount),
            category: Some(category.to_string()),
            date: Some(date.to_string()),
            datetime: None,
            description: None,
        }
    }
}

/// A canonical, validated transaction.
///
/// The amount is signed: `amount >= 0` is income, `amount < 0` is an expense
/// of magnitude `amount.abs()`. The date is `None` when the source record
/// carried an unparseable date; such rows still count toward lifetime totals
/// but are excluded from every date-bucketed aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    amount: Decimal,
    category: String,
    date: Option<NaiveDate>,
    datetime: Option<NaiveDateTime>,
    description: String,
}

impl Transaction {
    /// Creates a new Transaction.
    pub fn new(amount: Decimal, category: impl Into<String>, date: Option<NaiveDate>) -> Self {
        Self {
            amount,
            category: category.into(),
            date,
            datetime: date.and_then(|d| d.and_hms_opt(0, 0, 0)),
            description: String::new(),
        }
    }

    /// Creates a new Transaction with an explicit combined datetime.
    ///
    /// The datetime is used only as a secondary ordering key; grouping always
    /// goes through the calendar date.
    pub fn new_with_datetime(
        amount: Decimal,
        category: impl Into<String>,
        date: Option<NaiveDate>,
        datetime: Option<NaiveDateTime>,
    ) -> Self {
        Self {
            amount,
            category: category.into(),
            date,
            datetime,
            description: String::new(),
        }
    }

    /// Creates a new Transaction with a free-text description.
    pub fn new_with_description(
        amount: Decimal,
        category: impl Into<String>,
        date: Option<NaiveDate>,
        description: impl Into<String>,
    ) -> Self {
        let mut transaction = Self::new(amount, category, date);
        transaction.description = description.into();
        transaction
    }

    /// Gets the signed amount of the transaction.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Gets the category label of the transaction.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Gets the calendar date of the transaction, if one could be parsed.
    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// Gets the combined datetime of the transaction, if any.
    pub fn datetime(&self) -> Option<NaiveDateTime> {
        self.datetime
    }

    /// Gets the free-text description of the transaction.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Sets the free-text description of the transaction.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Checks whether this transaction is an expense (amount < 0).
    pub fn is_expense(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    /// Checks whether this transaction is income (amount >= 0).
    pub fn is_income(&self) -> bool {
        !self.is_expense()
    }

    /// Gets the unsigned magnitude of the amount.
    pub fn magnitude(&self) -> Decimal {
        self.amount.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    #[test]
    fn test_new_transaction() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let amount = Decimal::new(-6000, 2); // -60.00

        let transaction = Transaction::new(amount, "food", Some(date));

        assert_eq!(transaction.amount(), amount);
        assert_eq!(transaction.category(), "food");
        assert_eq!(transaction.date(), Some(date));
        assert_eq!(
            transaction.datetime(),
            Some(date.and_hms_opt(0, 0, 0).unwrap())
        );
        assert!(transaction.description().is_empty());
    }

    #[test]
    fn test_sign_partition() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();

        let expense = Transaction::new(Decimal::new(-6000, 2), "food", Some(date));
        assert!(expense.is_expense());
        assert!(!expense.is_income());
        assert_eq!(expense.magnitude(), Decimal::new(6000, 2));

        let income = Transaction::new(Decimal::new(1_500_000, 2), "salary", Some(date));
        assert!(income.is_income());
        assert!(!income.is_expense());

        // Zero is income by convention.
        let zero = Transaction::new(Decimal::ZERO, "other", Some(date));
        assert!(zero.is_income());
    }

    #[test]
    fn test_undated_transaction() {
        let transaction = Transaction::new(Decimal::new(-500, 2), "misc", None);
        assert!(transaction.date().is_none());
        assert!(transaction.datetime().is_none());
    }

    #[test]
    fn test_raw_record_deserializes_with_missing_fields() {
        let record: RawRecord = serde_json::from_str(r#"{"amount": -60}"#).unwrap();
        assert_eq!(record.amount, Some(serde_json::json!(-60)));
        assert!(record.category.is_none());
        assert!(record.date.is_none());
    }
}
