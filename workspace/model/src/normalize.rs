//! Normalization of raw transaction records into the canonical table.
//!
//! The normalizer is a pure function: it never fails, it degrades. Rows whose
//! amount cannot be coerced to a finite number are dropped and counted; rows
//! whose date cannot be parsed are kept without a date, which excludes them
//! from month, weekday and window aggregates but not from lifetime totals.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::transaction::{DEFAULT_CATEGORY, RawRecord, Transaction};

/// Why a raw record could not be normalized.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The amount field was present but not coercible to a number.
    #[error("amount is not numeric: {0:?}")]
    UnparseableAmount(String),

    /// The amount field held a value with no finite numeric representation.
    #[error("amount is not a finite number: {0:?}")]
    NonFiniteAmount(String),
}

/// The result of normalizing a batch of raw records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    /// The canonical table, in input order.
    pub transactions: Vec<Transaction>,
    /// One entry per dropped row, for diagnostics.
    pub invalid: Vec<RecordError>,
    /// Rows kept without a parseable date.
    pub undated_rows: usize,
}

impl Normalized {
    /// Number of rows dropped because their amount was not a finite number.
    pub fn invalid_rows(&self) -> usize {
        self.invalid.len()
    }
}

/// Normalizes raw records into the canonical transaction table.
///
/// # Arguments
///
/// * `records` - Raw transaction-like records from the storage collaborator
///
/// # Returns
///
/// A [`Normalized`] batch: valid transactions in input order plus counts of
/// dropped and undated rows. This function never fails for malformed input.
#[instrument(skip(records), fields(num_records = records.len()))]
pub fn normalize(records: &[RawRecord]) -> Normalized {
    let mut normalized = Normalized::default();

    for record in records {
        match coerce_record(record) {
            Ok(transaction) => {
                if transaction.date().is_none() {
                    normalized.undated_rows += 1;
                }
                normalized.transactions.push(transaction);
            }
            Err(err) => {
                warn!(%err, "dropping malformed record");
                normalized.invalid.push(err);
            }
        }
    }

    debug!(
        valid = normalized.transactions.len(),
        invalid = normalized.invalid.len(),
        undated = normalized.undated_rows,
        "normalized record batch"
    );

    normalized
}

/// Coerces a single raw record into a canonical transaction.
pub fn coerce_record(record: &RawRecord) -> Result<Transaction, RecordError> {
    let amount = coerce_amount(record.amount.as_ref())?;
    let category = record
        .category
        .clone()
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
    let date = record.date.as_deref().and_then(parse_date);
    let datetime = record
        .datetime
        .as_deref()
        .and_then(parse_datetime)
        .or_else(|| date.and_then(|d| d.and_hms_opt(0, 0, 0)));

    let mut transaction = Transaction::new_with_datetime(amount, category, date, datetime);
    if let Some(description) = &record.description {
        transaction.set_description(description);
    }
    Ok(transaction)
}

/// Coerces a JSON amount value to a finite decimal.
///
/// A missing amount is treated as zero, matching the lenient source contract.
fn coerce_amount(value: Option<&Value>) -> Result<Decimal, RecordError> {
    let Some(value) = value else {
        return Ok(Decimal::ZERO);
    };

    match value {
        Value::Null => Ok(Decimal::ZERO),
        Value::Number(number) => parse_decimal(&number.to_string())
            .ok_or_else(|| RecordError::NonFiniteAmount(number.to_string())),
        Value::String(text) => {
            let trimmed = text.trim();
            match parse_decimal(trimmed) {
                Some(amount) => Ok(amount),
                None if trimmed.eq_ignore_ascii_case("nan")
                    || trimmed.to_ascii_lowercase().contains("inf") =>
                {
                    Err(RecordError::NonFiniteAmount(trimmed.to_string()))
                }
                None => Err(RecordError::UnparseableAmount(trimmed.to_string())),
            }
        }
        other => Err(RecordError::UnparseableAmount(other.to_string())),
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .ok()
        .or_else(|| Decimal::from_scientific(text).ok())
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok()
}

/// Parses a combined datetime in either `YYYY-MM-DD HH:MM:SS` or the RFC 3339
/// `T`-separated form.
fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let trimmed = text.trim();
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(amount: Value, category: &str, date: &str) -> RawRecord {
        RawRecord::new(amount, category, date)
    }

    #[test]
    fn test_normalize_valid_records() {
        let records = vec![
            record(json!(-60.0), "food", "2024-01-05"),
            record(json!(15000), "salary", "2024-01-01"),
        ];

        let normalized = normalize(&records);

        assert_eq!(normalized.transactions.len(), 2);
        assert_eq!(normalized.invalid_rows(), 0);
        assert_eq!(normalized.undated_rows, 0);
        assert_eq!(normalized.transactions[0].amount(), Decimal::new(-6000, 2));
        assert_eq!(normalized.transactions[0].category(), "food");
        assert_eq!(
            normalized.transactions[0].date(),
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
    }

    #[test]
    fn test_amount_as_string_is_coerced() {
        let records = vec![record(json!("-42.50"), "food", "2024-01-05")];
        let normalized = normalize(&records);
        assert_eq!(normalized.transactions[0].amount(), Decimal::new(-4250, 2));
    }

    #[test]
    fn test_unparseable_amount_is_dropped() {
        let records = vec![
            record(json!("not a number"), "food", "2024-01-05"),
            record(json!(-5), "food", "2024-01-06"),
        ];

        let normalized = normalize(&records);

        assert_eq!(normalized.transactions.len(), 1);
        assert_eq!(
            normalized.invalid,
            vec![RecordError::UnparseableAmount("not a number".to_string())]
        );
    }

    #[test]
    fn test_non_finite_amount_is_dropped() {
        let records = vec![
            record(json!("NaN"), "food", "2024-01-05"),
            record(json!("inf"), "food", "2024-01-05"),
        ];

        let normalized = normalize(&records);

        assert!(normalized.transactions.is_empty());
        assert_eq!(normalized.invalid_rows(), 2);
        assert!(matches!(
            normalized.invalid[0],
            RecordError::NonFiniteAmount(_)
        ));
    }

    #[test]
    fn test_missing_amount_defaults_to_zero() {
        let records = vec![RawRecord {
            category: Some("food".to_string()),
            date: Some("2024-01-05".to_string()),
            ..RawRecord::default()
        }];

        let normalized = normalize(&records);
        assert_eq!(normalized.transactions[0].amount(), Decimal::ZERO);
    }

    #[test]
    fn test_bad_date_keeps_row_without_date() {
        let records = vec![record(json!(-10), "food", "05/01/2024")];

        let normalized = normalize(&records);

        assert_eq!(normalized.transactions.len(), 1);
        assert_eq!(normalized.undated_rows, 1);
        assert!(normalized.transactions[0].date().is_none());
    }

    #[test]
    fn test_missing_category_defaults_to_other() {
        let records = vec![RawRecord {
            amount: Some(json!(-10)),
            date: Some("2024-01-05".to_string()),
            ..RawRecord::default()
        }];

        let normalized = normalize(&records);
        assert_eq!(normalized.transactions[0].category(), "other");
    }

    #[test]
    fn test_datetime_forms() {
        let mut with_space = record(json!(-10), "food", "2024-01-05");
        with_space.datetime = Some("2024-01-05 13:45:00".to_string());
        let mut with_t = record(json!(-10), "food", "2024-01-05");
        with_t.datetime = Some("2024-01-05T13:45:00".to_string());

        let normalized = normalize(&[with_space, with_t]);
        let expected = NaiveDate::from_ymd_opt(2024, 1, 5)
            .unwrap()
            .and_hms_opt(13, 45, 0);

        assert_eq!(normalized.transactions[0].datetime(), expected);
        assert_eq!(normalized.transactions[1].datetime(), expected);
    }

    #[test]
    fn test_datetime_falls_back_to_midnight() {
        let normalized = normalize(&[record(json!(-10), "food", "2024-01-05")]);
        assert_eq!(
            normalized.transactions[0].datetime(),
            NaiveDate::from_ymd_opt(2024, 1, 5)
                .unwrap()
                .and_hms_opt(0, 0, 0)
        );
    }
}
