//! Tolerant (de)serializers for the backend's loosely typed JSON.
//!
//! Numeric fields arrive as numbers, numeric strings, empty strings or
//! null depending on the endpoint; ids are quoted about half the time.
//! The rule everywhere is coerce-don't-fail: a malformed value becomes
//! zero/None and editing continues.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

pub(crate) fn decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(coerce_decimal(value.as_ref()))
}

pub(crate) fn opt_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(coerce_id(value.as_ref()))
}

pub(crate) fn opt_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => parse_date(&s),
        _ => None,
    })
}

/// Serializes an optional date as `YYYY-MM-DD`, or the empty string the
/// form layer uses for "not set".
pub(crate) fn date_string<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match date {
        Some(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
        None => serializer.serialize_str(""),
    }
}

fn coerce_decimal(value: Option<&Value>) -> Decimal {
    match value {
        Some(Value::Number(n)) => n.to_string().parse().unwrap_or(Decimal::ZERO),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(Decimal::ZERO),
        _ => Decimal::ZERO,
    }
}

fn coerce_id(value: Option<&Value>) -> Option<i64> {
    let id = match value {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    id.filter(|id| *id > 0)
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    // Accept plain dates and datetime strings with a date prefix.
    let head = trimmed.get(0..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn decimals_coerce_from_every_observed_shape() {
        assert_eq!(coerce_decimal(Some(&json!(2.5))), dec!(2.5));
        assert_eq!(coerce_decimal(Some(&json!("17"))), dec!(17));
        assert_eq!(coerce_decimal(Some(&json!(""))), Decimal::ZERO);
        assert_eq!(coerce_decimal(Some(&json!("abc"))), Decimal::ZERO);
        assert_eq!(coerce_decimal(Some(&json!(null))), Decimal::ZERO);
        assert_eq!(coerce_decimal(None), Decimal::ZERO);
    }

    #[test]
    fn ids_coerce_and_reject_non_positive() {
        assert_eq!(coerce_id(Some(&json!(7))), Some(7));
        assert_eq!(coerce_id(Some(&json!("12"))), Some(12));
        assert_eq!(coerce_id(Some(&json!(""))), None);
        assert_eq!(coerce_id(Some(&json!(0))), None);
        assert_eq!(coerce_id(Some(&json!(-3))), None);
    }

    #[test]
    fn dates_parse_with_datetime_suffixes() {
        assert_eq!(
            parse_date("2025-03-04"),
            NaiveDate::from_ymd_opt(2025, 3, 4)
        );
        assert_eq!(
            parse_date("2025-03-04T00:00:00Z"),
            NaiveDate::from_ymd_opt(2025, 3, 4)
        );
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("04/03/2025"), None);
    }
}
