//! Transaction records as returned by the `/transactions` endpoint.
//!
//! The API is inconsistent about field names and types: the creation time may
//! be under `created_at`, `createdAt` or `date_created`, and amounts may be
//! numbers or numeric strings. [TransactionDto] captures the raw shape and is
//! normalised into a [Transaction] exactly once, during deserialization, so
//! the rest of the crate only sees the canonical fields.

use serde::Deserialize;
use serde_json::Value;
use time::{
    Date, OffsetDateTime, PrimitiveDateTime,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

/// Date time without an offset and with fractional seconds, e.g. "2026-10-18T09:30:00.123".
const ISO_FRACTIONAL_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");

/// Date time without an offset, e.g. "2026-10-18T09:30:00".
const ISO_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

/// SQL style date time, e.g. "2026-10-18 09:30:00".
const SQL_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// A transaction exactly as it appears on the wire.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransactionDto {
    /// Free-text category, e.g. "deposit" or "Withdrawal".
    #[serde(default)]
    pub transaction_type: Option<String>,
    /// Free-text status, e.g. "success" or "pending".
    #[serde(default)]
    pub status: Option<String>,
    /// Preferred creation time field.
    #[serde(default)]
    pub created_at: Option<Value>,
    /// Creation time as sent by the newer endpoints.
    #[serde(default, rename = "createdAt")]
    pub created_at_camel: Option<Value>,
    /// Creation time as sent by the legacy endpoints.
    #[serde(default)]
    pub date_created: Option<Value>,
    /// Monetary value as a number or a numeric string.
    #[serde(default)]
    pub amount: Option<Value>,
}

/// A transaction with its fields normalised.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "TransactionDto")]
pub struct Transaction {
    /// The category, empty if the API omitted it.
    pub transaction_type: String,
    /// The status, empty if the API omitted it.
    pub status: String,
    /// When the transaction was created, `None` if missing or unparseable.
    pub created_at: Option<OffsetDateTime>,
    /// The amount, zero if missing or non-numeric.
    pub amount: f64,
}

impl From<TransactionDto> for Transaction {
    fn from(dto: TransactionDto) -> Self {
        let created_at = first_timestamp([
            dto.created_at.as_ref(),
            dto.created_at_camel.as_ref(),
            dto.date_created.as_ref(),
        ]);

        Self {
            transaction_type: dto.transaction_type.unwrap_or_default(),
            status: dto.status.unwrap_or_default(),
            created_at,
            amount: parse_amount(dto.amount.as_ref()),
        }
    }
}

/// Picks the first present timestamp candidate and parses it.
///
/// Null, empty-string, zero and `false` candidates are skipped. A present but unparseable
/// candidate still wins, in which case the result is `None`.
pub(crate) fn first_timestamp<'a>(
    candidates: impl IntoIterator<Item = Option<&'a Value>>,
) -> Option<OffsetDateTime> {
    candidates
        .into_iter()
        .flatten()
        .find(|value| is_present(value))
        .and_then(parse_timestamp)
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(text) => !text.is_empty(),
        Value::Number(number) => number.as_f64().is_some_and(|number| number != 0.0),
        _ => true,
    }
}

/// Parse a timestamp from a JSON string or a number of epoch milliseconds.
///
/// Strings without an offset are interpreted as UTC.
pub(crate) fn parse_timestamp(value: &Value) -> Option<OffsetDateTime> {
    match value {
        Value::String(text) => parse_timestamp_str(text.trim()),
        Value::Number(number) => {
            let millis = number.as_f64()?;
            if !millis.is_finite() {
                return None;
            }

            let nanos = (millis * 1_000_000.0) as i128;
            OffsetDateTime::from_unix_timestamp_nanos(nanos).ok()
        }
        _ => None,
    }
}

fn parse_timestamp_str(text: &str) -> Option<OffsetDateTime> {
    if let Ok(date_time) = OffsetDateTime::parse(text, &Rfc3339) {
        return Some(date_time);
    }

    for format in [ISO_FRACTIONAL_FORMAT, ISO_FORMAT, SQL_FORMAT] {
        if let Ok(date_time) = PrimitiveDateTime::parse(text, format) {
            return Some(date_time.assume_utc());
        }
    }

    Date::parse(text, DATE_FORMAT)
        .ok()
        .map(|date| date.midnight().assume_utc())
}

/// Parse an amount from a JSON number or numeric string, falling back to zero.
pub(crate) fn parse_amount(value: Option<&Value>) -> f64 {
    let amount = match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    amount.filter(|amount| amount.is_finite()).unwrap_or(0.0)
}
