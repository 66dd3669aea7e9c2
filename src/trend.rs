//! Week-over-week change in the number of records.

use serde::Serialize;
use time::{Duration, OffsetDateTime};

use crate::transaction::Transaction;

/// The length of each trend window.
pub const TREND_WINDOW: Duration = Duration::days(7);

/// Record counts for the last seven days against the seven days before that.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Trend {
    /// Records in `[now - 7 days, now)`.
    pub cur: u64,
    /// Records in `[now - 14 days, now - 7 days)`.
    pub prev: u64,
    /// Percentage change from `prev` to `cur`, rounded to a whole number.
    pub pct: i64,
}

/// Counts records in the current and previous week and the change between them.
///
/// Both windows are half-open, so a record created at exactly `now` is not in
/// the current window and a record at exactly `now - 7 days` is in the current
/// window, not the previous one. Records without a timestamp are ignored.
pub fn calculate_trend<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    now: OffsetDateTime,
) -> Trend {
    let start = now - TREND_WINDOW;
    let prev_start = start - TREND_WINDOW;

    let mut cur = 0;
    let mut prev = 0;

    for created_at in transactions
        .into_iter()
        .filter_map(|transaction| transaction.created_at)
    {
        if (start..now).contains(&created_at) {
            cur += 1;
        } else if (prev_start..start).contains(&created_at) {
            prev += 1;
        }
    }

    Trend {
        cur,
        prev,
        pct: percent_change(cur, prev),
    }
}

/// The percentage change from `prev` to `cur`.
///
/// Growth from nothing is reported as 100%, and no activity in either window
/// as 0%. Halves round up, e.g. -2.5% becomes -2%.
pub fn percent_change(cur: u64, prev: u64) -> i64 {
    if prev == 0 {
        return if cur > 0 { 100 } else { 0 };
    }

    let change = (cur as f64 - prev as f64) / prev as f64 * 100.0;
    (change + 0.5).floor() as i64
}
