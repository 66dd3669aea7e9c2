//! Count and amount totals per calendar bucket.

use serde::Serialize;
use time::OffsetDateTime;
use time_tz::Tz;

use crate::{timezone::CalendarBucket, transaction::Transaction};

/// Totals for the current day, month and year, and for all time.
///
/// Buckets nest: anything counted in `daily` is also in `monthly`, anything in
/// `monthly` is also in `yearly`, and everything is in `total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BucketTotals<T> {
    /// Total for the current local day.
    pub daily: T,
    /// Total for the current local month.
    pub monthly: T,
    /// Total for the current local year.
    pub yearly: T,
    /// Total over every record with a valid timestamp.
    pub total: T,
}

/// Number of records per bucket.
pub type Counts = BucketTotals<u64>;

/// Sum of record amounts per bucket.
pub type Amounts = BucketTotals<f64>;

/// Computes counts and amounts per bucket relative to `now` in `timezone`.
///
/// Callers are expected to pass only countable records. Records without a
/// timestamp, or whose timestamp cannot be placed on the local calendar, are
/// left out of every bucket including `total`.
pub fn aggregate<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    now: OffsetDateTime,
    timezone: &Tz,
) -> (Counts, Amounts) {
    let mut counts = Counts::default();
    let mut amounts = Amounts::default();
    let today = CalendarBucket::from_instant(now, timezone);

    for transaction in transactions {
        let Some(bucket) = transaction
            .created_at
            .and_then(|created_at| CalendarBucket::from_instant(created_at, timezone))
        else {
            continue;
        };

        let amount = transaction.amount;
        counts.total += 1;
        amounts.total += amount;

        let Some(today) = today.as_ref() else {
            continue;
        };

        if !bucket.same_year(today) {
            continue;
        }
        counts.yearly += 1;
        amounts.yearly += amount;

        if !bucket.same_month(today) {
            continue;
        }
        counts.monthly += 1;
        amounts.monthly += amount;

        if !bucket.same_day(today) {
            continue;
        }
        counts.daily += 1;
        amounts.daily += amount;
    }

    (counts, amounts)
}

#[cfg(test)]
mod tests {
    use time::{OffsetDateTime, macros::datetime};

    use crate::{
        aggregation::{Amounts, Counts, aggregate},
        timezone::{DEFAULT_TIMEZONE, get_timezone},
        transaction::Transaction,
    };

    fn create_test_transaction(amount: f64, created_at: Option<OffsetDateTime>) -> Transaction {
        Transaction {
            transaction_type: "deposit".to_owned(),
            status: "success".to_owned(),
            created_at,
            amount,
        }
    }

    const NOW: OffsetDateTime = datetime!(2026-10-18 06:00 UTC);

    #[test]
    fn empty_input_is_all_zeros() {
        let tz = get_timezone(DEFAULT_TIMEZONE).unwrap();
        let transactions: Vec<Transaction> = Vec::new();

        let (counts, amounts) = aggregate(&transactions, NOW, tz);

        assert_eq!(counts, Counts::default());
        assert_eq!(amounts, Amounts::default());
    }

    #[test]
    fn buckets_nest_by_day_month_and_year() {
        let tz = get_timezone(DEFAULT_TIMEZONE).unwrap();
        let transactions = vec![
            create_test_transaction(10.0, Some(datetime!(2026-10-18 01:00 UTC))),
            create_test_transaction(20.0, Some(datetime!(2026-10-02 12:00 UTC))),
            create_test_transaction(40.0, Some(datetime!(2026-03-15 12:00 UTC))),
            create_test_transaction(80.0, Some(datetime!(2024-10-18 01:00 UTC))),
        ];

        let (counts, amounts) = aggregate(&transactions, NOW, tz);

        assert_eq!(
            counts,
            Counts {
                daily: 1,
                monthly: 2,
                yearly: 3,
                total: 4
            }
        );
        assert_eq!(
            amounts,
            Amounts {
                daily: 10.0,
                monthly: 30.0,
                yearly: 70.0,
                total: 150.0
            }
        );
    }

    #[test]
    fn same_day_and_month_in_a_different_year_only_counts_toward_total() {
        let tz = get_timezone(DEFAULT_TIMEZONE).unwrap();
        let transactions = vec![create_test_transaction(
            5.0,
            Some(datetime!(2025-10-18 06:00 UTC)),
        )];

        let (counts, _) = aggregate(&transactions, NOW, tz);

        assert_eq!(counts.total, 1);
        assert_eq!(counts.yearly, 0);
        assert_eq!(counts.monthly, 0);
        assert_eq!(counts.daily, 0);
    }

    #[test]
    fn days_are_compared_in_the_local_timezone() {
        let tz = get_timezone(DEFAULT_TIMEZONE).unwrap();
        // 19:00 UTC on the 17th is 01:00 on the 18th in Dhaka.
        let transactions = vec![
            create_test_transaction(1.0, Some(datetime!(2026-10-17 19:00 UTC))),
            create_test_transaction(1.0, Some(datetime!(2026-10-17 17:00 UTC))),
        ];

        let (counts, _) = aggregate(&transactions, NOW, tz);

        assert_eq!(counts.daily, 1);
        assert_eq!(counts.monthly, 2);
    }

    #[test]
    fn records_without_a_timestamp_are_skipped_entirely() {
        let tz = get_timezone(DEFAULT_TIMEZONE).unwrap();
        let transactions = vec![
            create_test_transaction(100.0, None),
            create_test_transaction(7.0, Some(datetime!(2026-10-18 02:00 UTC))),
        ];

        let (counts, amounts) = aggregate(&transactions, NOW, tz);

        assert_eq!(counts.total, 1);
        assert_eq!(amounts.total, 7.0);
    }

    #[test]
    fn buckets_are_ordered_for_non_negative_amounts() {
        let tz = get_timezone(DEFAULT_TIMEZONE).unwrap();
        let transactions: Vec<Transaction> = (0..60)
            .map(|days_ago| {
                create_test_transaction(
                    days_ago as f64 * 1.5,
                    Some(NOW - time::Duration::days(days_ago * 7)),
                )
            })
            .collect();

        let (counts, amounts) = aggregate(&transactions, NOW, tz);

        assert!(counts.daily <= counts.monthly);
        assert!(counts.monthly <= counts.yearly);
        assert!(counts.yearly <= counts.total);
        assert!(amounts.daily <= amounts.monthly);
        assert!(amounts.monthly <= amounts.yearly);
        assert!(amounts.yearly <= amounts.total);
    }
}
