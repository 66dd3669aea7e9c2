//! Transaction statistics for the admin dashboard.
//!
//! [compute_stats] is a pure function of the record set, the current time and
//! the reporting timezone. [StatsView] holds the state a dashboard renders:
//! whether a load is in flight, the last error, and the derived statistics.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use serde::Serialize;
use time::OffsetDateTime;
use time_tz::Tz;

use crate::{
    Error,
    aggregation::{Amounts, Counts, aggregate},
    classify::is_countable,
    pagination::{PageSource, fetch_all_while},
    transaction::Transaction,
    trend::{Trend, calculate_trend},
};

/// Everything the dashboard shows about transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TransactionStats {
    /// Number of countable transactions per bucket.
    pub counts: Counts,
    /// Sum of countable transaction amounts per bucket.
    pub amounts: Amounts,
    /// Week-over-week change in countable transactions.
    pub trend: Trend,
}

/// Compute the dashboard statistics for `transactions`.
///
/// Only countable transactions are considered; see
/// [is_countable](crate::classify::is_countable).
pub fn compute_stats(
    transactions: &[Transaction],
    now: OffsetDateTime,
    timezone: &Tz,
) -> TransactionStats {
    let countable: Vec<&Transaction> = transactions
        .iter()
        .filter(|transaction| is_countable(transaction))
        .collect();

    let (counts, amounts) = aggregate(countable.iter().copied(), now, timezone);
    let trend = calculate_trend(countable.iter().copied(), now);

    TransactionStats {
        counts,
        amounts,
        trend,
    }
}

/// Tracks whether the view that started a fetch is still around.
///
/// Clones share the flag. Unmounting does not abort requests in flight, it
/// only stops their results from being applied.
#[derive(Debug, Clone)]
pub struct MountGuard {
    mounted: Arc<AtomicBool>,
}

impl MountGuard {
    /// Create a guard for a mounted view.
    pub fn new() -> Self {
        Self {
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Mark the view as torn down.
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }

    /// Whether the view is still mounted.
    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }
}

impl Default for MountGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// The transaction statistics shown on the dashboard and the state of loading them.
pub struct StatsView {
    timezone: &'static Tz,
    guard: MountGuard,
    loading: bool,
    error: Option<Error>,
    records: Vec<Transaction>,
    computed_at: Option<OffsetDateTime>,
    stats: TransactionStats,
}

impl StatsView {
    /// Create an empty view that reports in `timezone`.
    pub fn new(timezone: &'static Tz, guard: MountGuard) -> Self {
        Self {
            timezone,
            guard,
            loading: false,
            error: None,
            records: Vec::new(),
            computed_at: None,
            stats: TransactionStats::default(),
        }
    }

    /// Whether a refresh is in progress.
    pub fn loading(&self) -> bool {
        self.loading
    }

    /// The error from the last refresh, if it failed.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// The transactions the statistics were computed from.
    pub fn records(&self) -> &[Transaction] {
        &self.records
    }

    /// The statistics for the current record set.
    pub fn stats(&self) -> &TransactionStats {
        &self.stats
    }

    /// Fetch every transaction page from `source` and recompute the statistics.
    ///
    /// On failure the error is kept, the record set is cleared and the
    /// statistics drop to zero.
    ///
    /// If the guard is unmounted before the fetch settles, its outcome is
    /// discarded whether it succeeded or failed. The view then keeps its
    /// previous records and statistics, with `loading` still set.
    pub async fn refresh<S>(&mut self, source: &S, page_size: u64, now: OffsetDateTime)
    where
        S: PageSource<Transaction>,
    {
        self.loading = true;
        self.error = None;

        let guard = self.guard.clone();
        let result = fetch_all_while(source, page_size, || guard.is_mounted()).await;

        if !self.guard.is_mounted() {
            tracing::debug!("View unmounted during refresh, discarding results");
            return;
        }

        match result {
            Ok(records) => {
                tracing::info!("Loaded {} transactions", records.len());
                self.set_records(records, now);
            }
            Err(error) => {
                tracing::error!("Could not load transactions: {error}");
                self.error = Some(error);
                self.set_records(Vec::new(), now);
            }
        }

        self.loading = false;
    }

    /// Replace the record set and recompute the statistics.
    pub fn set_records(&mut self, records: Vec<Transaction>, now: OffsetDateTime) {
        self.records = records;
        self.computed_at = None;
        self.update(now);
    }

    /// Recompute the statistics for `now` unless they are already up to date.
    ///
    /// Returns whether the statistics were recomputed.
    pub fn update(&mut self, now: OffsetDateTime) -> bool {
        if self.computed_at == Some(now) {
            return false;
        }

        self.stats = compute_stats(&self.records, now, self.timezone);
        self.computed_at = Some(now);
        true
    }
}
