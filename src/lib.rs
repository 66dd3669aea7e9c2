//! Belancer admin statistics.
//!
//! Fetches paged collections from the Belancer admin API and derives the
//! figures shown on the admin dashboard: how many successful deposits,
//! withdrawals and payouts happened today, this month, this year and overall,
//! how much money they moved, and how activity changed week over week.
//! Calendar buckets follow the local calendar of a configured timezone,
//! "Asia/Dhaka" by default.

#![warn(missing_docs)]

pub mod aggregation;
pub mod api;
pub mod auth;
pub mod classify;
pub mod config;
mod error;
mod logging;
pub mod pagination;
pub mod review;
pub mod stats;
pub mod timezone;
pub mod transaction;
pub mod trend;

pub use api::{ApiClient, Collection};
pub use auth::AuthContext;
pub use config::StatsConfig;
pub use error::Error;
pub use logging::LOG_BODY_LENGTH_LIMIT;
pub use stats::{MountGuard, StatsView, TransactionStats, compute_stats};
pub use transaction::Transaction;
