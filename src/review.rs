//! Review status of withdrawals, disputes and applications.
//!
//! Admins approve or reject pending requests. Once decided, a request stays
//! decided.

use std::{convert::Infallible, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use crate::{
    Error,
    transaction::{first_timestamp, parse_amount},
};

/// Where a request is in the admin review workflow.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReviewStatus {
    /// Waiting for an admin decision.
    Pending,
    /// Approved (or accepted) by an admin.
    Approved,
    /// Rejected (or declined) by an admin.
    Rejected,
    /// Any status this crate does not know about, lower-cased.
    Other(String),
}

impl From<&str> for ReviewStatus {
    fn from(text: &str) -> Self {
        match text.trim().to_lowercase().as_str() {
            "pending" => Self::Pending,
            "approved" | "accepted" => Self::Approved,
            "rejected" | "declined" => Self::Rejected,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl FromStr for ReviewStatus {
    type Err = Infallible;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(text))
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
            Self::Other(status) => write!(f, "{status}"),
        }
    }
}

impl ReviewStatus {
    /// Apply an admin decision, returning the new status.
    ///
    /// # Errors
    /// Returns [Error::InvalidTransition] unless `self` is pending and
    /// `decision` is approved or rejected.
    pub fn transition(&self, decision: ReviewStatus) -> Result<ReviewStatus, Error> {
        match (self, &decision) {
            (Self::Pending, Self::Approved | Self::Rejected) => Ok(decision),
            _ => Err(Error::InvalidTransition {
                from: self.to_string(),
                to: decision.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ReviewRecordDto {
    #[serde(default, alias = "_id")]
    id: Option<Value>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    amount: Option<Value>,
    #[serde(default)]
    created_at: Option<Value>,
    #[serde(default, rename = "createdAt")]
    created_at_camel: Option<Value>,
    #[serde(default)]
    date_created: Option<Value>,
}

/// A withdrawal, dispute or application as far as the review workflow cares.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "ReviewRecordDto")]
pub struct ReviewRecord {
    /// The record's ID, if the API sent one.
    pub id: Option<String>,
    /// The review status. Missing statuses are read as pending.
    pub status: ReviewStatus,
    /// The requested amount, zero for records without one.
    pub amount: f64,
    /// When the request was made.
    pub created_at: Option<OffsetDateTime>,
}

impl From<ReviewRecordDto> for ReviewRecord {
    fn from(dto: ReviewRecordDto) -> Self {
        let id = match dto.id {
            Some(Value::String(id)) => Some(id),
            Some(Value::Number(id)) => Some(id.to_string()),
            _ => None,
        };
        let status = dto
            .status
            .as_deref()
            .map_or(ReviewStatus::Pending, ReviewStatus::from);

        Self {
            id,
            status,
            amount: parse_amount(dto.amount.as_ref()),
            created_at: first_timestamp([
                dto.created_at.as_ref(),
                dto.created_at_camel.as_ref(),
                dto.date_created.as_ref(),
            ]),
        }
    }
}

/// Number of records in each review status and the money involved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatusTally {
    /// Records waiting for review.
    pub pending: u64,
    /// Approved records.
    pub approved: u64,
    /// Rejected records.
    pub rejected: u64,
    /// Records in any other status.
    pub other: u64,
    /// Total amount awaiting review.
    pub pending_amount: f64,
    /// Total amount approved.
    pub approved_amount: f64,
}

impl StatusTally {
    /// Every record counted.
    pub fn total(&self) -> u64 {
        self.pending + self.approved + self.rejected + self.other
    }
}

/// Count `records` by review status.
pub fn tally<'a>(records: impl IntoIterator<Item = &'a ReviewRecord>) -> StatusTally {
    records
        .into_iter()
        .fold(StatusTally::default(), |mut tally, record| {
            match record.status {
                ReviewStatus::Pending => {
                    tally.pending += 1;
                    tally.pending_amount += record.amount;
                }
                ReviewStatus::Approved => {
                    tally.approved += 1;
                    tally.approved_amount += record.amount;
                }
                ReviewStatus::Rejected => tally.rejected += 1,
                ReviewStatus::Other(_) => tally.other += 1,
            }

            tally
        })
}
