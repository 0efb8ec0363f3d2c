//! Driving port for reading measurements back.
//!
//! Inbound adapters use this port to list a user's readings, fetch a
//! highlighted history, and build the monthly cross-user summary without
//! importing outbound persistence concerns.

use async_trait::async_trait;

use crate::domain::{Error, Measurement, MeasurementHistory, UserId, UserSummary, YearMonth};

/// Optional bounds of a history request, as submitted.
///
/// Filtering applies only when both bounds are present and non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryBounds {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// One user's line in a monthly summary.
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryEntry {
    /// Averages and outliers for the month.
    Summary(UserSummary),
    /// Reading the user's measurements failed; the rest of the summary
    /// still stands.
    Unavailable { user_id: UserId, message: String },
}

impl SummaryEntry {
    pub fn user_id(&self) -> &UserId {
        match self {
            Self::Summary(summary) => &summary.user_id,
            Self::Unavailable { user_id, .. } => user_id,
        }
    }
}

/// Summary of every known user for one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySummary {
    pub month: YearMonth,
    pub entries: Vec<SummaryEntry>,
}

/// Domain use-case port for measurement reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MeasurementQuery: Send + Sync {
    /// Every measurement of a user in stored order.
    ///
    /// # Errors
    ///
    /// Returns not found when the user has no measurements.
    async fn list_measurements(&self, user_id: &UserId) -> Result<Vec<Measurement>, Error>;

    /// Measurements of a user within the optional bounds, with averages and
    /// highlights relative to that set.
    ///
    /// # Errors
    ///
    /// Returns an invalid request for a malformed bound and not found when
    /// nothing matches.
    async fn history(
        &self,
        user_id: &UserId,
        bounds: HistoryBounds,
    ) -> Result<MeasurementHistory, Error>;

    /// Per-user averages and outlier counts for one calendar month.
    ///
    /// Users without readings in the month are reported with zeros.
    async fn monthly_summary(&self, month: YearMonth) -> Result<MonthlySummary, Error>;
}
