//! Measurement domain service implementing the driving ports.
//!
//! Naive and date-only values, both in submitted dates and in query bounds,
//! are read in the server's local time zone.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;
use futures_util::future::join_all;
use mockable::Clock;
use tracing::{debug, error};

use crate::domain::ports::{
    HistoryBounds, MeasurementCommand, MeasurementQuery, MeasurementRepository,
    MeasurementRepositoryError, MonthlySummary, RecordMeasurementRequest, SummaryEntry,
};
use crate::domain::{
    Cohort, DateRange, Error, Measurement, MeasurementDate, MeasurementHistory, MeasurementId,
    NewMeasurement, UserId, UserSummary, YearMonth,
};

/// Client-facing message for a failed write.
pub const WRITE_FAILURE_MESSAGE: &str = "שגיאה בשמירה";
/// Client-facing message for a failed read.
pub const READ_FAILURE_MESSAGE: &str = "שגיאה בקריאה";
/// Client-facing message when a user has nothing to show.
pub const NO_MEASUREMENTS_MESSAGE: &str = "אין נתונים למשתמש הזה";

/// Measurement service implementing [`MeasurementCommand`] and
/// [`MeasurementQuery`].
#[derive(Clone)]
pub struct MeasurementService<R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> MeasurementService<R> {
    /// Create a service over a repository and a clock.
    ///
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use bp_backend::domain::MeasurementService;
    /// # use bp_backend::domain::ports::FixtureMeasurementRepository;
    /// # use mockable::DefaultClock;
    /// let service = MeasurementService::new(
    ///     Arc::new(FixtureMeasurementRepository),
    ///     Arc::new(DefaultClock),
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

impl<R> MeasurementService<R>
where
    R: MeasurementRepository,
{
    fn write_failure(err: MeasurementRepositoryError) -> Error {
        error!(error = %err, "failed to store measurement");
        Error::internal(WRITE_FAILURE_MESSAGE)
    }

    fn read_failure(err: MeasurementRepositoryError) -> Error {
        error!(error = %err, "failed to read measurements");
        Error::internal(READ_FAILURE_MESSAGE)
    }

    fn stamp_date(&self, submitted: Option<String>) -> MeasurementDate {
        match submitted.filter(|raw| !raw.is_empty()) {
            Some(raw) => MeasurementDate::parse_in(raw, &Local),
            None => MeasurementDate::submitted_at(self.clock.utc()),
        }
    }

    async fn summarise_user(&self, user_id: UserId, range: DateRange) -> SummaryEntry {
        match self.repo.find_by_user(&user_id, Some(range)).await {
            Ok(measurements) => {
                SummaryEntry::Summary(UserSummary::from_measurements(user_id, measurements))
            }
            Err(err) => {
                error!(error = %err, user_id = %user_id, "failed to read measurements for summary");
                SummaryEntry::Unavailable {
                    user_id,
                    message: READ_FAILURE_MESSAGE.to_owned(),
                }
            }
        }
    }
}

#[async_trait]
impl<R> MeasurementCommand for MeasurementService<R>
where
    R: MeasurementRepository,
{
    async fn record(&self, request: RecordMeasurementRequest) -> Result<Measurement, Error> {
        let RecordMeasurementRequest {
            user_id,
            reading,
            date,
        } = request;
        let measurement = Measurement::create(
            MeasurementId::random(),
            NewMeasurement {
                user_id,
                reading,
                date: self.stamp_date(date),
            },
        );
        self.repo
            .append(&measurement)
            .await
            .map_err(Self::write_failure)?;
        Ok(measurement)
    }
}

#[async_trait]
impl<R> MeasurementQuery for MeasurementService<R>
where
    R: MeasurementRepository,
{
    async fn list_measurements(&self, user_id: &UserId) -> Result<Vec<Measurement>, Error> {
        let measurements = self
            .repo
            .find_by_user(user_id, None)
            .await
            .map_err(Self::read_failure)?;
        if measurements.is_empty() {
            return Err(Error::not_found(NO_MEASUREMENTS_MESSAGE));
        }
        Ok(measurements)
    }

    async fn history(
        &self,
        user_id: &UserId,
        bounds: HistoryBounds,
    ) -> Result<MeasurementHistory, Error> {
        // A bound that cannot be read matches no stored date.
        let range = DateRange::from_query_bounds(
            bounds.start_date.as_deref(),
            bounds.end_date.as_deref(),
            &Local,
        )
        .map_err(|err| {
            debug!(error = %err, "history window matches nothing");
            Error::not_found(NO_MEASUREMENTS_MESSAGE)
        })?;
        let measurements = self
            .repo
            .find_by_user(user_id, range)
            .await
            .map_err(Self::read_failure)?;
        let cohort =
            Cohort::new(measurements).ok_or_else(|| Error::not_found(NO_MEASUREMENTS_MESSAGE))?;
        Ok(MeasurementHistory::from_cohort(user_id.clone(), cohort))
    }

    async fn monthly_summary(&self, month: YearMonth) -> Result<MonthlySummary, Error> {
        let range = DateRange::calendar_month(month, &Local)
            .ok_or_else(|| Error::invalid_request(format!("month {month} is out of range")))?;
        let user_ids = self
            .repo
            .list_user_ids()
            .await
            .map_err(Self::read_failure)?;
        let entries = join_all(
            user_ids
                .into_iter()
                .map(|user_id| self.summarise_user(user_id, range)),
        )
        .await;
        Ok(MonthlySummary { month, entries })
    }
}

#[cfg(test)]
#[path = "measurement_service_tests.rs"]
mod tests;
