//! Driving port for recording measurements.
//!
//! HTTP handlers validate the submitted reading first and hand the accepted
//! values to [`MeasurementCommand::record`], which stamps the date and
//! persists the result.

use async_trait::async_trait;

use crate::domain::{Error, Measurement, UserId, ValidatedReading};

/// Request to record one accepted reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordMeasurementRequest {
    /// The user the reading belongs to.
    pub user_id: UserId,
    /// Reading that already passed [`crate::domain::validate_reading`].
    pub reading: ValidatedReading,
    /// Date as submitted. `None` or an empty string means "now".
    pub date: Option<String>,
}

/// Domain use-case port for recording measurements.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MeasurementCommand: Send + Sync {
    /// Store a measurement and return it as persisted.
    ///
    /// # Errors
    ///
    /// Returns an internal error when storage rejects the write.
    async fn record(&self, request: RecordMeasurementRequest) -> Result<Measurement, Error>;
}
