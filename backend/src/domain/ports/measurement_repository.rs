//! Port for measurement persistence.
//!
//! The [`MeasurementRepository`] trait is the only way the domain touches
//! stored readings. Storage is append-only: there is no update or delete.

use async_trait::async_trait;

use crate::domain::{DateRange, Measurement, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by measurement repository adapters.
    pub enum MeasurementRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "measurement repository connection failed: {message}",
        /// Query or insert failed during execution.
        Query { message: String } =>
            "measurement repository query failed: {message}",
    }
}

/// Port for appending and reading back measurements.
///
/// # Ordering
///
/// Reads return measurements in the order they were appended.
///
/// # Windows
///
/// When `range` is supplied only measurements whose interpreted instant lies
/// in the closed window are returned. Measurements with an uninterpretable
/// date never match a window.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MeasurementRepository: Send + Sync {
    /// Persist a new measurement.
    async fn append(&self, measurement: &Measurement) -> Result<(), MeasurementRepositoryError>;

    /// Fetch a user's measurements, optionally restricted to a window.
    async fn find_by_user(
        &self,
        user_id: &UserId,
        range: Option<DateRange>,
    ) -> Result<Vec<Measurement>, MeasurementRepositoryError>;

    /// Distinct identifiers of every user with at least one measurement.
    async fn list_user_ids(&self) -> Result<Vec<UserId>, MeasurementRepositoryError>;
}

/// Fixture implementation for testing without a real database.
///
/// Discards appended measurements and always reads back nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMeasurementRepository;

#[async_trait]
impl MeasurementRepository for FixtureMeasurementRepository {
    async fn append(&self, _measurement: &Measurement) -> Result<(), MeasurementRepositoryError> {
        Ok(())
    }

    async fn find_by_user(
        &self,
        _user_id: &UserId,
        _range: Option<DateRange>,
    ) -> Result<Vec<Measurement>, MeasurementRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_user_ids(&self) -> Result<Vec<UserId>, MeasurementRepositoryError> {
        Ok(Vec::new())
    }
}
