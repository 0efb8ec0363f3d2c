//! Process-local `MeasurementRepository` backed by a vector.
//!
//! Contents are lost on restart. Appends keep insertion order, which is the
//! order every read returns.

use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::ports::{MeasurementRepository, MeasurementRepositoryError};
use crate::domain::{DateRange, Measurement, UserId};

/// In-memory measurement store shared across request handlers.
#[derive(Debug, Default)]
pub struct InMemoryMeasurementRepository {
    measurements: RwLock<Vec<Measurement>>,
}

impl InMemoryMeasurementRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: PoisonError<T>) -> MeasurementRepositoryError {
    MeasurementRepositoryError::query("measurement store lock poisoned")
}

fn in_range(measurement: &Measurement, range: Option<DateRange>) -> bool {
    match range {
        None => true,
        Some(range) => measurement
            .date
            .instant()
            .is_some_and(|instant| range.contains(instant)),
    }
}

#[async_trait]
impl MeasurementRepository for InMemoryMeasurementRepository {
    async fn append(&self, measurement: &Measurement) -> Result<(), MeasurementRepositoryError> {
        self.measurements
            .write()
            .map_err(poisoned)?
            .push(measurement.clone());
        Ok(())
    }

    async fn find_by_user(
        &self,
        user_id: &UserId,
        range: Option<DateRange>,
    ) -> Result<Vec<Measurement>, MeasurementRepositoryError> {
        let measurements = self.measurements.read().map_err(poisoned)?;
        Ok(measurements
            .iter()
            .filter(|measurement| &measurement.user_id == user_id)
            .filter(|measurement| in_range(measurement, range))
            .cloned()
            .collect())
    }

    async fn list_user_ids(&self) -> Result<Vec<UserId>, MeasurementRepositoryError> {
        let measurements = self.measurements.read().map_err(poisoned)?;
        let mut seen: HashSet<&UserId> = HashSet::new();
        Ok(measurements
            .iter()
            .filter(|measurement| seen.insert(&measurement.user_id))
            .map(|measurement| measurement.user_id.clone())
            .collect())
    }
}
