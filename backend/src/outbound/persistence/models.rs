//! Internal Diesel row structs for the measurements table.
//!
//! These types never leave the persistence layer.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{Measurement, MeasurementDate, MeasurementId, UserId};

use super::schema::measurements;

/// Row struct for reading from the measurements table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = measurements)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MeasurementRow {
    pub id: Uuid,
    pub user_id: String,
    pub systolic: i32,
    pub diastolic: i32,
    pub pulse: Option<i32>,
    pub date: String,
    pub recorded_at: Option<DateTime<Utc>>,
}

/// Insertable struct for appending a measurement.
///
/// `seq` and `created_at` are filled in by column defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = measurements)]
pub(crate) struct NewMeasurementRow<'a> {
    pub id: Uuid,
    pub user_id: &'a str,
    pub systolic: i32,
    pub diastolic: i32,
    pub pulse: Option<i32>,
    pub date: &'a str,
    pub recorded_at: Option<DateTime<Utc>>,
}

impl<'a> From<&'a Measurement> for NewMeasurementRow<'a> {
    fn from(measurement: &'a Measurement) -> Self {
        Self {
            id: *measurement.id.as_uuid(),
            user_id: measurement.user_id.as_ref(),
            systolic: measurement.systolic,
            diastolic: measurement.diastolic,
            pulse: measurement.pulse,
            date: measurement.date.as_str(),
            recorded_at: measurement.date.instant(),
        }
    }
}

impl MeasurementRow {
    /// Convert a stored row back into the domain type.
    ///
    /// Returns `None` when the stored user id is blank, which the domain
    /// never writes.
    pub(crate) fn into_domain(self) -> Option<Measurement> {
        let user_id = UserId::new(self.user_id).ok()?;
        Some(Measurement {
            id: MeasurementId::from_uuid(self.id),
            user_id,
            systolic: self.systolic,
            diastolic: self.diastolic,
            pulse: self.pulse,
            date: MeasurementDate::from_parts(self.date, self.recorded_at),
        })
    }
}
