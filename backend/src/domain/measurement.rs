//! Stored blood-pressure measurements and their identifiers.
//!
//! A [`Measurement`] is created once, after a reading has been accepted, and
//! never changes afterwards. Dates are kept verbatim as submitted; the
//! interpreted instant travels alongside so storage adapters can run range
//! scans without reparsing.

use std::fmt;

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::ValidatedReading;
use super::date_range::TimestampLiteral;

/// Validation errors returned by [`UserId::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserIdValidationError {
    /// The identifier is empty or whitespace.
    #[error("user id must not be empty")]
    Empty,
}

/// Opaque user identifier taken from the request path.
///
/// # Examples
/// ```
/// use bp_backend::domain::UserId;
///
/// let id = UserId::new("user1").expect("valid id");
/// assert_eq!(id.as_ref(), "user1");
/// assert!(UserId::new("  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    pub fn new(id: impl Into<String>) -> Result<Self, UserIdValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(UserIdValidationError::Empty);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Opaque key of a stored measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeasurementId(Uuid);

impl MeasurementId {
    /// Generate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an identifier read back from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for MeasurementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Date attached to a measurement.
///
/// The raw string is what clients submitted and what they get back; it is
/// never rewritten. `instant` is the moment the string denotes, or `None`
/// when the string could not be interpreted, in which case the measurement
/// never falls inside a date window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasurementDate {
    raw: String,
    instant: Option<DateTime<Utc>>,
}

impl MeasurementDate {
    /// Interpret a submitted date, reading naive values in `tz`.
    ///
    /// # Examples
    /// ```
    /// use bp_backend::domain::MeasurementDate;
    /// use chrono::Utc;
    ///
    /// let date = MeasurementDate::parse_in("2023-11-05T10:00:00.000Z", &Utc);
    /// assert!(date.instant().is_some());
    ///
    /// let odd = MeasurementDate::parse_in("last tuesday", &Utc);
    /// assert_eq!(odd.as_str(), "last tuesday");
    /// assert!(odd.instant().is_none());
    /// ```
    pub fn parse_in<Tz: TimeZone>(raw: impl Into<String>, tz: &Tz) -> Self {
        let raw = raw.into();
        let instant = TimestampLiteral::parse(&raw).and_then(|literal| literal.first_instant(tz));
        Self { raw, instant }
    }

    /// Date stamped at submission time, formatted like
    /// `2023-11-05T10:00:00.000Z`.
    pub fn submitted_at(now: DateTime<Utc>) -> Self {
        Self {
            raw: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            instant: Some(now),
        }
    }

    /// Rebuild a date from stored parts without reinterpreting it.
    pub fn from_parts(raw: impl Into<String>, instant: Option<DateTime<Utc>>) -> Self {
        Self {
            raw: raw.into(),
            instant,
        }
    }

    /// The date exactly as submitted.
    pub fn as_str(&self) -> &str {
        self.raw.as_str()
    }

    /// The interpreted instant, if any.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        self.instant
    }
}

/// Measurement awaiting persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMeasurement {
    pub user_id: UserId,
    pub reading: ValidatedReading,
    pub date: MeasurementDate,
}

/// A stored blood-pressure reading.
///
/// ## Invariants
/// - `systolic` lies in 50..=250 and `diastolic` in 30..=150; both were
///   checked by [`crate::domain::validate_reading`] before creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Measurement {
    pub id: MeasurementId,
    pub user_id: UserId,
    pub systolic: i32,
    pub diastolic: i32,
    pub pulse: Option<i32>,
    pub date: MeasurementDate,
}

impl Measurement {
    /// Assign an identifier to an accepted measurement.
    pub fn create(id: MeasurementId, new: NewMeasurement) -> Self {
        let NewMeasurement {
            user_id,
            reading,
            date,
        } = new;
        Self {
            id,
            user_id,
            systolic: reading.systolic(),
            diastolic: reading.diastolic(),
            pulse: reading.pulse(),
            date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RawReading, validate_reading};
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn accepted(systolic: Value, diastolic: Value, pulse: Option<Value>) -> ValidatedReading {
        validate_reading(&RawReading {
            systolic: Some(systolic),
            diastolic: Some(diastolic),
            pulse,
        })
        .expect("reading accepted")
    }

    #[rstest]
    fn submitted_at_uses_millisecond_zulu_format() {
        let now = Utc
            .with_ymd_and_hms(2023, 11, 5, 10, 0, 0)
            .single()
            .expect("valid timestamp");
        let date = MeasurementDate::submitted_at(now);
        assert_eq!(date.as_str(), "2023-11-05T10:00:00.000Z");
        assert_eq!(date.instant(), Some(now));
    }

    #[rstest]
    fn create_copies_reading_and_keeps_date_verbatim() {
        let user_id = UserId::new("user1").expect("valid id");
        let id = MeasurementId::from_uuid(Uuid::nil());
        let measurement = Measurement::create(
            id,
            NewMeasurement {
                user_id: user_id.clone(),
                reading: accepted(json!(120), json!("80"), Some(json!(64))),
                date: MeasurementDate::parse_in("not a date", &Utc),
            },
        );

        assert_eq!(measurement.id, id);
        assert_eq!(measurement.user_id, user_id);
        assert_eq!(
            (measurement.systolic, measurement.diastolic, measurement.pulse),
            (120, 80, Some(64))
        );
        assert_eq!(measurement.date.as_str(), "not a date");
        assert!(measurement.date.instant().is_none());
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn user_id_rejects_blank(#[case] raw: &str) {
        assert_eq!(UserId::new(raw), Err(UserIdValidationError::Empty));
    }
}
