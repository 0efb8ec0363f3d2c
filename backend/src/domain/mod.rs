//! Domain primitives, pure computations, and the measurement use-cases.
//!
//! Purpose: hold the transport-agnostic core of the service. Validation of
//! submitted readings and the outlier statistics are pure functions; the
//! measurement service composes them with the storage port.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Measurement and its identifiers: the stored reading.
//! - validate_reading: admissibility rules for submitted readings.
//! - Cohort / CohortAverages: averages and outlier predicates.
//! - DateRange / YearMonth: closed time windows for filtering.
//! - MeasurementService: implementation of the driving ports.

pub mod aggregation;
pub mod date_range;
pub mod error;
pub mod measurement;
pub mod measurement_service;
pub mod ports;
pub mod reading_validation;
pub mod trace_id;

pub use self::aggregation::{
    Cohort, CohortAverages, HighlightedMeasurement, MeasurementHistory, UserSummary,
};
pub use self::date_range::{DateRange, DateRangeError, YearMonth, YearMonthParseError};
pub use self::error::{Error, ErrorCode};
pub use self::measurement::{
    Measurement, MeasurementDate, MeasurementId, NewMeasurement, UserId, UserIdValidationError,
};
pub use self::measurement_service::MeasurementService;
pub use self::reading_validation::{
    RawReading, ReadingRejection, ValidatedReading, validate_reading,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
