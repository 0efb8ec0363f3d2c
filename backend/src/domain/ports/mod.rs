//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod measurement_command;
mod measurement_query;
mod measurement_repository;

pub use measurement_command::{MeasurementCommand, RecordMeasurementRequest};
#[cfg(test)]
pub use measurement_command::MockMeasurementCommand;
pub use measurement_query::{HistoryBounds, MeasurementQuery, MonthlySummary, SummaryEntry};
#[cfg(test)]
pub use measurement_query::MockMeasurementQuery;
pub use measurement_repository::{
    FixtureMeasurementRepository, MeasurementRepository, MeasurementRepositoryError,
};
#[cfg(test)]
pub use measurement_repository::MockMeasurementRepository;
