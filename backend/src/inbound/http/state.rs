//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{MeasurementCommand, MeasurementQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub measurements: Arc<dyn MeasurementCommand>,
    pub measurements_query: Arc<dyn MeasurementQuery>,
}

impl HttpState {
    /// Construct state from the measurement ports.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use bp_backend::domain::MeasurementService;
    /// use bp_backend::domain::ports::FixtureMeasurementRepository;
    /// use bp_backend::inbound::http::state::HttpState;
    /// use mockable::DefaultClock;
    ///
    /// let service = Arc::new(MeasurementService::new(
    ///     Arc::new(FixtureMeasurementRepository),
    ///     Arc::new(DefaultClock),
    /// ));
    /// let state = HttpState::new(service.clone(), service);
    /// let _command = state.measurements.clone();
    /// ```
    pub fn new(
        measurements: Arc<dyn MeasurementCommand>,
        measurements_query: Arc<dyn MeasurementQuery>,
    ) -> Self {
        Self {
            measurements,
            measurements_query,
        }
    }
}
