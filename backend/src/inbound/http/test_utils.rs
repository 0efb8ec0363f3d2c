//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::Trace;
use crate::domain::ports::{MockMeasurementCommand, MockMeasurementQuery};
use crate::inbound::http::history::get_history;
use crate::inbound::http::json_config;
use crate::inbound::http::measurements::{list_measurements, record_measurement};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::summary::get_users_summary;

/// Build an application exposing every measurement endpoint over the given
/// port doubles.
///
/// - Wraps the app in [`Trace`] so error bodies and headers carry a trace
///   identifier as in production.
/// - Registers the JSON error handler so malformed bodies map to 400.
pub fn test_app(
    command: MockMeasurementCommand,
    query: MockMeasurementQuery,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = HttpState::new(Arc::new(command), Arc::new(query));
    App::new()
        .app_data(web::Data::new(state))
        .app_data(json_config())
        .wrap(Trace)
        .service(record_measurement)
        .service(list_measurements)
        .service(get_history)
        .service(get_users_summary)
}
