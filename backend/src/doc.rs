//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer together
//! with the wire schemas. The generated document backs Swagger UI in debug
//! builds and is printed by `cargo run --bin openapi-dump`.

use crate::inbound::http::history::{HistoryQuery, HistoryResponse};
use crate::inbound::http::measurements::{
    MeasurementListResponse, MeasurementRequest, RecordMeasurementResponse,
};
use crate::inbound::http::schemas::{ErrorBody, HighlightedMeasurementBody, MeasurementBody};
use crate::inbound::http::summary::{
    MonthlySummaryResponse, SummaryEntryBody, SummaryQuery, UnavailableSummaryBody,
    UserSummaryBody,
};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Blood pressure measurements API",
        description = "Record blood-pressure readings, review highlighted history and monthly summaries."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::measurements::record_measurement,
        crate::inbound::http::measurements::list_measurements,
        crate::inbound::http::history::get_history,
        crate::inbound::http::summary::get_users_summary,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorBody,
        MeasurementBody,
        HighlightedMeasurementBody,
        MeasurementRequest,
        RecordMeasurementResponse,
        MeasurementListResponse,
        HistoryQuery,
        HistoryResponse,
        SummaryQuery,
        UserSummaryBody,
        UnavailableSummaryBody,
        SummaryEntryBody,
        MonthlySummaryResponse,
    )),
    tags(
        (name = "measurements", description = "Blood-pressure readings and derived statistics"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
