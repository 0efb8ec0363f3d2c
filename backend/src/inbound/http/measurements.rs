//! Measurement recording and listing handlers.
//!
//! ```text
//! POST /bp/{userId}
//! GET /bp/{userId}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::ports::RecordMeasurementRequest;
use crate::domain::{RawReading, validate_reading};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorBody, MeasurementBody};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{UserPath, rejection_error};

/// Confirmation returned after a measurement is stored.
pub const SAVED_MESSAGE: &str = "המדידה נשמרה";

/// Request payload for recording a measurement.
///
/// Pressures and pulse accept JSON numbers or numeric strings.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct MeasurementRequest {
    #[schema(example = 120)]
    pub systolic: Option<Value>,
    #[schema(example = 80)]
    pub diastolic: Option<Value>,
    #[schema(example = 72)]
    pub pulse: Option<Value>,
    /// Stored verbatim; defaults to the submission time.
    #[schema(example = "2023-11-05T10:00:00.000Z")]
    pub date: Option<String>,
}

/// Response payload for a stored measurement.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecordMeasurementResponse {
    #[schema(example = "המדידה נשמרה")]
    pub message: String,
    pub measurement: MeasurementBody,
}

/// Every stored measurement of one user.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementListResponse {
    pub user_id: String,
    pub measurements: Vec<MeasurementBody>,
}

/// Record a blood-pressure measurement.
#[utoipa::path(
    post,
    path = "/bp/{userId}",
    request_body = MeasurementRequest,
    params(
        ("userId" = String, Path, description = "User the reading belongs to")
    ),
    responses(
        (status = 201, description = "Measurement stored", body = RecordMeasurementResponse),
        (status = 400, description = "Reading rejected", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    ),
    tags = ["measurements"],
    operation_id = "recordMeasurement"
)]
#[post("/bp/{userId}")]
pub async fn record_measurement(
    state: web::Data<HttpState>,
    path: web::Path<UserPath>,
    payload: web::Json<MeasurementRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = path.into_inner().into_user_id()?;
    let MeasurementRequest {
        systolic,
        diastolic,
        pulse,
        date,
    } = payload.into_inner();
    let reading = validate_reading(&RawReading {
        systolic,
        diastolic,
        pulse,
    })
    .map_err(rejection_error)?;

    let measurement = state
        .measurements
        .record(RecordMeasurementRequest {
            user_id,
            reading,
            date,
        })
        .await?;

    Ok(HttpResponse::Created().json(RecordMeasurementResponse {
        message: SAVED_MESSAGE.to_owned(),
        measurement: measurement.into(),
    }))
}

/// List every measurement of a user in stored order.
#[utoipa::path(
    get,
    path = "/bp/{userId}",
    params(
        ("userId" = String, Path, description = "User whose readings to list")
    ),
    responses(
        (status = 200, description = "Stored measurements", body = MeasurementListResponse),
        (status = 404, description = "No measurements for this user", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    ),
    tags = ["measurements"],
    operation_id = "listMeasurements"
)]
#[get("/bp/{userId}")]
pub async fn list_measurements(
    state: web::Data<HttpState>,
    path: web::Path<UserPath>,
) -> ApiResult<HttpResponse> {
    let user_id = path.into_inner().into_user_id()?;
    let measurements = state.measurements_query.list_measurements(&user_id).await?;
    Ok(HttpResponse::Ok().json(MeasurementListResponse {
        user_id: user_id.to_string(),
        measurements: measurements.into_iter().map(MeasurementBody::from).collect(),
    }))
}

#[cfg(test)]
#[path = "measurements_tests.rs"]
mod tests;
