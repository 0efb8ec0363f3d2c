//! Highlighted history handler.
//!
//! ```text
//! GET /history/{userId}?startDate=..&endDate=..
//! ```

use actix_web::{HttpResponse, get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::MeasurementHistory;
use crate::domain::ports::HistoryBounds;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorBody, HighlightedMeasurementBody};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::UserPath;

/// Optional window applied when both bounds are present.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    /// Inclusive lower bound of the window.
    pub start_date: Option<String>,
    /// Inclusive upper bound of the window.
    pub end_date: Option<String>,
}

/// A user's measurements with averages and highlights.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub user_id: String,
    #[schema(example = 120.0)]
    pub average_systolic: f64,
    #[schema(example = 80.0)]
    pub average_diastolic: f64,
    pub measurements: Vec<HighlightedMeasurementBody>,
}

impl From<MeasurementHistory> for HistoryResponse {
    fn from(value: MeasurementHistory) -> Self {
        Self {
            user_id: value.user_id.to_string(),
            average_systolic: value.averages.systolic,
            average_diastolic: value.averages.diastolic,
            measurements: value
                .measurements
                .into_iter()
                .map(HighlightedMeasurementBody::from)
                .collect(),
        }
    }
}

/// Fetch a user's history with readings far from the mean highlighted.
#[utoipa::path(
    get,
    path = "/history/{userId}",
    params(
        ("userId" = String, Path, description = "User whose history to fetch"),
        ("startDate" = Option<String>, Query, description = "Inclusive window start; ignored unless endDate is also set"),
        ("endDate" = Option<String>, Query, description = "Inclusive window end; ignored unless startDate is also set")
    ),
    responses(
        (status = 200, description = "Highlighted history", body = HistoryResponse),
        (status = 404, description = "No measurements in the window, or a bound that matches no date", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    ),
    tags = ["measurements"],
    operation_id = "getHistory"
)]
#[get("/history/{userId}")]
pub async fn get_history(
    state: web::Data<HttpState>,
    path: web::Path<UserPath>,
    query: web::Query<HistoryQuery>,
) -> ApiResult<HttpResponse> {
    let user_id = path.into_inner().into_user_id()?;
    let HistoryQuery {
        start_date,
        end_date,
    } = query.into_inner();
    let history = state
        .measurements_query
        .history(
            &user_id,
            HistoryBounds {
                start_date,
                end_date,
            },
        )
        .await?;
    Ok(HttpResponse::Ok().json(HistoryResponse::from(history)))
}
