//! Monthly cross-user summary handler.
//!
//! ```text
//! GET /users-summary?month=YYYY-MM
//! ```

use actix_web::{HttpResponse, get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{MonthlySummary, SummaryEntry};
use crate::domain::{Error, UserSummary, YearMonth};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorBody;
use crate::inbound::http::state::HttpState;

/// Message returned when the `month` parameter is absent or empty.
pub const MISSING_MONTH_MESSAGE: &str = "חייב לשלוח חודש";

/// Query parameters for the monthly summary.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct SummaryQuery {
    #[schema(example = "2023-11")]
    pub month: Option<String>,
}

/// Averages and outliers of one user for the month.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummaryBody {
    pub user_id: String,
    pub average_systolic: f64,
    pub average_diastolic: f64,
    /// Number of readings deviating more than 20% from the user's mean.
    pub outliers: usize,
}

impl From<UserSummary> for UserSummaryBody {
    fn from(value: UserSummary) -> Self {
        Self {
            user_id: value.user_id.to_string(),
            average_systolic: value.averages.systolic,
            average_diastolic: value.averages.diastolic,
            outliers: value.outlier_count,
        }
    }
}

/// Entry for a user whose readings could not be loaded.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnavailableSummaryBody {
    pub user_id: String,
    #[schema(example = "שגיאה בקריאה")]
    pub error: String,
}

/// One line of the monthly summary.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum SummaryEntryBody {
    Summary(UserSummaryBody),
    Unavailable(UnavailableSummaryBody),
}

impl From<SummaryEntry> for SummaryEntryBody {
    fn from(value: SummaryEntry) -> Self {
        match value {
            SummaryEntry::Summary(summary) => Self::Summary(summary.into()),
            SummaryEntry::Unavailable { user_id, message } => {
                Self::Unavailable(UnavailableSummaryBody {
                    user_id: user_id.to_string(),
                    error: message,
                })
            }
        }
    }
}

/// Summary of every known user for one month.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MonthlySummaryResponse {
    #[schema(example = "2023-11")]
    pub month: String,
    pub summary: Vec<SummaryEntryBody>,
}

impl From<MonthlySummary> for MonthlySummaryResponse {
    fn from(value: MonthlySummary) -> Self {
        Self {
            month: value.month.to_string(),
            summary: value
                .entries
                .into_iter()
                .map(SummaryEntryBody::from)
                .collect(),
        }
    }
}

fn parse_month(raw: Option<&str>) -> Result<YearMonth, Error> {
    let raw = raw
        .filter(|value| !value.is_empty())
        .ok_or_else(|| Error::invalid_request(MISSING_MONTH_MESSAGE))?;
    raw.parse()
        .map_err(|err| Error::invalid_request(format!("{err}: {raw}")))
}

/// Summarise every user's readings for a calendar month.
#[utoipa::path(
    get,
    path = "/users-summary",
    params(
        ("month" = String, Query, description = "Calendar month as YYYY-MM")
    ),
    responses(
        (status = 200, description = "Per-user summary", body = MonthlySummaryResponse),
        (status = 400, description = "Missing or malformed month", body = ErrorBody),
        (status = 500, description = "Users could not be listed", body = ErrorBody)
    ),
    tags = ["measurements"],
    operation_id = "getUsersSummary"
)]
#[get("/users-summary")]
pub async fn get_users_summary(
    state: web::Data<HttpState>,
    query: web::Query<SummaryQuery>,
) -> ApiResult<HttpResponse> {
    let month = parse_month(query.month.as_deref())?;
    let summary = state.measurements_query.monthly_summary(month).await?;
    Ok(HttpResponse::Ok().json(MonthlySummaryResponse::from(summary)))
}
