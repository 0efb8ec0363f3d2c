//! Wire representations shared by several handlers.
//!
//! Domain types remain framework-agnostic by not deriving `Serialize` or
//! `ToSchema`. The bodies here mirror them in the shape clients expect and
//! carry the OpenAPI schema definitions.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{HighlightedMeasurement, Measurement};

/// Error envelope returned by every failing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable message.
    #[schema(example = "הערכים לא הגיוניים")]
    pub error: String,
}

/// A stored measurement as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementBody {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(example = "user1")]
    pub user_id: String,
    #[schema(example = 120)]
    pub systolic: i32,
    #[schema(example = 80)]
    pub diastolic: i32,
    #[schema(example = 72)]
    pub pulse: Option<i32>,
    /// The date exactly as submitted, or the submission time.
    #[schema(example = "2023-11-05T10:00:00.000Z")]
    pub date: String,
}

impl From<Measurement> for MeasurementBody {
    fn from(value: Measurement) -> Self {
        Self {
            id: value.id.to_string(),
            user_id: value.user_id.to_string(),
            systolic: value.systolic,
            diastolic: value.diastolic,
            pulse: value.pulse,
            date: value.date.as_str().to_owned(),
        }
    }
}

/// A measurement flagged against its comparison set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HighlightedMeasurementBody {
    #[serde(flatten)]
    pub measurement: MeasurementBody,
    /// Whether either pressure deviates by more than 20% from the mean.
    pub highlight: bool,
}

impl From<HighlightedMeasurement> for HighlightedMeasurementBody {
    fn from(value: HighlightedMeasurement) -> Self {
        Self {
            measurement: value.measurement.into(),
            highlight: value.highlight,
        }
    }
}
