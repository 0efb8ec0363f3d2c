//! Averages and outlier detection over a set of measurements.
//!
//! A [`Cohort`] is the comparison set for one request: every highlight and
//! outlier count is relative to the cohort's own means, recomputed per query
//! and never stored.

use super::{Measurement, UserId};

/// Relative deviation from the mean beyond which a reading is flagged.
pub const OUTLIER_RATIO: f64 = 0.2;

/// Mean systolic and diastolic pressure of a cohort.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CohortAverages {
    /// Mean upper pressure.
    pub systolic: f64,
    /// Mean lower pressure.
    pub diastolic: f64,
}

impl CohortAverages {
    /// Averages reported for a user without readings in the window.
    pub const ZERO: Self = Self {
        systolic: 0.0,
        diastolic: 0.0,
    };

    /// Whether either pressure deviates from the mean by strictly more than
    /// [`OUTLIER_RATIO`] of that mean.
    ///
    /// # Examples
    /// ```
    /// use bp_backend::domain::CohortAverages;
    ///
    /// let averages = CohortAverages { systolic: 120.0, diastolic: 80.0 };
    /// assert!(averages.is_outlier(150, 80));
    /// assert!(!averages.is_outlier(135, 80));
    /// assert!(!averages.is_outlier(144, 96));
    /// ```
    pub fn is_outlier(&self, systolic: i32, diastolic: i32) -> bool {
        deviates(systolic, self.systolic) || deviates(diastolic, self.diastolic)
    }
}

fn deviates(value: i32, mean: f64) -> bool {
    (f64::from(value) - mean).abs() > mean * OUTLIER_RATIO
}

/// Non-empty, ordered set of measurements compared against each other.
#[derive(Debug, Clone, PartialEq)]
pub struct Cohort {
    measurements: Vec<Measurement>,
    averages: CohortAverages,
}

impl Cohort {
    /// Build a cohort, or `None` when there is nothing to compare.
    pub fn new(measurements: Vec<Measurement>) -> Option<Self> {
        if measurements.is_empty() {
            return None;
        }
        let count = measurements.len() as f64;
        let (systolic_total, diastolic_total) =
            measurements.iter().fold((0_i64, 0_i64), |(sys, dia), m| {
                (sys + i64::from(m.systolic), dia + i64::from(m.diastolic))
            });
        let averages = CohortAverages {
            systolic: systolic_total as f64 / count,
            diastolic: diastolic_total as f64 / count,
        };
        Some(Self {
            measurements,
            averages,
        })
    }

    pub fn averages(&self) -> CohortAverages {
        self.averages
    }

    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// Number of measurements flagged by [`CohortAverages::is_outlier`].
    pub fn outlier_count(&self) -> usize {
        self.measurements
            .iter()
            .filter(|m| self.averages.is_outlier(m.systolic, m.diastolic))
            .count()
    }

    /// Consume the cohort, flagging each measurement in order.
    pub fn into_highlighted(self) -> Vec<HighlightedMeasurement> {
        let averages = self.averages;
        self.measurements
            .into_iter()
            .map(|measurement| HighlightedMeasurement {
                highlight: averages.is_outlier(measurement.systolic, measurement.diastolic),
                measurement,
            })
            .collect()
    }
}

/// Measurement annotated with whether it stands out from its cohort.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightedMeasurement {
    pub measurement: Measurement,
    pub highlight: bool,
}

/// A user's measurements in a window with cohort averages and highlights.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementHistory {
    pub user_id: UserId,
    pub averages: CohortAverages,
    pub measurements: Vec<HighlightedMeasurement>,
}

impl MeasurementHistory {
    pub fn from_cohort(user_id: UserId, cohort: Cohort) -> Self {
        Self {
            user_id,
            averages: cohort.averages(),
            measurements: cohort.into_highlighted(),
        }
    }
}

/// One user's line in the monthly summary.
#[derive(Debug, Clone, PartialEq)]
pub struct UserSummary {
    pub user_id: UserId,
    pub averages: CohortAverages,
    pub outlier_count: usize,
}

impl UserSummary {
    /// Summarise a user's readings; an empty set yields zeros rather than
    /// dropping the user.
    pub fn from_measurements(user_id: UserId, measurements: Vec<Measurement>) -> Self {
        match Cohort::new(measurements) {
            Some(cohort) => Self {
                user_id,
                averages: cohort.averages(),
                outlier_count: cohort.outlier_count(),
            },
            None => Self {
                user_id,
                averages: CohortAverages::ZERO,
                outlier_count: 0,
            },
        }
    }
}
